// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// buicap core: types and error definitions shared across all crates.

pub mod codes;
pub mod error;
pub mod params;
pub mod types;

pub use error::{BuicapError, Operation, Result};
pub use types::*;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// buicap FFI layer: typed entry-point signatures and the library loader.
//
// Nothing here interprets result codes; that is the scanner crate's job.
// The one guarantee this crate makes is that a `VendorLibrary` always
// carries twelve resolved entry points or does not exist at all.

pub mod library;
pub mod signatures;

#[cfg(any(test, feature = "stub"))]
pub mod stub;

pub use library::VendorLibrary;
pub use signatures::FunctionTable;

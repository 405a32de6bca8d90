// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// buicap scanner: the public facade over the check-scanner library.
//
// `Scanner` owns the loaded library and walks the one lifecycle the vendor
// supports: load, configure, init, operate, exit. Everything a caller
// needs is re-exported here.

pub mod scanner;
pub mod setup;

pub use buicap_core::error::{BuicapError, Operation, Result};
pub use buicap_core::types::{
    EjectDirection, ScanOutputs, ScanResult, ScannerModel, UsbScannerStatus,
};
pub use buicap_core::{codes, params};
pub use scanner::Scanner;
pub use setup::{MicrMethod, ScannerSetup, ScannerType};

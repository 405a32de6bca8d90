// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for buicap.

use std::path::PathBuf;

use thiserror::Error;

/// The entry points exported by the scanner library.
///
/// One list drives everything: symbol resolution at load time and the
/// operation name carried in every diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    SetParamString,
    Init,
    UsbScannerAvailable,
    Exit,
    EjectDocument,
    EjectPocket,
    CleanMode,
    ClearDocument,
    Calibrate,
    SetParam,
    GetParam,
    Scan,
}

impl Operation {
    /// Every entry point, in the order the vendor documents them.
    pub const ALL: [Operation; 12] = [
        Operation::SetParamString,
        Operation::Init,
        Operation::UsbScannerAvailable,
        Operation::Exit,
        Operation::EjectDocument,
        Operation::EjectPocket,
        Operation::CleanMode,
        Operation::ClearDocument,
        Operation::Calibrate,
        Operation::SetParam,
        Operation::GetParam,
        Operation::Scan,
    ];

    /// Name of the exported symbol for this entry point.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::SetParamString => "BUICSetParamString",
            Self::Init => "BUICInit",
            Self::UsbScannerAvailable => "IsDCCUSBScannerAvailable",
            Self::Exit => "BUICExit",
            Self::EjectDocument => "BUICEjectDocument",
            Self::EjectPocket => "BUICEjectPocket",
            Self::CleanMode => "DCCCleanMode",
            Self::ClearDocument => "BUICClearDocument",
            Self::Calibrate => "DocketPortCalibrate",
            Self::SetParam => "BUICSetParam",
            Self::GetParam => "BUICGetParam",
            Self::Scan => "DCCScan",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Top-level error type for all buicap operations.
#[derive(Debug, Error)]
pub enum BuicapError {
    // -- Load errors --
    #[error("scanner library not found at {}", .0.display())]
    LibraryNotFound(PathBuf),

    #[error("failed to load scanner library {}: {detail}", .path.display())]
    LibraryLoad { path: PathBuf, detail: String },

    #[error("entry point {symbol} missing from scanner library: {detail}")]
    MissingSymbol {
        symbol: &'static str,
        detail: String,
    },

    // -- State errors --
    #[error("{operation} called but no scanner library is loaded")]
    NotLoaded { operation: Operation },

    // -- Argument errors --
    #[error("invalid argument for {operation}: {reason}")]
    InvalidArgument { operation: Operation, reason: String },

    // -- Vendor result codes --
    #[error("failed to set parameter {param}: {description} (code {code})")]
    ParamRejected {
        operation: Operation,
        param: i32,
        code: i32,
        description: String,
    },

    #[error("{operation} failed with code {code}: {description}")]
    Vendor {
        operation: Operation,
        code: i32,
        description: String,
    },
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BuicapError>;

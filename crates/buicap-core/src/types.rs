// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the scanner bindings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Size of the fixed MICR output buffer `DCCScan` fills.
pub const MICR_BUFFER_LEN: usize = 80;

/// Number of `int` slots in the per-document status array.
pub const DOC_STATUS_SLOTS: usize = 32;

/// Where an ejected document goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EjectDirection {
    /// Back out of the entry slot.
    Reverse,
    /// Forward into the exit pocket.
    Forward,
    /// Forward to the kiosk presenter, held for the customer to take.
    Kiosk,
}

impl EjectDirection {
    /// Wire value for `BUICEjectPocket`.
    pub fn code(&self) -> i32 {
        match self {
            Self::Reverse => 0,
            Self::Forward => 1,
            Self::Kiosk => 3,
        }
    }
}

/// Scanner models the library drives, by the code the USB probe answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScannerModel {
    Cx30,
    Ts215,
    Ts230,
    Ts240,
    Ts4120,
    Sb500,
    Sb600,
    Sb650,
}

impl ScannerModel {
    /// Model code as reported by `IsDCCUSBScannerAvailable`.
    pub fn code(&self) -> i32 {
        match self {
            Self::Cx30 => 30,
            Self::Ts215 => 215,
            Self::Ts230 => 230,
            Self::Ts240 => 240,
            Self::Ts4120 => 4120,
            Self::Sb500 => 500,
            Self::Sb600 => 600,
            Self::Sb650 => 650,
        }
    }

    /// Decode a probe code into a model.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            30 => Some(Self::Cx30),
            215 => Some(Self::Ts215),
            230 => Some(Self::Ts230),
            240 => Some(Self::Ts240),
            4120 => Some(Self::Ts4120),
            500 => Some(Self::Sb500),
            600 => Some(Self::Sb600),
            650 => Some(Self::Sb650),
            _ => None,
        }
    }

    /// Whether the model carries a docket port (`DocketPortCalibrate` target).
    pub fn has_docket_port(&self) -> bool {
        matches!(self, Self::Sb500 | Self::Sb600 | Self::Sb650)
    }
}

impl std::fmt::Display for ScannerModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Cx30 => "CX30",
            Self::Ts215 => "TS215",
            Self::Ts230 => "TS230",
            Self::Ts240 => "TS240",
            Self::Ts4120 => "TS4120",
            Self::Sb500 => "SB500",
            Self::Sb600 => "SB600",
            Self::Sb650 => "SB650",
        };
        f.write_str(name)
    }
}

/// Result of probing the USB bus for an attached scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbScannerStatus {
    pub vendor_id: i32,
    pub product_id: i32,
    /// Raw probe code: a model number when a scanner answered, negative
    /// when none did.
    pub code: i32,
}

impl UsbScannerStatus {
    pub fn is_available(&self) -> bool {
        self.code >= 0
    }

    /// The responding model, when the probe code names one.
    pub fn model(&self) -> Option<ScannerModel> {
        ScannerModel::from_code(self.code)
    }
}

/// Destination paths for the images a scan pass can produce.
///
/// Every slot is optional; an omitted slot tells the library not to write
/// that image at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanOutputs {
    pub front_tiff: Option<PathBuf>,
    pub back_tiff: Option<PathBuf>,
    pub front_jpeg: Option<PathBuf>,
    pub back_jpeg: Option<PathBuf>,
}

/// Everything one pass of `DCCScan` reports back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Decoded MICR line, trimmed; empty when nothing was read.
    pub micr: String,
    /// Image quality score from the on-board analysis.
    pub image_quality: i32,
    /// Measured image contrast.
    pub contrast: i32,
    /// Per-subsystem status slots, as reported by the library.
    pub doc_status: [i32; DOC_STATUS_SLOTS],
    /// Raw vendor result code. Track conditions such as an empty feeder
    /// land here, they are not errors.
    pub code: i32,
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pre-init configuration bundle.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use buicap_core::error::{BuicapError, Operation, Result};
use buicap_core::params::string_param;

use crate::scanner::Scanner;

/// Transport the driver should use to reach the scanner, set through
/// `CFG_SCANNERTYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScannerType {
    Usb,
    Scsi,
    Sb500,
    Sb600,
}

impl ScannerType {
    /// Wire value for the `CFG_SCANNERTYPE` parameter.
    pub fn code(&self) -> i32 {
        match self {
            Self::Usb => 200,
            Self::Scsi => 400,
            Self::Sb500 => 500,
            Self::Sb600 => 600,
        }
    }
}

/// MICR read method, set through `CFG_MICR_METHOD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MicrMethod {
    Us,
    Htl,
}

impl MicrMethod {
    /// Wire value for the `CFG_MICR_METHOD` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Htl => "HTL",
        }
    }
}

/// The string parameters a scanner needs before [`Scanner::init`].
///
/// Only populated fields are applied, path parameters first, then
/// transport and MICR method. Loadable from serialized settings, so an
/// application can keep its bring-up recipe in a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScannerSetup {
    /// Driver INI file (`CFG_INIPATH`); `BUICInit` fails without it.
    pub ini_path: Option<PathBuf>,
    /// Scanner configuration directory (`CFG_CFGPATH`).
    pub cfg_path: Option<PathBuf>,
    /// Directory holding the vendor's support DLLs (`CFG_DLLPATH`).
    pub dll_path: Option<PathBuf>,
    /// Firmware image downloaded on init (`CFG_FIRMWAREPATH`).
    pub firmware_path: Option<PathBuf>,
    /// Endorser font directory (`CFG_FONTPATH`).
    pub font_path: Option<PathBuf>,
    /// Transport type (`CFG_SCANNERTYPE`).
    pub scanner_type: Option<ScannerType>,
    /// MICR read method (`CFG_MICR_METHOD`).
    pub micr_method: Option<MicrMethod>,
}

impl ScannerSetup {
    /// Apply every populated field to a loaded, not yet initialized
    /// scanner.
    pub fn apply(&self, scanner: &mut Scanner) -> Result<()> {
        let paths = [
            (string_param::CFG_INIPATH, &self.ini_path),
            (string_param::CFG_CFGPATH, &self.cfg_path),
            (string_param::CFG_DLLPATH, &self.dll_path),
            (string_param::CFG_FIRMWAREPATH, &self.firmware_path),
            (string_param::CFG_FONTPATH, &self.font_path),
        ];
        for (param, path) in paths {
            if let Some(path) = path {
                let text = path.to_str().ok_or_else(|| BuicapError::InvalidArgument {
                    operation: Operation::SetParamString,
                    reason: format!("path is not valid UTF-8: {}", path.display()),
                })?;
                scanner.set_param_string(param, text)?;
            }
        }
        if let Some(scanner_type) = self.scanner_type {
            scanner.set_param_string(
                string_param::CFG_SCANNERTYPE,
                &scanner_type.code().to_string(),
            )?;
        }
        if let Some(micr_method) = self.micr_method {
            scanner.set_param_string(string_param::CFG_MICR_METHOD, micr_method.as_str())?;
        }
        Ok(())
    }
}

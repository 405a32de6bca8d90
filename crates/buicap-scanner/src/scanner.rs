// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The scanner facade: one loaded library, explicit state checks, and the
// per-operation result conventions of the BUIC API.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::path::Path;

use buicap_core::codes;
use buicap_core::error::{BuicapError, Operation, Result};
use buicap_core::types::{
    DOC_STATUS_SLOTS, EjectDirection, MICR_BUFFER_LEN, ScanOutputs, ScanResult, UsbScannerStatus,
};
use buicap_ffi::{FunctionTable, VendorLibrary};

/// Handle to the check scanner.
///
/// Lifecycle is `Unloaded → Loaded → Unloaded`: [`Scanner::open`] performs
/// the only load, [`Scanner::close`] the only unload, and every operation
/// refuses to run while unloaded. Methods that reach the device take
/// `&mut self`: the vendor library's reentrancy is undocumented, so a
/// single handle never has two calls in flight.
#[derive(Debug)]
pub struct Scanner {
    library: Option<VendorLibrary>,
}

impl Scanner {
    /// Load the vendor library at `path` and resolve its entry points.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let library = VendorLibrary::load(path)?;
        Ok(Self {
            library: Some(library),
        })
    }

    /// Wrap an already-resolved entry-point table, such as a statically
    /// linked vendor build or the virtual scanner.
    pub fn with_library(library: VendorLibrary) -> Self {
        Self {
            library: Some(library),
        }
    }

    /// Whether a library is currently loaded.
    pub fn is_loaded(&self) -> bool {
        self.library.is_some()
    }

    /// Path the library was loaded from, if it came from disk.
    pub fn library_path(&self) -> Option<&Path> {
        self.library.as_ref().and_then(VendorLibrary::path)
    }

    /// The one state check: every operation goes through here first.
    fn table(&self, operation: Operation) -> Result<FunctionTable> {
        match &self.library {
            Some(library) => Ok(*library.table()),
            None => Err(BuicapError::NotLoaded { operation }),
        }
    }

    /// Translate a vendor code: non-negative and documented benign codes
    /// are data, anything else negative is an error.
    fn vendor_result(operation: Operation, code: i32, benign: &[i32]) -> Result<i32> {
        if code >= 0 || benign.contains(&code) {
            Ok(code)
        } else {
            Err(BuicapError::Vendor {
                operation,
                code,
                description: codes::describe(code).into_owned(),
            })
        }
    }

    /// Set a string-valued configuration parameter (`BUICSetParamString`).
    ///
    /// Path parameters must be in place before [`Scanner::init`].
    pub fn set_param_string(&mut self, param: i32, value: &str) -> Result<()> {
        let table = self.table(Operation::SetParamString)?;
        let value_c = cstring_argument(Operation::SetParamString, value)?;

        // SAFETY: resolved entry point; the CString outlives the call.
        let code = unsafe { (table.set_param_string)(param, value_c.as_ptr()) };
        if code != 0 {
            return Err(BuicapError::ParamRejected {
                operation: Operation::SetParamString,
                param,
                code,
                description: codes::describe(code).into_owned(),
            });
        }
        tracing::debug!(param, value, "string parameter set");
        Ok(())
    }

    /// Initialize the scanner (`BUICInit`).
    ///
    /// Returns the vendor's non-negative status code; negative codes are
    /// init failures and come back as errors.
    pub fn init(&mut self) -> Result<i32> {
        let table = self.table(Operation::Init)?;

        // SAFETY: resolved entry point.
        let code = unsafe { (table.init)() };
        let code = Self::vendor_result(Operation::Init, code, &[])?;
        tracing::info!(code, "scanner initialized");
        Ok(code)
    }

    /// Probe the USB bus for an attached scanner
    /// (`IsDCCUSBScannerAvailable`).
    ///
    /// The probe code is data, not a failure: non-negative is the
    /// responding model number, negative means nothing answered.
    pub fn usb_scanner_status(&mut self) -> Result<UsbScannerStatus> {
        let table = self.table(Operation::UsbScannerAvailable)?;
        let mut vendor_id: c_int = 0;
        let mut product_id: c_int = 0;

        // SAFETY: resolved entry point; both out-pointers reference live
        // stack slots.
        let code = unsafe { (table.usb_scanner_available)(&mut vendor_id, &mut product_id) };
        Ok(UsbScannerStatus {
            vendor_id,
            product_id,
            code,
        })
    }

    /// Push the current document out of the track (`BUICEjectDocument`).
    ///
    /// An empty track reports [`codes::SCAN_NO_CHEQUES`], returned as data.
    pub fn eject_document(&mut self) -> Result<i32> {
        let table = self.table(Operation::EjectDocument)?;

        // SAFETY: resolved entry point.
        let code = unsafe { (table.eject_document)() };
        Self::vendor_result(Operation::EjectDocument, code, &[codes::SCAN_NO_CHEQUES])
    }

    /// Eject toward `direction` into pocket `pocket` (`BUICEjectPocket`).
    ///
    /// The single-pocket transports this library drives only accept
    /// pocket 0. An empty track reports [`codes::SCAN_NO_CHEQUES`] as data.
    pub fn eject_pocket(&mut self, direction: EjectDirection, pocket: i32) -> Result<i32> {
        let table = self.table(Operation::EjectPocket)?;
        if pocket != 0 {
            return Err(BuicapError::InvalidArgument {
                operation: Operation::EjectPocket,
                reason: format!("pocket must be 0 on single-pocket devices, got {pocket}"),
            });
        }

        // SAFETY: resolved entry point.
        let code = unsafe { (table.eject_pocket)(direction.code(), pocket) };
        Self::vendor_result(Operation::EjectPocket, code, &[codes::SCAN_NO_CHEQUES])
    }

    /// Enter or leave cleaning mode (`DCCCleanMode`): 1 starts a cleaning
    /// pass, 0 ends it.
    pub fn clean_mode(&mut self, mode: i32) -> Result<i32> {
        let table = self.table(Operation::CleanMode)?;
        mode_argument(Operation::CleanMode, mode)?;

        // SAFETY: resolved entry point.
        let code = unsafe { (table.clean_mode)(mode) };
        Self::vendor_result(Operation::CleanMode, code, &[])
    }

    /// Clear a staged document from the track (`BUICClearDocument`).
    ///
    /// Reports [`codes::SCAN_NO_CHEQUES`] when the track was already empty
    /// and [`codes::SCAN_DOUBLE_FEED`] when the cleared document had been
    /// fed ahead of a scan; both are data.
    pub fn clear_document(&mut self) -> Result<i32> {
        let table = self.table(Operation::ClearDocument)?;

        // SAFETY: resolved entry point.
        let code = unsafe { (table.clear_document)() };
        Self::vendor_result(
            Operation::ClearDocument,
            code,
            &[codes::SCAN_NO_CHEQUES, codes::SCAN_DOUBLE_FEED],
        )
    }

    /// Calibrate the docket port (`DocketPortCalibrate`), `mode` 0 or 1.
    /// Only the SB-series transports carry a docket port.
    pub fn calibrate(&mut self, mode: i32) -> Result<i32> {
        let table = self.table(Operation::Calibrate)?;
        mode_argument(Operation::Calibrate, mode)?;

        // SAFETY: resolved entry point.
        let code = unsafe { (table.calibrate)(mode) };
        Self::vendor_result(Operation::Calibrate, code, &[])
    }

    /// Set an integer configuration parameter (`BUICSetParam`).
    pub fn set_param(&mut self, param: i32, value: i32) -> Result<i32> {
        let table = self.table(Operation::SetParam)?;

        // SAFETY: resolved entry point.
        let code = unsafe { (table.set_param)(param, value) };
        if code < 0 {
            return Err(BuicapError::ParamRejected {
                operation: Operation::SetParam,
                param,
                code,
                description: codes::describe(code).into_owned(),
            });
        }
        tracing::debug!(param, value, "parameter set");
        Ok(code)
    }

    /// Read an integer configuration parameter (`BUICGetParam`). The
    /// return value is the parameter value itself.
    pub fn get_param(&mut self, param: i32) -> Result<i32> {
        let table = self.table(Operation::GetParam)?;

        // SAFETY: resolved entry point.
        Ok(unsafe { (table.get_param)(param) })
    }

    /// Feed one document through the track and capture it (`DCCScan`).
    ///
    /// Writes an image file for each path present in `outputs` and decodes
    /// the MICR line from the fixed 80-byte buffer. The vendor result code
    /// is part of the [`ScanResult`], never an error; callers decide how
    /// to treat track conditions such as [`codes::SCAN_NO_CHEQUES`].
    pub fn scan(&mut self, outputs: &ScanOutputs) -> Result<ScanResult> {
        let table = self.table(Operation::Scan)?;

        let front_tiff = path_argument(outputs.front_tiff.as_deref())?;
        let back_tiff = path_argument(outputs.back_tiff.as_deref())?;
        let front_jpeg = path_argument(outputs.front_jpeg.as_deref())?;
        let back_jpeg = path_argument(outputs.back_jpeg.as_deref())?;

        let mut micr = [0 as c_char; MICR_BUFFER_LEN];
        let mut image_quality: c_int = 0;
        let mut contrast: c_int = 0;
        let mut doc_status = [0 as c_int; DOC_STATUS_SLOTS];

        // SAFETY: resolved entry point; the path CStrings outlive the
        // call, the MICR and status buffers have the contract-fixed
        // shapes (80 bytes, 32 ints), and the scalar out-pointers
        // reference live stack slots.
        let code = unsafe {
            (table.scan)(
                optional_ptr(&front_tiff),
                optional_ptr(&back_tiff),
                optional_ptr(&front_jpeg),
                optional_ptr(&back_jpeg),
                micr.as_mut_ptr(),
                &mut image_quality,
                &mut contrast,
                doc_status.as_mut_ptr(),
            )
        };

        let result = ScanResult {
            micr: decode_micr(&micr),
            image_quality,
            contrast,
            doc_status,
            code,
        };
        tracing::debug!(code, micr = %result.micr, "scan pass finished");
        Ok(result)
    }

    /// Shut the scanner down and release the library.
    ///
    /// Calls `BUICExit` while the library is still mapped and returns its
    /// result code. Safe to call repeatedly: once unloaded this is a no-op
    /// returning 0.
    pub fn close(&mut self) -> i32 {
        let Some(library) = self.library.take() else {
            return 0;
        };

        // SAFETY: resolved entry point; the mapping stays alive until
        // `library` drops at the end of this scope.
        let code = unsafe { (library.table().exit)() };
        if code == 0 {
            tracing::info!("scanner library closed");
        } else {
            tracing::warn!(code, "BUICExit reported an error during close");
        }
        code
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        if self.library.is_some() {
            // Last-chance shutdown; a failing exit is logged in close().
            self.close();
        }
    }
}

fn cstring_argument(operation: Operation, value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| BuicapError::InvalidArgument {
        operation,
        reason: format!("string contains an interior NUL byte: {value:?}"),
    })
}

fn mode_argument(operation: Operation, mode: i32) -> Result<()> {
    if mode == 0 || mode == 1 {
        Ok(())
    } else {
        Err(BuicapError::InvalidArgument {
            operation,
            reason: format!("mode must be 0 or 1, got {mode}"),
        })
    }
}

fn path_argument(path: Option<&Path>) -> Result<Option<CString>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = path.to_str().ok_or_else(|| BuicapError::InvalidArgument {
        operation: Operation::Scan,
        reason: format!("image path is not valid UTF-8: {}", path.display()),
    })?;
    Ok(Some(cstring_argument(Operation::Scan, text)?))
}

fn optional_ptr(value: &Option<CString>) -> *const c_char {
    match value {
        Some(value) => value.as_ptr(),
        None => std::ptr::null(),
    }
}

/// Decode the fixed MICR buffer: bytes up to the first NUL, with anything
/// outside ASCII dropped and surrounding whitespace trimmed.
fn decode_micr(buffer: &[c_char]) -> String {
    let text: String = buffer
        .iter()
        .map(|&b| b as u8)
        .take_while(|&b| b != 0)
        .filter(u8::is_ascii)
        .map(char::from)
        .collect();
    text.trim().to_string()
}

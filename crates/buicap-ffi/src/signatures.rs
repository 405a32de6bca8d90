// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typed signatures for the scanner library's entry points.
//
// The vendor publishes a stdcall C API; `extern "system"` picks the right
// convention per platform. Declarations here must match the published
// prototypes exactly; a wrong shape is undefined behavior at call time.

use std::os::raw::{c_char, c_int};

use buicap_core::error::{BuicapError, Operation, Result};
use libloading::Library;

/// `BUICSetParamString(iParam, pszValue)`
pub type SetParamStringFn = unsafe extern "system" fn(c_int, *const c_char) -> c_int;

/// `BUICInit()`
pub type InitFn = unsafe extern "system" fn() -> c_int;

/// `IsDCCUSBScannerAvailable(piVendorId, piProductId)`
pub type UsbScannerAvailableFn = unsafe extern "system" fn(*mut c_int, *mut c_int) -> c_int;

/// `BUICExit()`
pub type ExitFn = unsafe extern "system" fn() -> c_int;

/// `BUICEjectDocument()`
pub type EjectDocumentFn = unsafe extern "system" fn() -> c_int;

/// `BUICEjectPocket(iDirection, iPocket)`
pub type EjectPocketFn = unsafe extern "system" fn(c_int, c_int) -> c_int;

/// `DCCCleanMode(iMode)`
pub type CleanModeFn = unsafe extern "system" fn(c_int) -> c_int;

/// `BUICClearDocument()`
pub type ClearDocumentFn = unsafe extern "system" fn() -> c_int;

/// `DocketPortCalibrate(iMode)`
pub type CalibrateFn = unsafe extern "system" fn(c_int) -> c_int;

/// `BUICSetParam(iParam, iValue)`
pub type SetParamFn = unsafe extern "system" fn(c_int, c_int) -> c_int;

/// `BUICGetParam(iParam)`
pub type GetParamFn = unsafe extern "system" fn(c_int) -> c_int;

/// `DCCScan(pszFrontTiff, pszBackTiff, pszFrontJpeg, pszBackJpeg, pszMicr,
/// piImageQuality, piContrast, piDocStatus)`
///
/// The four path arguments are nullable. `pszMicr` must point at 80 bytes,
/// `piDocStatus` at 32 ints.
pub type ScanFn = unsafe extern "system" fn(
    *const c_char,
    *const c_char,
    *const c_char,
    *const c_char,
    *mut c_char,
    *mut c_int,
    *mut c_int,
    *mut c_int,
) -> c_int;

/// The twelve entry points of the scanner library, resolved up front.
///
/// Plain function pointers, so the table is `Copy`. Anything holding a
/// table must keep the backing mapping alive for as long as the pointers
/// may be called; `VendorLibrary` exists to pair the two.
#[derive(Clone, Copy, Debug)]
pub struct FunctionTable {
    pub set_param_string: SetParamStringFn,
    pub init: InitFn,
    pub usb_scanner_available: UsbScannerAvailableFn,
    pub exit: ExitFn,
    pub eject_document: EjectDocumentFn,
    pub eject_pocket: EjectPocketFn,
    pub clean_mode: CleanModeFn,
    pub clear_document: ClearDocumentFn,
    pub calibrate: CalibrateFn,
    pub set_param: SetParamFn,
    pub get_param: GetParamFn,
    pub scan: ScanFn,
}

impl FunctionTable {
    /// Resolve every entry point, failing on the first missing symbol.
    ///
    /// # Safety
    ///
    /// The library must export these symbols with the declared signatures.
    /// A library that exports a matching name with a different shape will
    /// resolve fine here and misbehave at call time.
    pub unsafe fn resolve(library: &Library) -> Result<Self> {
        unsafe {
            Ok(Self {
                set_param_string: resolve_symbol(library, Operation::SetParamString)?,
                init: resolve_symbol(library, Operation::Init)?,
                usb_scanner_available: resolve_symbol(library, Operation::UsbScannerAvailable)?,
                exit: resolve_symbol(library, Operation::Exit)?,
                eject_document: resolve_symbol(library, Operation::EjectDocument)?,
                eject_pocket: resolve_symbol(library, Operation::EjectPocket)?,
                clean_mode: resolve_symbol(library, Operation::CleanMode)?,
                clear_document: resolve_symbol(library, Operation::ClearDocument)?,
                calibrate: resolve_symbol(library, Operation::Calibrate)?,
                set_param: resolve_symbol(library, Operation::SetParam)?,
                get_param: resolve_symbol(library, Operation::GetParam)?,
                scan: resolve_symbol(library, Operation::Scan)?,
            })
        }
    }
}

/// Look one entry point up by its exported name.
///
/// # Safety
///
/// `F` must be the function-pointer type matching the symbol's real
/// signature.
unsafe fn resolve_symbol<F: Copy>(library: &Library, operation: Operation) -> Result<F> {
    let symbol = operation.symbol();
    let found: libloading::Symbol<'_, F> = unsafe {
        library
            .get(symbol.as_bytes())
            .map_err(|e| BuicapError::MissingSymbol {
                symbol,
                detail: e.to_string(),
            })?
    };
    Ok(*found)
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process virtual scanner for builds without the vendor DLL.
//
// Exports the same twelve entry points with the same ABI and the documented
// result-code conventions, backed by one process-wide state block. Tests
// that touch that state must serialize themselves around `reset`.

use std::collections::BTreeMap;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use buicap_core::codes;
use buicap_core::error::Operation;
use buicap_core::params::string_param;
use buicap_core::types::{DOC_STATUS_SLOTS, MICR_BUFFER_LEN};

use crate::library::VendorLibrary;
use crate::signatures::FunctionTable;

/// MICR line reported for every fed document, in the common lowercase
/// transit/on-us transliteration. Written into the fixed buffer with
/// trailing blanks, like real reads.
pub const SAMPLE_MICR: &str = "t031100209t 123456789o 0101";

/// Image quality score reported for stub scans.
pub const SAMPLE_IMAGE_QUALITY: i32 = 87;

/// Contrast value reported for stub scans.
pub const SAMPLE_CONTRAST: i32 = 42;

/// Vendor id the USB probe answers with.
pub const USB_VENDOR_ID: i32 = 0x0DC5;

/// Product id the USB probe answers with.
pub const USB_PRODUCT_ID: i32 = 0x1030;

/// Model code the USB probe answers with (a CX30).
pub const USB_MODEL_CODE: i32 = 30;

const TIFF_MAGIC: &[u8] = b"II*\0";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

struct StubState {
    initialized: bool,
    cleaning: bool,
    documents_pending: u32,
    int_params: BTreeMap<i32, i32>,
    string_params: BTreeMap<i32, String>,
    forced: BTreeMap<Operation, i32>,
    calls: BTreeMap<Operation, u32>,
}

impl StubState {
    const fn empty() -> Self {
        Self {
            initialized: false,
            cleaning: false,
            documents_pending: 0,
            int_params: BTreeMap::new(),
            string_params: BTreeMap::new(),
            forced: BTreeMap::new(),
            calls: BTreeMap::new(),
        }
    }
}

static STATE: Mutex<StubState> = Mutex::new(StubState::empty());

fn state() -> MutexGuard<'static, StubState> {
    STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Count the call and consume any forced result for this entry point.
fn bump(s: &mut StubState, operation: Operation) -> Option<i32> {
    *s.calls.entry(operation).or_insert(0) += 1;
    s.forced.remove(&operation)
}

unsafe extern "system" fn set_param_string(param: c_int, value: *const c_char) -> c_int {
    let mut s = state();
    if let Some(code) = bump(&mut s, Operation::SetParamString) {
        return code;
    }
    if value.is_null() {
        return codes::INVALID_PARAMETER;
    }
    // SAFETY: non-null and NUL-terminated per the API contract.
    let text = unsafe { CStr::from_ptr(value) }.to_string_lossy().into_owned();
    s.string_params.insert(param, text);
    0
}

unsafe extern "system" fn init() -> c_int {
    let mut s = state();
    if let Some(code) = bump(&mut s, Operation::Init) {
        return code;
    }
    if !s.string_params.contains_key(&string_param::CFG_INIPATH) {
        return codes::INI_NOT_FOUND;
    }
    s.initialized = true;
    0
}

unsafe extern "system" fn usb_scanner_available(
    vendor_id: *mut c_int,
    product_id: *mut c_int,
) -> c_int {
    let mut s = state();
    if let Some(code) = bump(&mut s, Operation::UsbScannerAvailable) {
        return code;
    }
    drop(s);
    // SAFETY: out-pointers reference live ints per the API contract.
    unsafe {
        if !vendor_id.is_null() {
            *vendor_id = USB_VENDOR_ID;
        }
        if !product_id.is_null() {
            *product_id = USB_PRODUCT_ID;
        }
    }
    USB_MODEL_CODE
}

unsafe extern "system" fn exit() -> c_int {
    let mut s = state();
    if let Some(code) = bump(&mut s, Operation::Exit) {
        return code;
    }
    s.initialized = false;
    s.cleaning = false;
    s.documents_pending = 0;
    0
}

unsafe extern "system" fn eject_document() -> c_int {
    let mut s = state();
    if let Some(code) = bump(&mut s, Operation::EjectDocument) {
        return code;
    }
    if !s.initialized {
        return codes::NOT_INITIALIZED;
    }
    if s.documents_pending == 0 {
        return codes::SCAN_NO_CHEQUES;
    }
    s.documents_pending -= 1;
    0
}

unsafe extern "system" fn eject_pocket(direction: c_int, pocket: c_int) -> c_int {
    let mut s = state();
    if let Some(code) = bump(&mut s, Operation::EjectPocket) {
        return code;
    }
    if !s.initialized {
        return codes::NOT_INITIALIZED;
    }
    if pocket != 0 {
        return codes::INVALID_POCKET;
    }
    if !matches!(direction, 0 | 1 | 3) {
        return codes::EJECT_UNSUPPORTED;
    }
    if s.documents_pending == 0 {
        return codes::SCAN_NO_CHEQUES;
    }
    s.documents_pending -= 1;
    0
}

unsafe extern "system" fn clean_mode(mode: c_int) -> c_int {
    let mut s = state();
    if let Some(code) = bump(&mut s, Operation::CleanMode) {
        return code;
    }
    if !s.initialized {
        return codes::NOT_INITIALIZED;
    }
    match mode {
        0 => {
            s.cleaning = false;
            0
        }
        1 => {
            s.cleaning = true;
            0
        }
        _ => codes::VALUE_OUT_OF_RANGE,
    }
}

unsafe extern "system" fn clear_document() -> c_int {
    let mut s = state();
    if let Some(code) = bump(&mut s, Operation::ClearDocument) {
        return code;
    }
    if !s.initialized {
        return codes::NOT_INITIALIZED;
    }
    if s.documents_pending == 0 {
        return codes::SCAN_NO_CHEQUES;
    }
    // Clearing a staged document reports it as a pre-fed double.
    s.documents_pending -= 1;
    codes::SCAN_DOUBLE_FEED
}

unsafe extern "system" fn calibrate(mode: c_int) -> c_int {
    let mut s = state();
    if let Some(code) = bump(&mut s, Operation::Calibrate) {
        return code;
    }
    if !s.initialized {
        return codes::NOT_INITIALIZED;
    }
    if !matches!(mode, 0 | 1) {
        return codes::VALUE_OUT_OF_RANGE;
    }
    0
}

unsafe extern "system" fn set_param(param: c_int, value: c_int) -> c_int {
    let mut s = state();
    if let Some(code) = bump(&mut s, Operation::SetParam) {
        return code;
    }
    s.int_params.insert(param, value);
    0
}

unsafe extern "system" fn get_param(param: c_int) -> c_int {
    let mut s = state();
    if let Some(code) = bump(&mut s, Operation::GetParam) {
        return code;
    }
    s.int_params.get(&param).copied().unwrap_or(0)
}

unsafe extern "system" fn scan(
    front_tiff: *const c_char,
    back_tiff: *const c_char,
    front_jpeg: *const c_char,
    back_jpeg: *const c_char,
    micr: *mut c_char,
    image_quality: *mut c_int,
    contrast: *mut c_int,
    doc_status: *mut c_int,
) -> c_int {
    let mut s = state();
    if let Some(code) = bump(&mut s, Operation::Scan) {
        return code;
    }
    if !s.initialized {
        return codes::NOT_INITIALIZED;
    }
    if s.documents_pending == 0 {
        // SAFETY: out-buffers have the contract-fixed shapes.
        unsafe { clear_outputs(micr, image_quality, contrast, doc_status) };
        return codes::SCAN_NO_CHEQUES;
    }
    s.documents_pending -= 1;
    drop(s);

    for (path, magic) in [
        (front_tiff, TIFF_MAGIC),
        (back_tiff, TIFF_MAGIC),
        (front_jpeg, JPEG_MAGIC),
        (back_jpeg, JPEG_MAGIC),
    ] {
        // SAFETY: each path argument is null or NUL-terminated.
        if let Some(path) = unsafe { path_argument(path) } {
            if std::fs::write(&path, magic).is_err() {
                return codes::IMAGE_FILE_CREATE;
            }
        }
    }

    // SAFETY: out-buffers have the contract-fixed shapes (80 bytes of
    // MICR, 32 status ints, two scalar ints).
    unsafe {
        write_micr(micr);
        if !image_quality.is_null() {
            *image_quality = SAMPLE_IMAGE_QUALITY;
        }
        if !contrast.is_null() {
            *contrast = SAMPLE_CONTRAST;
        }
        write_doc_status(doc_status);
    }
    0
}

unsafe fn path_argument(ptr: *const c_char) -> Option<PathBuf> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null and NUL-terminated per the API contract.
    let text = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
    if text.is_empty() {
        None
    } else {
        Some(PathBuf::from(text))
    }
}

unsafe fn write_micr(out: *mut c_char) {
    if out.is_null() {
        return;
    }
    let mut line = Vec::with_capacity(MICR_BUFFER_LEN);
    line.extend_from_slice(SAMPLE_MICR.as_bytes());
    line.extend_from_slice(b"  ");
    line.resize(MICR_BUFFER_LEN, 0);
    // SAFETY: the caller hands an 80-byte buffer per the API contract.
    unsafe { std::ptr::copy_nonoverlapping(line.as_ptr(), out.cast::<u8>(), MICR_BUFFER_LEN) };
}

unsafe fn write_doc_status(out: *mut c_int) {
    if out.is_null() {
        return;
    }
    // First slot flags that a document went through; the rest stay zero.
    let mut status = [0 as c_int; DOC_STATUS_SLOTS];
    status[0] = 1;
    // SAFETY: the caller hands a 32-int buffer per the API contract.
    unsafe { std::ptr::copy_nonoverlapping(status.as_ptr(), out, DOC_STATUS_SLOTS) };
}

unsafe fn clear_outputs(
    micr: *mut c_char,
    image_quality: *mut c_int,
    contrast: *mut c_int,
    doc_status: *mut c_int,
) {
    // SAFETY: same buffer shapes as the filled case.
    unsafe {
        if !micr.is_null() {
            std::ptr::write_bytes(micr, 0, MICR_BUFFER_LEN);
        }
        if !image_quality.is_null() {
            *image_quality = 0;
        }
        if !contrast.is_null() {
            *contrast = 0;
        }
        if !doc_status.is_null() {
            std::ptr::write_bytes(doc_status, 0, DOC_STATUS_SLOTS);
        }
    }
}

/// Reset the virtual scanner to power-on state: parameters, feeder,
/// counters, and forced results all cleared.
pub fn reset() {
    *state() = StubState::empty();
}

/// Stage `count` documents in the virtual feeder.
pub fn feed_documents(count: u32) {
    state().documents_pending += count;
}

/// Documents still waiting in the virtual feeder.
pub fn documents_pending() -> u32 {
    state().documents_pending
}

/// Force the next call to `operation` to return `code` instead of running
/// the normal script. One-shot.
pub fn force_result(operation: Operation, code: i32) {
    state().forced.insert(operation, code);
}

/// How many times `operation` ran since the last reset.
pub fn call_count(operation: Operation) -> u32 {
    state().calls.get(&operation).copied().unwrap_or(0)
}

/// Calls across all entry points since the last reset.
pub fn total_calls() -> u32 {
    state().calls.values().sum()
}

/// Last value stored for an integer parameter.
pub fn int_param(param: i32) -> Option<i32> {
    state().int_params.get(&param).copied()
}

/// Last value stored for a string parameter.
pub fn string_param_value(param: i32) -> Option<String> {
    state().string_params.get(&param).cloned()
}

/// Whether `BUICInit` has succeeded since the last reset or exit.
pub fn initialized() -> bool {
    state().initialized
}

/// Whether the transport is in a cleaning pass.
pub fn cleaning() -> bool {
    state().cleaning
}

/// The virtual scanner's entry-point table.
pub fn function_table() -> FunctionTable {
    FunctionTable {
        set_param_string,
        init,
        usb_scanner_available,
        exit,
        eject_document,
        eject_pocket,
        clean_mode,
        clear_document,
        calibrate,
        set_param,
        get_param,
        scan,
    }
}

/// A `VendorLibrary` backed by the virtual scanner.
pub fn vendor_library() -> VendorLibrary {
    tracing::warn!("using in-process virtual scanner, no real hardware attached");
    VendorLibrary::from_table(function_table())
}

#[cfg(test)]
mod tests {
    use std::ffi::CString;

    use super::*;

    static GUARD: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        GUARD.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[test]
    fn init_requires_the_ini_path() {
        let _guard = serial();
        reset();
        let table = function_table();

        // SAFETY: stub entry points uphold the vendor ABI.
        unsafe {
            assert_eq!((table.init)(), codes::INI_NOT_FOUND);

            let ini = CString::new("/opt/buic/scanner.ini").unwrap();
            assert_eq!(
                (table.set_param_string)(string_param::CFG_INIPATH, ini.as_ptr()),
                0
            );
            assert_eq!((table.init)(), 0);
        }
        assert!(initialized());
        assert_eq!(call_count(Operation::Init), 2);
    }

    #[test]
    fn forced_results_are_one_shot() {
        let _guard = serial();
        reset();
        let table = function_table();

        force_result(Operation::GetParam, -42);
        // SAFETY: stub entry points uphold the vendor ABI.
        unsafe {
            assert_eq!((table.get_param)(7), -42);
            assert_eq!((table.get_param)(7), 0);
        }
        assert_eq!(call_count(Operation::GetParam), 2);
    }

    #[test]
    fn empty_track_reports_no_cheques_and_zeroed_outputs() {
        let _guard = serial();
        reset();
        let table = function_table();

        let mut micr = [1 as c_char; MICR_BUFFER_LEN];
        let mut quality: c_int = 99;
        let mut contrast: c_int = 99;
        let mut status = [9 as c_int; DOC_STATUS_SLOTS];

        // SAFETY: stub entry points uphold the vendor ABI.
        unsafe {
            let ini = CString::new("/opt/buic/scanner.ini").unwrap();
            (table.set_param_string)(string_param::CFG_INIPATH, ini.as_ptr());
            (table.init)();

            let code = (table.scan)(
                std::ptr::null(),
                std::ptr::null(),
                std::ptr::null(),
                std::ptr::null(),
                micr.as_mut_ptr(),
                &mut quality,
                &mut contrast,
                status.as_mut_ptr(),
            );
            assert_eq!(code, codes::SCAN_NO_CHEQUES);
        }
        assert!(micr.iter().all(|&b| b == 0));
        assert_eq!(quality, 0);
        assert_eq!(contrast, 0);
        assert!(status.iter().all(|&slot| slot == 0));
    }

    #[test]
    fn exit_returns_the_feeder_to_power_on_state() {
        let _guard = serial();
        reset();
        let table = function_table();

        // SAFETY: stub entry points uphold the vendor ABI.
        unsafe {
            let ini = CString::new("/opt/buic/scanner.ini").unwrap();
            (table.set_param_string)(string_param::CFG_INIPATH, ini.as_ptr());
            (table.init)();
            feed_documents(3);
            assert_eq!((table.exit)(), 0);
        }
        assert!(!initialized());
        assert_eq!(documents_pending(), 0);
    }
}

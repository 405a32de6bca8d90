// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The vendor result-code dictionary.
//
// Every entry point returns an `int`; negative values are diagnoses from
// this table. Codes the wrapper logic refers to by name get a constant.

use std::borrow::Cow;

/// The driver INI file named by `CFG_INIPATH` was not found.
pub const INI_NOT_FOUND: i32 = -101;
/// A parameter identifier the library does not know.
pub const INVALID_PARAMETER: i32 = -107;
/// A parameter value outside its documented range.
pub const VALUE_OUT_OF_RANGE: i32 = -109;
/// `BUICInit` has not run and the operation needs it.
pub const NOT_INITIALIZED: i32 = -203;
/// Document jammed in the transport.
pub const DOCUMENT_JAM: i32 = -207;
/// The track is empty; nothing to scan, eject, or clear.
pub const SCAN_NO_CHEQUES: i32 = -212;
/// Two documents fed together, or a cleared document had been fed ahead.
pub const SCAN_DOUBLE_FEED: i32 = -217;
/// Pocket number outside the device's pocket count.
pub const INVALID_POCKET: i32 = -219;
/// Eject direction not supported by this transport.
pub const EJECT_UNSUPPORTED: i32 = -220;
/// An output image file could not be created.
pub const IMAGE_FILE_CREATE: i32 = -230;

static DESCRIPTIONS: &[(i32, &str)] = &[
    (-1, "general failure"),
    (-2, "function not supported by this scanner model"),
    (-3, "driver busy with a previous call"),
    (INI_NOT_FOUND, "scanner INI file not found"),
    (-102, "scanner configuration directory not found"),
    (-103, "support DLL could not be loaded"),
    (-104, "firmware file not found"),
    (-105, "font file not found"),
    (-106, "INI file entry missing or malformed"),
    (INVALID_PARAMETER, "invalid parameter identifier"),
    (-108, "parameter is read-only"),
    (VALUE_OUT_OF_RANGE, "parameter value out of range"),
    (-201, "scanner not found on the USB bus"),
    (-202, "scanner communication timeout"),
    (NOT_INITIALIZED, "scanner not initialized"),
    (-204, "firmware download failed"),
    (-205, "track sensor failure"),
    (DOCUMENT_JAM, "document jam in the transport"),
    (-210, "feeder empty"),
    (-211, "pocket full"),
    (SCAN_NO_CHEQUES, "no document present in the track"),
    (-215, "document skew exceeded the limit"),
    (SCAN_DOUBLE_FEED, "double document feed detected"),
    (INVALID_POCKET, "invalid pocket selection"),
    (EJECT_UNSUPPORTED, "eject direction not supported"),
    (IMAGE_FILE_CREATE, "image file could not be created"),
    (-231, "image compression failed"),
    (-232, "MICR read failed"),
    (-240, "calibration failed"),
    (-241, "calibration data could not be saved"),
    (-242, "docket port not present on this scanner"),
];

/// Dictionary text for a result code, if the code is known.
pub fn lookup(code: i32) -> Option<&'static str> {
    DESCRIPTIONS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, text)| *text)
}

/// Dictionary text for a result code. Total: unknown codes come back as
/// `"unknown error (code N)"` so the number is never lost.
pub fn describe(code: i32) -> Cow<'static, str> {
    match lookup(code) {
        Some(text) => Cow::Borrowed(text),
        None => Cow::Owned(format!("unknown error (code {code})")),
    }
}

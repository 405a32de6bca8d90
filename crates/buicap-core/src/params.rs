// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parameter identifiers and their documented value sets.
//
// The vendor API is keyed entirely on integer identifiers: string-valued
// parameters go through `BUICSetParamString`, integer-valued ones through
// `BUICSetParam`/`BUICGetParam`.

/// Identifiers accepted by `BUICSetParamString`.
pub mod string_param {
    /// Driver INI file. Must be set before `BUICInit`.
    pub const CFG_INIPATH: i32 = 1;
    /// Directory holding the scanner configuration files.
    pub const CFG_CFGPATH: i32 = 2;
    /// Directory holding the vendor's support DLLs.
    pub const CFG_DLLPATH: i32 = 3;
    /// Firmware image downloaded to the device on init.
    pub const CFG_FIRMWAREPATH: i32 = 4;
    /// Endorser font directory.
    pub const CFG_FONTPATH: i32 = 5;
    /// Font file used by the size-12 inkjet endorser face.
    pub const CFG_IJPRINTER_FONT12FILENAME: i32 = 6;
    /// Transport type, as a decimal code (see `ScannerType`).
    pub const CFG_SCANNERTYPE: i32 = 7;
    /// MICR read method, `"US"` or `"HTL"`.
    pub const CFG_MICR_METHOD: i32 = 8;
}

/// Identifiers accepted by `BUICSetParam`/`BUICGetParam`.
pub mod param {
    /// Track mode for the next scan pass (see [`super::scan_mode`]).
    pub const CFG_MISC_SCAN_MODE: i32 = 100;
    /// Feeder behavior: 0 manual drop, 1 autofeed.
    pub const CFG_FEEDER_MODE: i32 = 101;
    /// Double-feed detection on/off.
    pub const CFG_DOUBLEFEED_DETECT: i32 = 102;
    /// Front image resolution (see [`super::dpi`]).
    pub const CFG_IMAGE_FRONT_DPI: i32 = 110;
    /// Rear image resolution (see [`super::dpi`]).
    pub const CFG_IMAGE_BACK_DPI: i32 = 111;
    /// Output encoding (see [`super::image_format`]).
    pub const CFG_IMAGE_FORMAT: i32 = 112;
    /// Image quality analysis on/off.
    pub const CFG_IMAGE_QUALITY_TEST: i32 = 113;
    /// MICR reader on/off.
    pub const CFG_MICR_ENABLE: i32 = 120;
    /// MICR font (see [`super::micr_font`]).
    pub const CFG_MICR_FONT: i32 = 121;
    /// Keep inter-field spaces in the decoded MICR line.
    pub const CFG_MICR_SPACES: i32 = 122;
    /// Endorser on/off.
    pub const CFG_ENDORSER_ENABLE: i32 = 130;
    /// Auxiliary OCR reader on/off.
    pub const CFG_AUXREADER_ENABLE: i32 = 140;
}

/// Values for [`param::CFG_MISC_SCAN_MODE`].
pub mod scan_mode {
    /// One document per call, operator-fed.
    pub const NORMAL: i32 = 0;
    /// Continuous feed from the hopper.
    pub const BATCH: i32 = 1;
    /// Kiosk front-feed: the document returns to the presenter.
    pub const KIOSK: i32 = 2;
}

/// Values for the image DPI parameters.
pub mod dpi {
    pub const DPI_100: i32 = 100;
    pub const DPI_200: i32 = 200;
    pub const DPI_300: i32 = 300;
}

/// Values for [`param::CFG_MICR_FONT`].
pub mod micr_font {
    pub const E13B: i32 = 0;
    pub const CMC7: i32 = 1;
}

/// Values for [`param::CFG_IMAGE_FORMAT`].
pub mod image_format {
    pub const TIFF_G4: i32 = 0;
    pub const JPEG: i32 = 1;
    pub const BMP: i32 = 2;
}

/// On/off values for the boolean-valued parameters.
pub mod switch {
    pub const OFF: i32 = 0;
    pub const ON: i32 = 1;
}

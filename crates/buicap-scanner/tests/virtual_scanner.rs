// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end tests of the facade wired to the in-process virtual scanner.
//
// The virtual scanner keeps process-wide state, so every test that touches
// it takes the shared guard and starts from a reset.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use buicap_core::codes;
use buicap_core::error::{BuicapError, Operation};
use buicap_core::params::{param, scan_mode, string_param, switch};
use buicap_core::types::{EjectDirection, ScanOutputs, ScanResult, ScannerModel};
use buicap_ffi::stub;
use buicap_scanner::{MicrMethod, Scanner, ScannerSetup, ScannerType};

static GUARD: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
    GUARD.lock().unwrap_or_else(PoisonError::into_inner)
}

fn virtual_scanner() -> Scanner {
    stub::reset();
    Scanner::with_library(stub::vendor_library())
}

fn initialized_scanner() -> Scanner {
    let mut scanner = virtual_scanner();
    scanner
        .set_param_string(string_param::CFG_INIPATH, "/opt/buic/scanner.ini")
        .unwrap();
    assert_eq!(scanner.init().unwrap(), 0);
    scanner
}

#[test]
fn open_missing_library_fails_without_loading() {
    let err = Scanner::open("/does/not/exist/buicap32.dll").unwrap_err();
    assert!(matches!(err, BuicapError::LibraryNotFound(_)));
}

#[test]
fn operations_require_a_loaded_library() {
    let _guard = serial();
    let mut scanner = virtual_scanner();
    scanner.close();

    let err = scanner.init().unwrap_err();
    assert!(matches!(
        err,
        BuicapError::NotLoaded {
            operation: Operation::Init
        }
    ));
    assert!(err.to_string().contains("BUICInit"));

    assert!(scanner.set_param(param::CFG_MISC_SCAN_MODE, 0).is_err());
    assert!(scanner.get_param(param::CFG_MISC_SCAN_MODE).is_err());
    assert!(scanner.eject_document().is_err());
    assert!(scanner.scan(&ScanOutputs::default()).is_err());
    assert!(scanner.usb_scanner_status().is_err());

    // close() issued the one BUICExit; nothing else reached the library.
    assert_eq!(stub::total_calls(), 1);
    assert_eq!(stub::call_count(Operation::Exit), 1);
}

#[test]
fn init_without_ini_path_is_a_vendor_error() {
    let _guard = serial();
    let mut scanner = virtual_scanner();

    match scanner.init().unwrap_err() {
        BuicapError::Vendor {
            operation,
            code,
            description,
        } => {
            assert_eq!(operation, Operation::Init);
            assert_eq!(code, codes::INI_NOT_FOUND);
            assert!(description.contains("INI"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn setup_applies_parameters_before_init() {
    let _guard = serial();
    let mut scanner = virtual_scanner();

    let setup = ScannerSetup {
        ini_path: Some("/opt/buic/scanner.ini".into()),
        cfg_path: Some("/opt/buic/cfg".into()),
        scanner_type: Some(ScannerType::Usb),
        micr_method: Some(MicrMethod::Us),
        ..Default::default()
    };
    setup.apply(&mut scanner).unwrap();

    assert_eq!(
        stub::string_param_value(string_param::CFG_INIPATH).as_deref(),
        Some("/opt/buic/scanner.ini")
    );
    assert_eq!(
        stub::string_param_value(string_param::CFG_SCANNERTYPE).as_deref(),
        Some("200")
    );
    assert_eq!(
        stub::string_param_value(string_param::CFG_MICR_METHOD).as_deref(),
        Some("US")
    );
    assert_eq!(scanner.init().unwrap(), 0);
}

#[test]
fn usb_probe_reports_the_attached_model() {
    let _guard = serial();
    let mut scanner = virtual_scanner();

    let status = scanner.usb_scanner_status().unwrap();
    assert!(status.is_available());
    assert_eq!(status.vendor_id, stub::USB_VENDOR_ID);
    assert_eq!(status.product_id, stub::USB_PRODUCT_ID);
    assert_eq!(status.model(), Some(ScannerModel::Cx30));
}

#[test]
fn eject_with_an_empty_track_is_benign() {
    let _guard = serial();
    let mut scanner = initialized_scanner();

    assert_eq!(scanner.eject_document().unwrap(), codes::SCAN_NO_CHEQUES);

    stub::feed_documents(1);
    assert_eq!(scanner.eject_document().unwrap(), 0);
}

#[test]
fn eject_pocket_validates_the_pocket_number() {
    let _guard = serial();
    let mut scanner = initialized_scanner();

    let err = scanner
        .eject_pocket(EjectDirection::Forward, 2)
        .unwrap_err();
    assert!(matches!(
        err,
        BuicapError::InvalidArgument {
            operation: Operation::EjectPocket,
            ..
        }
    ));
    assert_eq!(stub::call_count(Operation::EjectPocket), 0);

    stub::feed_documents(1);
    assert_eq!(scanner.eject_pocket(EjectDirection::Kiosk, 0).unwrap(), 0);
    assert_eq!(stub::call_count(Operation::EjectPocket), 1);
}

#[test]
fn mode_arguments_are_range_checked_before_any_call() {
    let _guard = serial();
    let mut scanner = initialized_scanner();

    assert!(matches!(
        scanner.clean_mode(2),
        Err(BuicapError::InvalidArgument { .. })
    ));
    assert!(matches!(
        scanner.calibrate(-1),
        Err(BuicapError::InvalidArgument { .. })
    ));
    assert_eq!(stub::call_count(Operation::CleanMode), 0);
    assert_eq!(stub::call_count(Operation::Calibrate), 0);

    assert_eq!(scanner.clean_mode(1).unwrap(), 0);
    assert!(stub::cleaning());
    assert_eq!(scanner.clean_mode(0).unwrap(), 0);
    assert!(!stub::cleaning());
    assert_eq!(scanner.calibrate(1).unwrap(), 0);
}

#[test]
fn clear_document_distinguishes_track_states() {
    let _guard = serial();
    let mut scanner = initialized_scanner();

    assert_eq!(scanner.clear_document().unwrap(), codes::SCAN_NO_CHEQUES);

    stub::feed_documents(1);
    assert_eq!(scanner.clear_document().unwrap(), codes::SCAN_DOUBLE_FEED);
    assert_eq!(stub::documents_pending(), 0);
}

#[test]
fn calibrate_needs_an_initialized_scanner() {
    let _guard = serial();
    let mut scanner = virtual_scanner();

    match scanner.calibrate(0).unwrap_err() {
        BuicapError::Vendor { code, .. } => assert_eq!(code, codes::NOT_INITIALIZED),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejected_parameters_report_id_and_description() {
    let _guard = serial();
    let mut scanner = virtual_scanner();

    stub::force_result(Operation::SetParamString, codes::INVALID_PARAMETER);
    let err = scanner
        .set_param_string(string_param::CFG_FONTPATH, "/opt/buic/fonts")
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains(&format!("parameter {}", string_param::CFG_FONTPATH)));
    assert!(message.contains("invalid parameter identifier"));

    stub::force_result(Operation::SetParam, codes::VALUE_OUT_OF_RANGE);
    let err = scanner
        .set_param(param::CFG_IMAGE_FRONT_DPI, 999)
        .unwrap_err();
    assert!(matches!(
        err,
        BuicapError::ParamRejected {
            code: codes::VALUE_OUT_OF_RANGE,
            ..
        }
    ));
}

#[test]
fn unexpected_vendor_codes_carry_dictionary_text() {
    let _guard = serial();
    let mut scanner = initialized_scanner();

    stub::force_result(Operation::EjectDocument, codes::DOCUMENT_JAM);
    let message = scanner.eject_document().unwrap_err().to_string();
    assert!(message.contains("BUICEjectDocument"));
    assert!(message.contains("jam"));
    assert!(message.contains("-207"));
}

#[test]
fn parameters_round_trip_through_the_library() {
    let _guard = serial();
    let mut scanner = initialized_scanner();

    scanner
        .set_param(param::CFG_MISC_SCAN_MODE, scan_mode::KIOSK)
        .unwrap();
    assert_eq!(
        stub::int_param(param::CFG_MISC_SCAN_MODE),
        Some(scan_mode::KIOSK)
    );
    assert_eq!(
        scanner.get_param(param::CFG_MISC_SCAN_MODE).unwrap(),
        scan_mode::KIOSK
    );

    scanner.set_param(param::CFG_MICR_ENABLE, switch::ON).unwrap();
    assert_eq!(scanner.get_param(param::CFG_MICR_ENABLE).unwrap(), switch::ON);

    // Unset parameters read back as the driver default.
    assert_eq!(scanner.get_param(param::CFG_FEEDER_MODE).unwrap(), 0);
}

#[test]
fn scan_with_no_outputs_is_structurally_complete() {
    let _guard = serial();
    let mut scanner = initialized_scanner();
    stub::feed_documents(1);

    let result = scanner.scan(&ScanOutputs::default()).unwrap();
    assert_eq!(result.code, 0);
    assert_eq!(result.micr, stub::SAMPLE_MICR);
    assert_eq!(result.image_quality, stub::SAMPLE_IMAGE_QUALITY);
    assert_eq!(result.contrast, stub::SAMPLE_CONTRAST);
    assert_eq!(result.doc_status[0], 1);
}

#[test]
fn scan_writes_only_the_requested_files() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let front_jpeg = dir.path().join("front.jpg");
    let back_jpeg = dir.path().join("back.jpg");

    let mut scanner = initialized_scanner();
    stub::feed_documents(1);

    let outputs = ScanOutputs {
        front_jpeg: Some(front_jpeg.clone()),
        back_jpeg: Some(back_jpeg.clone()),
        ..Default::default()
    };
    let result = scanner.scan(&outputs).unwrap();
    assert_eq!(result.code, 0);
    assert!(front_jpeg.exists());
    assert!(back_jpeg.exists());
    // The TIFF slots were null, so exactly two files appeared.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);

    let header = std::fs::read(&front_jpeg).unwrap();
    assert_eq!(&header[..2], &[0xFF, 0xD8]);
}

#[test]
fn scan_with_an_empty_track_reports_no_cheques() {
    let _guard = serial();
    let mut scanner = initialized_scanner();

    let result = scanner.scan(&ScanOutputs::default()).unwrap();
    assert_eq!(result.code, codes::SCAN_NO_CHEQUES);
    assert!(result.micr.is_empty());
}

#[test]
fn scan_rejects_a_path_with_an_interior_nul() {
    let _guard = serial();
    let mut scanner = initialized_scanner();
    stub::feed_documents(1);

    let outputs = ScanOutputs {
        front_tiff: Some(PathBuf::from("front\0.tif")),
        ..Default::default()
    };
    let err = scanner.scan(&outputs).unwrap_err();
    assert!(matches!(err, BuicapError::InvalidArgument { .. }));
    assert_eq!(stub::call_count(Operation::Scan), 0);
}

#[test]
fn scan_result_serializes_for_embedders() {
    let _guard = serial();
    let mut scanner = initialized_scanner();
    stub::feed_documents(1);

    let result = scanner.scan(&ScanOutputs::default()).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"micr\""));

    let back: ScanResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.micr, result.micr);
    assert_eq!(back.code, result.code);
}

#[test]
fn close_is_idempotent() {
    let _guard = serial();
    let mut scanner = initialized_scanner();
    assert!(scanner.is_loaded());

    assert_eq!(scanner.close(), 0);
    assert!(!scanner.is_loaded());
    assert_eq!(scanner.close(), 0);

    assert_eq!(stub::call_count(Operation::Exit), 1);
    assert!(!stub::initialized());
}

#[test]
fn dropping_a_loaded_scanner_shuts_it_down() {
    let _guard = serial();
    {
        let _scanner = initialized_scanner();
    }
    assert_eq!(stub::call_count(Operation::Exit), 1);
    assert!(!stub::initialized());
}

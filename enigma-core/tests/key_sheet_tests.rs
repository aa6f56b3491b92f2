#![allow(missing_docs)]
use enigma_core::key_generator::{KeyOptions, generate_key_sheet};
use enigma_core::key_sheet::{self, KeySheet};
use enigma_core::{EnigmaError, Stepping};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_save_and_load_key_sheet() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("key.json");

    let sheet = KeySheet::from_presets(&["II", "IV", "V"], "B", &["AV", "BS", "CG"], "BLA")
        .expect("Failed to build key sheet");
    key_sheet::save_key_sheet(&path, &sheet).expect("Failed to save key sheet");
    let loaded = key_sheet::load_key_sheet(&path).expect("Failed to load key sheet");

    assert_eq!(sheet, loaded);
    assert_eq!(
        sheet.fingerprint().expect("Invalid sheet"),
        loaded.fingerprint().expect("Invalid sheet")
    );
}

#[test]
fn test_generated_sheet_survives_disk() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("generated.json");
    let options = KeyOptions {
        rotors: 4,
        plug_pairs: 6,
        stepping: Stepping::DoubleStep,
    };
    let sheet = generate_key_sheet(&mut StdRng::seed_from_u64(42), &options)
        .expect("Failed to generate key sheet");
    key_sheet::save_key_sheet(&path, &sheet).expect("Failed to save key sheet");

    let machine = key_sheet::load_key_sheet(&path)
        .expect("Failed to load key sheet")
        .build_machine()
        .expect("Generated sheet should be valid");
    assert_eq!(machine.rotor_count(), 4);
    assert_eq!(machine.stepping(), Stepping::DoubleStep);

    let (ciphertext, _) = machine.process_text("WETTERBERICHT").expect("Encipher failed");
    let (plaintext, _) = machine.process_text(&ciphertext).expect("Decipher failed");
    assert_eq!(plaintext, "WETTERBERICHT");
}

#[test]
fn test_load_missing_file_is_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let err = key_sheet::load_key_sheet(&temp_dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, EnigmaError::Io(_)));
}

#[test]
fn test_load_garbage_is_json_error() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{ not json").expect("Failed to write file");
    let err = key_sheet::load_key_sheet(&path).unwrap_err();
    assert!(matches!(err, EnigmaError::Json(_)));
}

#[test]
fn test_tampered_sheet_fails_validation() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("tampered.json");
    let mut sheet = KeySheet::from_presets(&["I", "II", "III"], "B", &[], "AAA")
        .expect("Failed to build key sheet");
    sheet.reflector.wiring = "ABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string();
    key_sheet::save_key_sheet(&path, &sheet).expect("Failed to save key sheet");

    let loaded = key_sheet::load_key_sheet(&path).expect("Failed to load key sheet");
    assert!(matches!(
        loaded.build_machine(),
        Err(EnigmaError::Configuration(_))
    ));
}

//! # Configuration Tests

use std::io::Write;
use std::path::Path;

use guestlink_core::Config;
use guestlink_core::config::ConfigError;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert!(!config.general.trace);
    assert!(config.firmware.watch);
    assert_eq!(config.firmware.image, None);
    assert_eq!(config.image_watch().path(), None);
}

#[test]
fn test_empty_document_uses_defaults() {
    let config = Config::from_json_str("{}").unwrap();
    assert!(!config.general.trace);
    assert!(config.firmware.watch);
}

#[test]
fn test_partial_sections_fill_defaults() {
    let config =
        Config::from_json_str(r#"{ "firmware": { "image": "/srv/machine-7/bios.img" } }"#).unwrap();
    assert!(config.firmware.watch);
    assert!(!config.general.trace);
    assert_eq!(
        config.image_watch().path(),
        Some(Path::new("/srv/machine-7/bios.img"))
    );
}

#[test]
fn test_disabled_watch_observes_nothing() {
    let config = Config::from_json_str(
        r#"{
            "general": { "trace": true },
            "firmware": { "image": "bios.img", "watch": false }
        }"#,
    )
    .unwrap();
    assert!(config.general.trace);
    assert_eq!(config.image_watch().path(), None);
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "general": {{ "trace": true }} }}"#).unwrap();
    file.flush().unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.general.trace);
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("guestlink.json");
    match Config::from_file(&missing) {
        Err(ConfigError::Read { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn test_malformed_document_is_parse_error() {
    let err = Config::from_json_str(r#"{ "firmware": { "watch": "yes" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().starts_with("invalid config"));
}

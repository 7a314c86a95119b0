use std::fs;

use fieldweave_config::{ConfigError, ConfigProvider};
use serial_test::serial;
use tempfile::TempDir;

#[test]
#[serial]
fn environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fieldweave.yaml");
    fs::write(&path, "max_path_hops: 4\nexpand_separator: \" | \"\n").unwrap();

    std::env::set_var("FIELDWEAVE_MAX_PATH_HOPS", "8");
    let loaded = ConfigProvider::new().with_file(&path).load();
    std::env::remove_var("FIELDWEAVE_MAX_PATH_HOPS");

    let config = loaded.unwrap();
    assert_eq!(config.max_path_hops, 8);
    assert_eq!(config.expand_separator, " | ");
}

#[test]
#[serial]
fn json_files_are_supported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fieldweave.json");
    fs::write(&path, r#"{"date_time_format": "HH:mm", "max_render_depth": 3}"#).unwrap();

    let config = ConfigProvider::new().with_file(&path).load().unwrap();
    assert_eq!(config.date_time_format, "HH:mm");
    assert_eq!(config.max_render_depth, 3);
}

#[test]
#[serial]
fn wrongly_typed_values_fail_to_parse() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fieldweave.toml");
    fs::write(&path, "max_template_size = \"huge\"\n").unwrap();

    let err = ConfigProvider::new().with_file(&path).load().unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

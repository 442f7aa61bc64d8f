//! Unit tests for configuration loading and saving

use std::fs;

use ripcord::config::Config;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn saved_config_loads_back() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.api.requests_per_second = 0.5;
    config.output.format = "both".to_string();
    config.filters.include_bots = true;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn partial_file_keeps_defaults_for_missing_keys() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[output]\ndirectory = \"~/exports\"\n").unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.output.directory, "~/exports");
    assert_eq!(config.output.format, "json");
    assert_eq!(config.api.page_size, 100);
    assert!(config.output_directory().ends_with("exports"));
}

#[test]
fn out_of_range_values_are_reported() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[api]\npage_size = 250\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid config"));
}

#[test]
fn malformed_toml_is_reported_with_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[api\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

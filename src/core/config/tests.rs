use super::data::Config;
use super::orchestrator::ConfigOrchestrator;
use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::session::ThemeMode;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn config_orchestrator_detects_external_updates() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    let orchestrator = ConfigOrchestrator::new(config_path.clone());

    orchestrator
        .mutate(|config| {
            config.default_model = Some("first".to_string());
            Ok(())
        })
        .expect("mutate failed");

    let persisted = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(persisted.default_model.as_deref(), Some("first"));

    std::thread::sleep(Duration::from_millis(1100));

    let external = Config {
        default_model: Some("second".to_string()),
        ..Default::default()
    };
    external
        .save_to_path(&config_path)
        .expect("external save failed");

    let reloaded = orchestrator.load_with_cache().expect("reload failed");
    assert_eq!(reloaded.default_model.as_deref(), Some("second"));
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_theme_round_trips_through_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.set_theme_mode(ThemeMode::Dark);
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let contents = fs::read_to_string(&config_path).expect("read back");
    assert!(contents.contains("theme = \"dark\""));

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.theme_mode(), Some(ThemeMode::Dark));
}

#[test]
fn test_unknown_theme_is_ignored() {
    let config = Config {
        theme: Some("dracula".to_string()),
        ..Default::default()
    };
    assert_eq!(config.theme_mode(), None);
}

#[test]
fn test_invalid_toml_reports_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "theme = [").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn test_model_and_base_url_resolution() {
    let empty = Config::default();
    assert_eq!(empty.resolve_model(None), DEFAULT_MODEL);
    assert_eq!(empty.resolve_model(Some("  ")), DEFAULT_MODEL);
    assert_eq!(empty.resolve_base_url(), DEFAULT_BASE_URL);

    let config = Config {
        default_model: Some("gemini-pro".to_string()),
        base_url: Some("http://localhost:9999".to_string()),
        ..Default::default()
    };
    assert_eq!(config.resolve_model(None), "gemini-pro");
    assert_eq!(config.resolve_model(Some("gemini-flash")), "gemini-flash");
    assert_eq!(config.resolve_base_url(), "http://localhost:9999");
}

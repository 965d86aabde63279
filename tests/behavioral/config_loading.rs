// ABOUTME: Behavioral tests for configuration loading
// Verifies defaults, partial files and TOML round trips

use skydeck::config::AppConfig;
use std::time::Duration;
use tempfile::TempDir;

/// Test that default config has sensible values for immediate usability
#[test]
fn test_default_config_has_sensible_values() {
    let config = AppConfig::default();

    assert_eq!(config.api.base_url, "http://localhost:8000/api");
    assert_eq!(config.api.token, None);
    assert_eq!(config.wizard.success_delay(), Duration::from_millis(1500));
    assert!(config.ui_preferences.confirm_delete);
    assert_eq!(
        config.version,
        env!("CARGO_PKG_VERSION"),
        "Version should match package version"
    );
}

/// Test that configuration roundtrips through TOML serialization without losing data
#[test]
fn test_config_serialization_roundtrip() {
    let mut config = AppConfig::default();
    config.api.base_url = "https://console.example.com/api".to_string();
    config.api.token = Some("abc123".to_string());
    config.wizard.success_delay_ms = 250;
    config.ui_preferences.output_format = "json".to_string();

    let toml_str = toml::to_string_pretty(&config).expect("Config should serialize to TOML");
    assert!(toml_str.contains("success_delay_ms = 250"));

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, toml_str).unwrap();
    let loaded = AppConfig::load_from_path(&path).unwrap();

    assert_eq!(loaded.api, config.api);
    assert_eq!(loaded.wizard, config.wizard);
    assert_eq!(loaded.ui_preferences, config.ui_preferences);
}

/// Test that malformed files produce an error naming the file
#[test]
fn test_malformed_config_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api\nbase_url = ").unwrap();

    let err = AppConfig::load_from_path(&path).unwrap_err();
    assert!(format!("{err}").contains("config.toml"));
}

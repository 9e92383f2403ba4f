use std::fs;

use chrono::Weekday;
use dash_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.currency.is_empty());
    assert!(!cfg.locale.is_empty());
    assert_eq!(cfg.free_event_limit, 5);
    assert_eq!(cfg.week_start(), Weekday::Mon);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded, Config::default());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.set("monthly_budget", "1250.5").expect("budget");
    cfg.set("week_starts_on", "sunday").expect("week start");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.monthly_budget, 1250.5);
    assert_eq!(loaded.week_start(), Weekday::Sun);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn older_files_without_new_keys_still_load() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "locale": "en-GB", "currency": "GBP" }"#).expect("seed");

    let loaded = ConfigManager::new(path).load().expect("load config");
    assert_eq!(loaded.currency, "GBP");
    assert_eq!(loaded.expiry_warning_days, 3);
    assert!(loaded.ui_color_enabled);
}

#[test]
fn corrupt_file_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").expect("seed");

    let err = ConfigManager::new(path).load().expect_err("corrupt config");
    assert!(matches!(err, ConfigError::Serde(_)));
}

/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use studentdb::app_config::{Config, DatabaseConfig, LogLevel};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert!(config.database.path.ends_with("students.db"));
    assert_eq!(config.database.busy_timeout_ms, 5_000);
    assert!(config.database.foreign_keys);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test that a saved configuration loads back unchanged
#[test]
fn test_saveThenLoad_withCustomValues_shouldRestoreSameConfig() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config {
        database: DatabaseConfig {
            path: "/var/lib/school/students.db".to_string(),
            busy_timeout_ms: 250,
            foreign_keys: false,
        },
        log_level: LogLevel::Warn,
    };
    config.save(&path)?;

    let loaded = Config::load(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}

/// Test that a missing file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    assert!(!path.exists());

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(Config::load(&path)?, config);
    Ok(())
}

/// Test that an existing file wins over defaults
#[test]
fn test_loadOrCreate_withExistingFile_shouldNotOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    std::fs::write(&path, r#"{"database": {"path": ":memory:"}, "log_level": "trace"}"#)?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.log_level, LogLevel::Trace);
    Ok(())
}

/// Test that malformed JSON is reported with the file name
#[test]
fn test_load_withMalformedJson_shouldFailWithContext() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("broken.json");
    std::fs::write(&path, "{ not json")?;

    let err = Config::load(&path).unwrap_err();
    assert!(format!("{}", err).contains("Failed to parse config file"));
    Ok(())
}

/// Test that an unknown log level is rejected
#[test]
fn test_load_withUnknownLogLevel_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    std::fs::write(&path, r#"{"log_level": "verbose"}"#)?;

    assert!(Config::load(&path).is_err());
    Ok(())
}

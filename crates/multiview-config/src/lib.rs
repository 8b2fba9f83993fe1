//! Multiview configuration.
//!
//! TOML-based configuration with serde defaults on every section, so a
//! partial file (or no file at all) yields a usable config.
//!
//! ```rust,no_run
//! use multiview_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    DefaultsConfig, LoggingConfig, MultiviewConfig, ServiceConfig, CONFIG_SCHEMA_VERSION,
};

use multiview_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating a commented
/// default file on first run, and validate the result.
pub fn load_config() -> Result<MultiviewConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<MultiviewConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &MultiviewConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&MultiviewConfig::default());
        assert!(json.contains("\"defaults\""));
        assert!(json.contains("\"service\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"#ffffff\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_from_missing_path_is_file_not_found() {
        let err = load_config_from(Path::new("/tmp/multiview_missing_dir/config.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[service]\nevent_capacity = 0\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("service.event_capacity"));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&MultiviewConfig::default());
        let parsed: MultiviewConfig = serde_json::from_str(&json).unwrap();
        assert!(parsed.defaults.auto_focus);
        assert_eq!(parsed.service.event_capacity, 256);
        assert_eq!(parsed.logging.level, "multiview=info");
    }
}

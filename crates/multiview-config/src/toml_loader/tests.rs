//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_parse_error() {
    let result = load_from_path(Path::new("/tmp/nonexistent_multiview_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, multiview_common::ConfigError::ParseError(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[defaults]
auto_focus = false
user_agent = "Kiosk/2.0"

[service]
event_capacity = 32
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert!(!config.defaults.auto_focus);
    assert_eq!(config.defaults.user_agent.as_deref(), Some("Kiosk/2.0"));
    assert_eq!(config.service.event_capacity, 32);
    // Defaults preserved
    assert!(config.defaults.javascript);
    assert!(!config.defaults.file_access);
    assert_eq!(config.defaults.background, "#ffffff");
    assert_eq!(config.logging.level, "multiview=info");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, multiview_common::ConfigError::ParseError(_)));
}

#[test]
fn load_config_with_invalid_values_still_parses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[defaults]\nbackground = \"blue\"\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.defaults.background, "blue");
    assert_eq!(
        config.defaults.background_color(),
        multiview_common::Color::WHITE
    );
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("multiview").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert!(config.defaults.auto_focus);
    assert_eq!(config.service.event_capacity, 256);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::MultiviewConfig;

    let config: MultiviewConfig = toml::from_str(&default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    // dirs::config_dir may be unavailable in minimal CI environments
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("multiview"));
        assert!(path_str.ends_with("config.toml"));
    }
}

#[test]
fn create_default_config_keeps_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[service]\nevent_capacity = 8\n").unwrap();

    create_default_config(&path).unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.service.event_capacity, 8);
}

//! Where the config file lives, and first-run creation.

use std::fs;
use std::path::{Path, PathBuf};

use multiview_common::ConfigError;
use tracing::{debug, info};

use super::template::default_config_toml;

const APP_DIR: &str = "multiview";
const FILE_NAME: &str = "config.toml";

/// `<platform config dir>/multiview/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the commented template to `path`, creating parent directories.
/// An existing file is left untouched.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        debug!(path = %path.display(), "config already present");
        return Ok(());
    }

    let io_err = |action: &str, e: std::io::Error| {
        ConfigError::ParseError(format!("cannot {action} {}: {e}", path.display()))
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| io_err("create directory for", e))?;
    }
    fs::write(path, default_config_toml()).map_err(|e| io_err("write", e))?;

    info!(path = %path.display(), "default config written");
    Ok(())
}

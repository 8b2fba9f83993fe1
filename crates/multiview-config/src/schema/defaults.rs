//! Defaults applied to `createWebview` when the caller omits an option.

use multiview_common::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Focus a webview right after creating it.
    pub auto_focus: bool,
    /// Enable JavaScript in new surfaces.
    pub javascript: bool,
    /// Allow `file://` access in new surfaces.
    pub file_access: bool,
    /// User agent override. `None` keeps the engine's own.
    pub user_agent: Option<String>,
    /// Surface background as `#rrggbb` or `#rrggbbaa`.
    pub background: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            auto_focus: true,
            javascript: true,
            file_access: false,
            user_agent: None,
            background: "#ffffff".into(),
        }
    }
}

impl DefaultsConfig {
    /// Parsed background colour, white when the value is malformed.
    pub fn background_color(&self) -> Color {
        Color::from_hex(&self.background).unwrap_or(Color::WHITE)
    }
}

use multiview_common::Rect;
use multiview_config::schema::DefaultsConfig;
use serde::{Deserialize, Serialize};

/// Options for creating a new webview.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOptions {
    /// URL to load right after creation. Empty or `None` loads nothing.
    pub url: Option<String>,
    /// Initial frame. `None` fills the host.
    pub frame: Option<Rect>,
    /// Focus the new webview even when another one is focused.
    pub auto_focus: bool,
    pub javascript: bool,
    pub file_access: bool,
    pub user_agent: Option<String>,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            url: None,
            frame: None,
            auto_focus: true,
            javascript: true,
            file_access: false,
            user_agent: None,
        }
    }
}

impl CreateOptions {
    /// Default options that load `url`.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Options seeded from the `[defaults]` config section.
    pub fn from_defaults(defaults: &DefaultsConfig) -> Self {
        Self {
            url: None,
            frame: None,
            auto_focus: defaults.auto_focus,
            javascript: defaults.javascript,
            file_access: defaults.file_access,
            user_agent: defaults.user_agent.clone(),
        }
    }
}

/// Snapshot of one entry, as returned by `info` queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebviewInfo {
    pub id: String,
    /// Last URL reported as finished. `null` until the first load completes.
    pub url: Option<String>,
    #[serde(rename = "isHidden")]
    pub hidden: bool,
    #[serde(rename = "isFocused")]
    pub focused: bool,
    pub frame: Option<Rect>,
}

/// Observable state of one entry.
///
/// `VisibleUnfocused` only exists between an explicit `show` and the next
/// focus change, which collapses it back to `Hidden`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    VisibleFocused,
    VisibleUnfocused,
    Hidden,
}

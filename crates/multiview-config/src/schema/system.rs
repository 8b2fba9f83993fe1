//! Service and logging configuration.

use serde::{Deserialize, Serialize};

/// Webview service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Buffered events per subscriber before slow listeners start lagging
    /// (valid range: 1-65536).
    pub event_capacity: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            event_capacity: 256,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "multiview=info".into(),
        }
    }
}

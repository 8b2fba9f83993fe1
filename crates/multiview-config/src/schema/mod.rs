//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod defaults;
mod system;

pub use defaults::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiviewConfig {
    pub defaults: DefaultsConfig,
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
}

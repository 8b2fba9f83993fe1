//! Shared types for the multiview workspace: error kinds, geometry, colour,
//! correlation ids, and a broadcast event bus.

pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ConfigError, MultiviewError, WebviewError};
pub use events::EventBus;
pub use id::new_correlation_id;
pub use types::{Color, Rect};

pub type Result<T> = std::result::Result<T, MultiviewError>;

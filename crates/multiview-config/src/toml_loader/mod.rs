//! Loading `config.toml`, and writing a commented default on first run.

mod loader;
mod paths;
mod template;

#[cfg(test)]
mod tests;

// Public API.
pub use loader::{load_default, load_from_path};
pub use paths::{create_default_config, default_config_path};

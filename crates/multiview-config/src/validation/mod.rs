//! Configuration validation.
//!
//! Collects every problem into a single `ConfigError` rather than stopping
//! at the first one.

mod helpers;


use crate::schema::MultiviewConfig;
use helpers::validate_range;
use multiview_common::{Color, ConfigError};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &MultiviewConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_defaults(&mut errors, config);
    validate_range(
        &mut errors,
        "service.event_capacity",
        config.service.event_capacity,
        1,
        65536,
    );
    if config.logging.level.trim().is_empty() {
        errors.push("logging.level must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_defaults(errors: &mut Vec<String>, config: &MultiviewConfig) {
    let defaults = &config.defaults;

    if Color::from_hex(&defaults.background).is_none() {
        errors.push(format!(
            "defaults.background = '{}' is not a #rrggbb or #rrggbbaa colour",
            defaults.background
        ));
    }

    if let Some(ua) = &defaults.user_agent {
        if ua.trim().is_empty() {
            errors.push("defaults.user_agent must not be empty when set".into());
        } else if ua.contains(['\n', '\r']) {
            errors.push("defaults.user_agent must be a single line".into());
        }
    }
}

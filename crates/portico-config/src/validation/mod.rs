//! Full configuration validation.
//!
//! Each section has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod client;
mod engine;
mod helpers;
mod window;

#[cfg(test)]
mod tests;

use crate::schema::PorticoConfig;
use portico_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &PorticoConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    engine::validate_engine(&mut errors, config);
    window::validate_window(&mut errors, config);
    client::validate_client(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

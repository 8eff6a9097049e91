//! Portico configuration system.
//!
//! Provides TOML-based configuration with full validation and engine
//! data-file discovery. All config sections use defaults so partial
//! configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use portico_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod loader;
pub mod paths;
pub mod schema;
pub mod validation;

pub use paths::find_data_file;
pub use schema::{PorticoConfig, CONFIG_SCHEMA_VERSION};

use portico_common::ConfigError;
use std::path::Path;

pub(crate) const APP_NAME: &str = "portico";

/// Load and validate [`paths::config_file`].
///
/// Writes a commented default file if none exists.
pub fn load_config() -> Result<PorticoConfig, ConfigError> {
    let config = loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &Path) -> Result<PorticoConfig, ConfigError> {
    let config = loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &PorticoConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let config = PorticoConfig::default();
        let json = config_to_json(&config);
        assert!(json.contains("\"engine\""));
        assert!(json.contains("\"window\""));
        assert!(json.contains("\"client\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = PorticoConfig::default();
        let json = config_to_json(&config);
        let parsed: PorticoConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.client.render_handler, "default");
        assert_eq!(parsed.window.width, 1024);
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[window]\nwidth = 0\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}

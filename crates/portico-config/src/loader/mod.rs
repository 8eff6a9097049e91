//! Reading `config.toml`, and seeding a commented one on first run.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use portico_common::ConfigError;
use tracing::{debug, info, warn};

use crate::paths;
use crate::schema::PorticoConfig;
use crate::validation;

mod template;


pub use template::seed_config_toml;

/// Parse the config at `path`.
///
/// Missing sections take their defaults. Values that fail validation are
/// only logged here; [`crate::load_config_from`] rejects them.
pub fn load_from_path(path: &Path) -> Result<PorticoConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let config = parse_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "config does not validate: {e}");
    }
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Parse config text without touching the filesystem.
pub fn parse_str(content: &str) -> Result<PorticoConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load [`paths::config_file`], seeding it on first run.
pub fn load_default() -> Result<PorticoConfig, ConfigError> {
    load_or_seed(&paths::config_file()?)
}

/// Load `path`, or write the commented seed there and return defaults when
/// nothing exists yet.
pub fn load_or_seed(path: &Path) -> Result<PorticoConfig, ConfigError> {
    match load_from_path(path) {
        Err(ConfigError::FileNotFound(_)) => {
            seed(path)?;
            Ok(PorticoConfig::default())
        }
        other => other,
    }
}

/// Write the commented seed config to `path`, creating its directory.
///
/// An existing file is left untouched, so two first runs racing each other
/// cannot clobber an edit.
pub fn seed(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!("failed to create {}: {e}", parent.display()))
        })?;
    }

    let data_root = paths::data_dir().ok();
    let content = seed_config_toml(data_root.as_deref());
    let written = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .and_then(|mut file| file.write_all(content.as_bytes()));
    match written {
        Ok(()) => {
            info!(path = %path.display(), "wrote default config");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "config appeared before seeding; keeping it");
            Ok(())
        }
        Err(e) => Err(ConfigError::ParseError(format!(
            "failed to write {}: {e}",
            path.display()
        ))),
    }
}

//! Portico's directories on disk.
//!
//! `config.toml` lives in [`config_dir`]. Engine data files (resources,
//! locales) are found by [`find_data_file`], searching in order:
//! 1. `$PORTICO_DATA_DIR`
//! 2. the executable's directory and up to four of its ancestors
//! 3. the current working directory
//! 4. the platform data directory (`~/.local/share/portico` on Linux)

use std::path::{Path, PathBuf};

use portico_common::ConfigError;
use tracing::debug;

/// Environment variable that overrides every other search root.
pub const DATA_DIR_ENV: &str = "PORTICO_DATA_DIR";

/// Environment variable that relocates the config directory.
pub const CONFIG_DIR_ENV: &str = "PORTICO_CONFIG_DIR";

/// File name of the config inside [`config_dir`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

const EXE_ANCESTOR_DEPTH: usize = 4;

/// Returns the platform-specific data directory for Portico.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    app_dir(dirs::data_dir(), "data")
}

/// `$PORTICO_CONFIG_DIR`, else the platform config directory for Portico
/// (`~/.config/portico` on Linux).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => app_dir(dirs::config_dir(), "config"),
    }
}

/// Full path of the config file inside [`config_dir`].
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

fn app_dir(base: Option<PathBuf>, kind: &str) -> Result<PathBuf, ConfigError> {
    base.map(|dir| dir.join(crate::APP_NAME))
        .ok_or_else(|| ConfigError::ParseError(format!("could not determine {kind} directory")))
}

/// All roots searched by [`find_data_file`], in priority order.
pub fn data_search_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        roots.push(PathBuf::from(dir));
    }

    if let Ok(exe) = std::env::current_exe() {
        roots.extend(
            exe.ancestors()
                .skip(1)
                .take(EXE_ANCESTOR_DEPTH + 1)
                .map(Path::to_path_buf),
        );
    }

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    if let Ok(dir) = data_dir() {
        roots.push(dir);
    }

    roots.dedup();
    roots
}

/// Locate `relative` under the first search root that contains it.
pub fn find_data_file(relative: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
    find_data_file_in(relative, &data_search_roots())
}

/// Locate `relative` under the first of `roots` that contains it.
pub fn find_data_file_in(
    relative: impl AsRef<Path>,
    roots: &[PathBuf],
) -> Result<PathBuf, ConfigError> {
    let relative = relative.as_ref();
    for root in roots {
        let candidate = root.join(relative);
        if candidate.exists() {
            debug!(path = %candidate.display(), "found data file");
            return Ok(candidate);
        }
    }
    Err(ConfigError::FileNotFound(relative.to_path_buf()))
}

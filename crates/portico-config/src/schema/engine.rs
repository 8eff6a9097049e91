//! Engine process settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity threshold for the engine's own log output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum EngineLogSeverity {
    Verbose,
    Info,
    #[default]
    Warning,
    Error,
    Disable,
}

/// Settings handed to the engine at initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine resource directory. Discovered from the data search path when unset.
    pub resources_dir: Option<PathBuf>,
    /// Engine locale directory. Discovered from the data search path when unset.
    pub locales_dir: Option<PathBuf>,
    pub no_sandbox: bool,
    /// Sleep between idle iterations of the UI loop (valid range: 1-1000).
    pub pump_interval_ms: u32,
    pub log_severity: EngineLogSeverity,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resources_dir: None,
            locales_dir: None,
            no_sandbox: true,
            pump_interval_ms: 10,
            log_severity: EngineLogSeverity::Warning,
        }
    }
}

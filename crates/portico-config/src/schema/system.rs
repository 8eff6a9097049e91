//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[derive(Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// `tracing_subscriber::EnvFilter` directive scoped to the portico crates.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "portico=trace",
            LogLevel::Debug => "portico=debug",
            LogLevel::Info => "portico=info",
            LogLevel::Warning => "portico=warn",
            LogLevel::Error => "portico=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

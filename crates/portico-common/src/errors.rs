use std::path::PathBuf;

use crate::id::BrowserId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures while attaching a render handler to a browser.
///
/// Every variant means the UI side and the renderer side disagree about the
/// protocol or its sequencing. The affected browser is left without a
/// handler; other browsers are unaffected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BindError {
    #[error("no render handler registered under '{0}'")]
    UnknownHandler(String),

    #[error("browser {0} is not tracked")]
    UnknownBrowser(BrowserId),

    #[error("malformed {name} message: {reason}")]
    MalformedMessage { name: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine initialization failed: {0}")]
    InitFailed(String),

    #[error("failed to send process message to browser {browser}: {reason}")]
    SendFailed { browser: BrowserId, reason: String },

    #[error("engine error: {0}")]
    Other(String),
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("engine thread has already been shut down")]
    ShutDown,

    #[error("shutdown must not be called from the engine UI thread")]
    ShutdownOnUiThread,

    #[error("engine thread panicked")]
    ThreadPanicked,

    #[error("{0}")]
    Other(String),
}

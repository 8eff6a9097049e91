//! The seam between the host and a concrete browser engine.
//!
//! Engine objects are reference counted and may be touched from any thread
//! the engine calls back on, so every trait here is `Send + Sync`.
//! Object identity is decided by [`Browser::is_same`], never by comparing
//! `Arc` pointers: an engine may hand out several wrappers for one browser.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use portico_common::{BrowserId, EngineError};
use portico_config::schema::{EngineConfig, EngineLogSeverity};
use tracing::{debug, warn};

use crate::ipc::{ProcessId, ProcessMessage};

/// Shared handle to a browser.
pub type BrowserRef = Arc<dyn Browser>;
pub type FrameRef = Arc<dyn Frame>;
pub type ScriptContextRef = Arc<dyn ScriptContext>;

/// A live browser as seen from either side of the engine.
pub trait Browser: Send + Sync {
    fn id(&self) -> BrowserId;

    /// True if `other` refers to the same underlying browser.
    fn is_same(&self, other: &dyn Browser) -> bool;

    fn send_process_message(
        &self,
        target: ProcessId,
        message: ProcessMessage,
    ) -> Result<(), EngineError>;

    /// Ask the browser to close. With `force`, unload handlers are skipped.
    /// Completion is reported later through `on_before_close`.
    fn close(&self, force: bool);

    fn main_frame(&self) -> Option<FrameRef>;
}

/// A document frame inside a browser.
pub trait Frame: Send + Sync {
    fn url(&self) -> String;

    /// Replace the frame's document with `html`, displayed under `url`.
    fn load_string(&self, html: &str, url: &str);
}

/// A script execution context created inside a frame.
pub trait ScriptContext: Send + Sync {
    fn is_valid(&self) -> bool;
}

/// Process-wide engine entry points, driven from the UI thread only.
pub trait Engine: Send + 'static {
    fn initialize(&mut self, settings: &EngineSettings) -> Result<(), EngineError>;

    /// Run one non-blocking iteration of the engine's own message loop.
    fn do_message_loop_work(&mut self);

    fn shutdown(&mut self);
}

/// Engine resources, relative to a data search root.
pub const RESOURCES_DIR: &str = "libs/engine/res";
pub const LOCALES_DIR: &str = "libs/engine/res/locales/";

/// Resolved settings passed to [`Engine::initialize`].
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub resources_dir: PathBuf,
    pub locales_dir: PathBuf,
    pub no_sandbox: bool,
    pub log_severity: EngineLogSeverity,
    pub pump_interval: Duration,
}

impl EngineSettings {
    /// Resolve configured directories, falling back to the data search path.
    ///
    /// A directory that cannot be found is logged and left relative; the
    /// engine decides whether that is fatal.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            resources_dir: resolve_dir(config.resources_dir.as_deref(), RESOURCES_DIR),
            locales_dir: resolve_dir(config.locales_dir.as_deref(), LOCALES_DIR),
            no_sandbox: config.no_sandbox,
            log_severity: config.log_severity,
            pump_interval: Duration::from_millis(u64::from(config.pump_interval_ms)),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            resources_dir: PathBuf::from(RESOURCES_DIR),
            locales_dir: PathBuf::from(LOCALES_DIR),
            no_sandbox: config.no_sandbox,
            log_severity: config.log_severity,
            pump_interval: Duration::from_millis(u64::from(config.pump_interval_ms)),
        }
    }
}

fn resolve_dir(configured: Option<&Path>, relative: &str) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    match portico_config::find_data_file(relative) {
        Ok(path) => {
            debug!(path = %path.display(), "resolved engine data directory");
            path
        }
        Err(e) => {
            warn!(error = %e, relative, "engine data directory not found, using relative path");
            PathBuf::from(relative)
        }
    }
}

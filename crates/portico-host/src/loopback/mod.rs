//! In-process engine.
//!
//! Both "processes" live in this process and every cross-process hop is a
//! task on the UI queue, so the host can be driven end to end without a
//! real browser engine: process messages, browser creation and close, load
//! errors and script contexts all flow through the same controller and
//! client callbacks a real engine would call.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use portico_common::{BrowserId, EngineError};
use tracing::{debug, info};

use crate::client::BrowserClient;
use crate::controller::Controller;
use crate::engine::{Engine, EngineSettings};

mod browser;

pub use browser::{LoopbackBrowser, LoopbackContext, LoopbackFrame};

static NEXT_BROWSER_ID: AtomicI32 = AtomicI32::new(1);

#[derive(Debug, Default)]
pub struct LoopbackEngine {
    strict: bool,
    initialized: bool,
    pumps: u64,
}

impl LoopbackEngine {
    /// Create a lenient engine that initializes with any settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail initialization when the resources directory does not exist.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

impl Engine for LoopbackEngine {
    fn initialize(&mut self, settings: &EngineSettings) -> Result<(), EngineError> {
        if self.strict && !settings.resources_dir.is_dir() {
            return Err(EngineError::InitFailed(format!(
                "resources directory not found: {}",
                settings.resources_dir.display()
            )));
        }
        info!(
            resources = %settings.resources_dir.display(),
            locales = %settings.locales_dir.display(),
            no_sandbox = settings.no_sandbox,
            log_severity = ?settings.log_severity,
            "loopback engine initialized"
        );
        self.initialized = true;
        Ok(())
    }

    fn do_message_loop_work(&mut self) {
        if self.initialized {
            self.pumps += 1;
        }
    }

    fn shutdown(&mut self) {
        info!(pumps = self.pumps, "loopback engine shut down");
        self.initialized = false;
    }
}

/// Open a browser at `url` for `client`. Must run on the UI thread.
///
/// The renderer side learns about the browser first, then the client gets
/// `on_after_created`, which queues the render handler request.
pub fn create_browser(
    controller: &Arc<Controller>,
    client: &Arc<BrowserClient>,
    url: &str,
) -> Result<Arc<LoopbackBrowser>, EngineError> {
    if !controller.dispatcher().is_ui_thread() {
        return Err(EngineError::Other(
            "browsers must be created on the UI thread".into(),
        ));
    }

    let id = BrowserId(NEXT_BROWSER_ID.fetch_add(1, Ordering::Relaxed));
    let browser = LoopbackBrowser::new(id, url, controller, client);
    debug!(browser_id = %id, url, "creating loopback browser");

    controller.on_browser_created(browser.clone());
    client.on_after_created(browser.clone());
    Ok(browser)
}

#[cfg(test)]
mod tests;

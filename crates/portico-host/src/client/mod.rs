//! UI-side browser client.
//!
//! One `BrowserClient` serves every browser it opens. It keeps the open
//! set, tells the renderer side which render handler each new browser
//! gets, replaces failed loads with an inline error page, and closes
//! everything on request.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use portico_common::{EventBus, HandlerKind, HostEvent};
use tracing::{debug, error, info, warn};

use crate::engine::{BrowserRef, FrameRef};
use crate::ipc::{ProcessId, SetRenderHandler};
use crate::task::{UiDispatcher, UiTask};

pub mod error_page;
mod open_set;

pub use error_page::ERR_ABORTED;
pub use open_set::{OpenBrowserSet, Removal};

/// Browser-process callbacks shared by every browser a client opens.
pub struct BrowserClient {
    render_handler: HandlerKind,
    open: Mutex<OpenBrowserSet>,
    dispatcher: UiDispatcher,
    events: Arc<EventBus>,
}

impl BrowserClient {
    /// Create a client that requests `render_handler` for each browser.
    pub fn new(
        render_handler: HandlerKind,
        dispatcher: UiDispatcher,
        events: Arc<EventBus>,
    ) -> Arc<Self> {
        Arc::new(Self {
            render_handler,
            open: Mutex::new(OpenBrowserSet::new()),
            dispatcher,
            events,
        })
    }

    /// Handler kind requested for every browser this client opens.
    pub fn render_handler(&self) -> &HandlerKind {
        &self.render_handler
    }

    /// Number of browsers created and not yet closed.
    pub fn open_count(&self) -> usize {
        self.open_set().len()
    }

    /// Owned copies of the open browsers, in opening order.
    pub fn open_browsers(&self) -> Vec<BrowserRef> {
        self.open_set().snapshot()
    }

    /// A browser finished creation: record it and ask the renderer side to
    /// bind this client's render handler.
    pub fn on_after_created(&self, browser: BrowserRef) {
        let id = browser.id();
        if !self.open_set().insert(browser.clone()) {
            warn!(browser_id = %id, "after-created reported twice for the same browser");
            return;
        }
        info!(browser_id = %id, handler = %self.render_handler, "browser opened");
        self.events.publish(HostEvent::BrowserOpened(id));

        let request = SetRenderHandler::new(id, self.render_handler.clone());
        if let Err(e) = browser.send_process_message(ProcessId::Renderer, request.to_message()) {
            error!(browser_id = %id, error = %e, "failed to request render handler");
        }
    }

    /// A browser is about to be destroyed.
    pub fn on_before_close(&self, browser: &BrowserRef) {
        let id = browser.id();
        match self.open_set().remove(browser.as_ref()) {
            Removal::Removed => {
                info!(browser_id = %id, "browser closed");
                self.events.publish(HostEvent::BrowserClosed(id));
            }
            Removal::NotOpen => {
                debug!(browser_id = %id, "before-close for a browser not in the open set");
            }
        }
    }

    /// Replace the failed document with an inline error page, unless the
    /// navigation was merely aborted.
    pub fn on_load_error(
        &self,
        browser: &BrowserRef,
        frame: &FrameRef,
        error_code: i32,
        error_text: &str,
        failed_url: &str,
    ) {
        if error_code == ERR_ABORTED {
            debug!(browser_id = %browser.id(), url = failed_url, "load aborted");
            return;
        }
        warn!(
            browser_id = %browser.id(),
            url = failed_url,
            code = error_code,
            error = error_text,
            "load failed"
        );
        let html = error_page::render(failed_url, error_text, error_code);
        frame.load_string(&html, failed_url);
    }

    /// Ask every open browser to close.
    ///
    /// Off the UI thread this re-posts itself to the UI thread and returns
    /// immediately. Browsers leave the open set as their `on_before_close`
    /// arrives, not here.
    pub fn close_all_browsers(self: &Arc<Self>, force: bool) {
        if !self.dispatcher.is_ui_thread() {
            self.dispatcher.post(UiTask::CloseAllBrowsers {
                client: Arc::clone(self),
                force,
            });
            return;
        }

        let browsers = self.open_browsers();
        info!(count = browsers.len(), force, "closing all browsers");
        for browser in browsers {
            browser.close(force);
        }
    }

    fn open_set(&self) -> MutexGuard<'_, OpenBrowserSet> {
        self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

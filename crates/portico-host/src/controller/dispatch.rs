//! Renderer-side engine callbacks.

use portico_common::{BindError, BrowserId, HandlerKind, HostEvent, SET_RENDER_HANDLER};
use tracing::{error, info, trace};

use crate::engine::{BrowserRef, FrameRef, ScriptContextRef};
use crate::ipc::{ProcessId, ProcessMessage, SetRenderHandler};

use super::{lock, Controller};

impl Controller {
    /// The renderer side learned about a new browser.
    pub fn on_browser_created(&self, browser: BrowserRef) {
        info!(browser_id = %browser.id(), "renderer browser created");
        lock(&self.tracker).on_browser_created(browser);
    }

    /// The renderer side lost a browser; its handler is dropped.
    pub fn on_browser_destroyed(&self, browser: &BrowserRef) {
        info!(browser_id = %browser.id(), "renderer browser destroyed");
        lock(&self.tracker).on_browser_destroyed(browser.id());
    }

    /// Forward a new script context to the browser's handler.
    pub fn on_context_created(
        &self,
        browser: &BrowserRef,
        frame: &FrameRef,
        context: &ScriptContextRef,
    ) -> Result<(), BindError> {
        let id = browser.id();
        lock(&self.tracker)
            .dispatch_context_created(id, frame, context)
            .map_err(|e| {
                error!(browser_id = %id, error = %e, "context created for untracked browser");
                e
            })
    }

    /// Route a process message: the bound handler sees it first, then the
    /// reserved `SetRenderHandler` protocol message is interpreted.
    ///
    /// Returns `true` if the message was consumed. A `SetRenderHandler` that
    /// fails to bind still counts as consumed; the failure is logged and
    /// published as [`HostEvent::BindFailed`].
    pub fn on_process_message_received(
        &self,
        browser: &BrowserRef,
        source: ProcessId,
        message: &ProcessMessage,
    ) -> bool {
        let id = browser.id();
        let consumed = lock(&self.tracker).dispatch_to_handler(id, source, message);
        if consumed {
            trace!(browser_id = %id, message = message.name(), "consumed by render handler");
            return true;
        }
        if message.name() != SET_RENDER_HANDLER {
            return false;
        }

        match SetRenderHandler::decode(message) {
            Ok(request) => {
                let _ = self.bind_handler(request.browser, &request.kind);
            }
            Err(e) => {
                error!(browser_id = %id, error = %e, "rejecting render handler request");
                self.events.publish(HostEvent::BindFailed {
                    browser: id,
                    reason: e.to_string(),
                });
            }
        }
        true
    }

    /// Attach a new handler of `kind` to `browser`, replacing any bound one.
    pub fn bind_handler(&self, browser: BrowserId, kind: &HandlerKind) -> Result<(), BindError> {
        let result = lock(&self.tracker).bind_handler(browser, kind, &self.registry);
        match &result {
            Ok(()) => {
                info!(browser_id = %browser, handler = %kind, "render handler bound");
                self.events.publish(HostEvent::HandlerBound {
                    browser,
                    kind: kind.clone(),
                });
            }
            Err(e) => {
                error!(browser_id = %browser, handler = %kind, error = %e, "failed to bind render handler");
                self.events.publish(HostEvent::BindFailed {
                    browser,
                    reason: e.to_string(),
                });
            }
        }
        result
    }
}

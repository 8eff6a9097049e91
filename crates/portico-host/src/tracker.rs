//! Renderer-side bookkeeping of live browsers and their bound handlers.

use std::collections::HashMap;

use portico_common::{BindError, BrowserId, HandlerKind};
use tracing::{debug, warn};

use crate::engine::{BrowserRef, FrameRef, ScriptContextRef};
use crate::handler::RenderHandler;
use crate::ipc::{ProcessId, ProcessMessage};
use crate::registry::RenderHandlerRegistry;

struct BrowserRecord {
    browser: BrowserRef,
    handler: Option<(HandlerKind, Box<dyn RenderHandler>)>,
}

/// Live browsers keyed by id, each with at most one bound handler.
///
/// A record exists from `on_browser_created` until `on_browser_destroyed`.
/// Dropping a record drops its handler.
#[derive(Default)]
pub struct BrowserTracker {
    records: HashMap<BrowserId, BrowserRecord>,
}

impl BrowserTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `browser`. Returns `true` if a stale record with the
    /// same id was replaced.
    pub fn on_browser_created(&mut self, browser: BrowserRef) -> bool {
        let id = browser.id();
        let record = BrowserRecord {
            browser,
            handler: None,
        };
        let replaced = self.records.insert(id, record).is_some();
        if replaced {
            warn!(browser_id = %id, "browser id reused before destroy; dropping stale record");
        }
        replaced
    }

    /// Stop tracking `id`, dropping its handler. Unknown ids are ignored.
    pub fn on_browser_destroyed(&mut self, id: BrowserId) -> bool {
        match self.records.remove(&id) {
            Some(record) => {
                if let Some((kind, _)) = &record.handler {
                    debug!(browser_id = %id, handler = %kind, "dropping render handler");
                }
                true
            }
            None => {
                debug!(browser_id = %id, "destroy for untracked browser ignored");
                false
            }
        }
    }

    /// Build a handler of `kind` and attach it to `id`, replacing any
    /// handler already bound.
    pub fn bind_handler(
        &mut self,
        id: BrowserId,
        kind: &HandlerKind,
        registry: &RenderHandlerRegistry,
    ) -> Result<(), BindError> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(BindError::UnknownBrowser(id))?;
        let handler = registry.create(kind, &record.browser)?;
        if let Some((previous, _)) = record.handler.replace((kind.clone(), handler)) {
            debug!(browser_id = %id, previous = %previous, handler = %kind, "render handler rebound");
        }
        Ok(())
    }

    /// Offer `message` to the handler bound to `id`.
    ///
    /// Returns `false` when the browser is untracked, has no handler, or the
    /// handler declines the message.
    pub fn dispatch_to_handler(
        &mut self,
        id: BrowserId,
        source: ProcessId,
        message: &ProcessMessage,
    ) -> bool {
        let Some(record) = self.records.get_mut(&id) else {
            return false;
        };
        match record.handler.as_mut() {
            Some((_, handler)) => {
                handler.on_process_message_received(&record.browser, source, message)
            }
            None => false,
        }
    }

    /// Forward a new script context to the handler bound to `id`.
    ///
    /// An untracked browser is an error. A tracked browser without a handler
    /// drops the event.
    pub fn dispatch_context_created(
        &mut self,
        id: BrowserId,
        frame: &FrameRef,
        context: &ScriptContextRef,
    ) -> Result<(), BindError> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(BindError::UnknownBrowser(id))?;
        match record.handler.as_mut() {
            Some((_, handler)) => handler.on_context_created(&record.browser, frame, context),
            None => debug!(browser_id = %id, "context created before a handler was bound"),
        }
        Ok(())
    }

    /// Whether `id` is tracked, bound or not.
    pub fn contains(&self, id: BrowserId) -> bool {
        self.records.contains_key(&id)
    }

    /// Kind of the handler bound to `id`, if any.
    pub fn handler_kind(&self, id: BrowserId) -> Option<&HandlerKind> {
        self.records
            .get(&id)
            .and_then(|r| r.handler.as_ref())
            .map(|(kind, _)| kind)
    }

    /// Number of tracked browsers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record. Used during engine teardown.
    pub fn clear(&mut self) {
        if !self.records.is_empty() {
            debug!(count = self.records.len(), "clearing tracked browsers");
        }
        self.records.clear();
    }
}

//! Render handlers shipped with the binary.

use portico_host::engine::{BrowserRef, FrameRef, ScriptContextRef};
use portico_host::{ProcessId, ProcessMessage, RenderHandler};
use tracing::info;

/// Logs every renderer-side event it sees and consumes nothing.
#[derive(Debug, Default)]
pub struct LoggingHandler {
    messages: usize,
    contexts: usize,
}

impl LoggingHandler {
    pub fn factory(browser: &BrowserRef) -> Box<dyn RenderHandler> {
        info!(browser_id = %browser.id(), "logging handler attached");
        Box::new(Self::default())
    }
}

impl RenderHandler for LoggingHandler {
    fn on_process_message_received(
        &mut self,
        browser: &BrowserRef,
        source: ProcessId,
        message: &ProcessMessage,
    ) -> bool {
        self.messages += 1;
        info!(
            browser_id = %browser.id(),
            ?source,
            message = message.name(),
            args = message.args().len(),
            seen = self.messages,
            "process message"
        );
        false
    }

    fn on_context_created(
        &mut self,
        browser: &BrowserRef,
        frame: &FrameRef,
        context: &ScriptContextRef,
    ) {
        self.contexts += 1;
        info!(
            browser_id = %browser.id(),
            url = %frame.url(),
            valid = context.is_valid(),
            seen = self.contexts,
            "script context created"
        );
    }
}

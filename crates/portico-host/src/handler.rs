//! Per-browser render handlers.

use crate::engine::{BrowserRef, FrameRef, ScriptContextRef};
use crate::ipc::{ProcessId, ProcessMessage};

/// Renderer-side customization attached to one browser.
///
/// Handlers are created by a factory in the [`RenderHandlerRegistry`] when
/// the UI side asks for them, and dropped when their browser is destroyed.
/// All calls arrive on the engine UI thread while the tracker is locked, so
/// a handler must not call back into the controller synchronously; post a
/// task with [`Controller::run_on_ui`] instead.
///
/// [`RenderHandlerRegistry`]: crate::registry::RenderHandlerRegistry
/// [`Controller::run_on_ui`]: crate::controller::Controller::run_on_ui
pub trait RenderHandler: Send {
    /// Return `true` if the message was consumed.
    fn on_process_message_received(
        &mut self,
        browser: &BrowserRef,
        source: ProcessId,
        message: &ProcessMessage,
    ) -> bool {
        let _ = (browser, source, message);
        false
    }

    fn on_context_created(
        &mut self,
        browser: &BrowserRef,
        frame: &FrameRef,
        context: &ScriptContextRef,
    ) {
        let _ = (browser, frame, context);
    }
}

/// Builds a fresh handler for a browser.
pub type HandlerFactory = Box<dyn Fn(&BrowserRef) -> Box<dyn RenderHandler> + Send + Sync>;

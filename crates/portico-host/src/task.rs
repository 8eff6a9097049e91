//! Work posted to the engine UI thread.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::thread::{self, ThreadId};

use tokio::sync::mpsc;
use tracing::warn;

use crate::client::BrowserClient;
use crate::engine::BrowserRef;
use crate::ipc::{ProcessId, ProcessMessage};

/// Closure run once on the UI thread.
pub type UiCallback = Box<dyn FnOnce() + Send + 'static>;

/// A unit of work for the UI loop, executed in FIFO order.
pub enum UiTask {
    /// Run an arbitrary closure.
    Run(UiCallback),
    /// Close every browser the client has open.
    CloseAllBrowsers {
        client: Arc<BrowserClient>,
        force: bool,
    },
    /// Deliver a process message to the renderer side.
    DeliverMessage {
        browser: BrowserRef,
        source: ProcessId,
        message: ProcessMessage,
    },
    /// Leave the UI loop. Tasks queued behind it are dropped unrun.
    Quit,
}

impl UiTask {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            UiTask::Run(_) => "run",
            UiTask::CloseAllBrowsers { .. } => "close_all_browsers",
            UiTask::DeliverMessage { .. } => "deliver_message",
            UiTask::Quit => "quit",
        }
    }
}

impl fmt::Debug for UiTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiTask::Run(_) => f.write_str("Run(..)"),
            UiTask::CloseAllBrowsers { force, .. } => f
                .debug_struct("CloseAllBrowsers")
                .field("force", force)
                .finish_non_exhaustive(),
            UiTask::DeliverMessage {
                browser,
                source,
                message,
            } => f
                .debug_struct("DeliverMessage")
                .field("browser", &browser.id())
                .field("source", source)
                .field("message", &message.name())
                .finish(),
            UiTask::Quit => f.write_str("Quit"),
        }
    }
}

pub type UiTaskReceiver = mpsc::UnboundedReceiver<UiTask>;

/// Cloneable handle for posting tasks to the UI loop and asking whether
/// the caller is already on the UI thread.
#[derive(Clone)]
pub struct UiDispatcher {
    sender: mpsc::UnboundedSender<UiTask>,
    ui_thread: Arc<OnceLock<ThreadId>>,
}

impl UiDispatcher {
    /// Create a dispatcher and the receiver the engine thread drains.
    pub fn channel() -> (Self, UiTaskReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let dispatcher = Self {
            sender,
            ui_thread: Arc::new(OnceLock::new()),
        };
        (dispatcher, receiver)
    }

    /// Queue `task`. Returns `false` if the UI loop has already exited.
    pub fn post(&self, task: UiTask) -> bool {
        let kind = task.kind();
        match self.sender.send(task) {
            Ok(()) => true,
            Err(_) => {
                warn!(task = kind, "UI loop has exited, task dropped");
                false
            }
        }
    }

    /// True when called on the thread that runs the UI loop.
    pub fn is_ui_thread(&self) -> bool {
        self.ui_thread.get() == Some(&thread::current().id())
    }

    /// Mark the calling thread as the UI thread. Only the first call counts.
    pub(crate) fn bind_current_thread(&self) {
        if self.ui_thread.set(thread::current().id()).is_err() && !self.is_ui_thread() {
            warn!("UI thread already bound to a different thread");
        }
    }
}

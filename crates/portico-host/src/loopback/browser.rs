use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use portico_common::{BrowserId, EngineError};
use tracing::debug;

use crate::client::BrowserClient;
use crate::controller::Controller;
use crate::engine::{Browser, BrowserRef, Frame, FrameRef, ScriptContext, ScriptContextRef};
use crate::ipc::{ProcessId, ProcessMessage};
use crate::task::{UiDispatcher, UiTask};

/// A browser living entirely in this process.
///
/// Holds only weak links to its controller and client so that the open set
/// and the tracker can own it without a cycle.
pub struct LoopbackBrowser {
    id: BrowserId,
    me: Weak<LoopbackBrowser>,
    frame: Arc<LoopbackFrame>,
    dispatcher: UiDispatcher,
    controller: Weak<Controller>,
    client: Weak<BrowserClient>,
    closing: AtomicBool,
}

impl LoopbackBrowser {
    pub(super) fn new(
        id: BrowserId,
        url: &str,
        controller: &Arc<Controller>,
        client: &Arc<BrowserClient>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            id,
            me: me.clone(),
            frame: Arc::new(LoopbackFrame::new(url)),
            dispatcher: controller.dispatcher().clone(),
            controller: Arc::downgrade(controller),
            client: Arc::downgrade(client),
            closing: AtomicBool::new(false),
        })
    }

    /// The main frame.
    pub fn frame(&self) -> Arc<LoopbackFrame> {
        Arc::clone(&self.frame)
    }

    /// Whether `close` has been called.
    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::Acquire)
    }

    /// Report a failed navigation of the main frame to the client.
    pub fn fail_load(&self, error_code: i32, error_text: &str) -> bool {
        let Some(browser) = self.handle() else {
            return false;
        };
        let client = self.client.clone();
        let frame: FrameRef = self.frame();
        let url = frame.url();
        let error_text = error_text.to_owned();
        self.dispatcher.post(UiTask::Run(Box::new(move || {
            if let Some(client) = client.upgrade() {
                client.on_load_error(&browser, &frame, error_code, &error_text, &url);
            }
        })))
    }

    /// Create a script context in the main frame and report it to the
    /// renderer side.
    pub fn create_script_context(&self) -> Option<Arc<LoopbackContext>> {
        let browser = self.handle()?;
        let context = Arc::new(LoopbackContext::default());
        let reported: ScriptContextRef = context.clone();
        let frame: FrameRef = self.frame();
        let controller = self.controller.clone();
        let posted = self.dispatcher.post(UiTask::Run(Box::new(move || {
            if let Some(controller) = controller.upgrade() {
                // Errors are logged by the controller.
                let _ = controller.on_context_created(&browser, &frame, &reported);
            }
        })));
        posted.then_some(context)
    }

    fn handle(&self) -> Option<BrowserRef> {
        let browser: BrowserRef = self.me.upgrade()?;
        Some(browser)
    }
}

impl Browser for LoopbackBrowser {
    fn id(&self) -> BrowserId {
        self.id
    }

    fn is_same(&self, other: &dyn Browser) -> bool {
        std::ptr::eq(
            self as *const Self as *const u8,
            other as *const dyn Browser as *const u8,
        )
    }

    fn send_process_message(
        &self,
        target: ProcessId,
        message: ProcessMessage,
    ) -> Result<(), EngineError> {
        if target != ProcessId::Renderer {
            return Err(EngineError::SendFailed {
                browser: self.id,
                reason: "loopback engine only routes messages to the renderer".into(),
            });
        }
        let browser = self.handle().ok_or_else(|| EngineError::SendFailed {
            browser: self.id,
            reason: "browser already released".into(),
        })?;
        let posted = self.dispatcher.post(UiTask::DeliverMessage {
            browser,
            source: ProcessId::Browser,
            message,
        });
        if posted {
            Ok(())
        } else {
            Err(EngineError::SendFailed {
                browser: self.id,
                reason: "UI loop has exited".into(),
            })
        }
    }

    fn close(&self, force: bool) {
        if self.closing.swap(true, Ordering::AcqRel) {
            debug!(browser_id = %self.id, "close already in progress");
            return;
        }
        let Some(browser) = self.handle() else {
            return;
        };
        debug!(browser_id = %self.id, force, "closing loopback browser");

        let client = self.client.clone();
        let controller = self.controller.clone();
        self.dispatcher.post(UiTask::Run(Box::new(move || {
            if let Some(client) = client.upgrade() {
                client.on_before_close(&browser);
            }
            if let Some(controller) = controller.upgrade() {
                controller.on_browser_destroyed(&browser);
            }
        })));
    }

    fn main_frame(&self) -> Option<FrameRef> {
        let frame: FrameRef = self.frame();
        Some(frame)
    }
}

/// Main frame of a [`LoopbackBrowser`]; keeps the last loaded document.
pub struct LoopbackFrame {
    url: Mutex<String>,
    document: Mutex<Option<String>>,
}

impl LoopbackFrame {
    fn new(url: &str) -> Self {
        Self {
            url: Mutex::new(url.to_owned()),
            document: Mutex::new(None),
        }
    }

    /// HTML passed to the most recent `load_string`, if any.
    pub fn document(&self) -> Option<String> {
        lock(&self.document).clone()
    }
}

impl Frame for LoopbackFrame {
    fn url(&self) -> String {
        lock(&self.url).clone()
    }

    fn load_string(&self, html: &str, url: &str) {
        *lock(&self.document) = Some(html.to_owned());
        *lock(&self.url) = url.to_owned();
    }
}

#[derive(Debug)]
pub struct LoopbackContext {
    valid: AtomicBool,
}

impl Default for LoopbackContext {
    fn default() -> Self {
        Self {
            valid: AtomicBool::new(true),
        }
    }
}

impl LoopbackContext {
    /// Mark the context as released; `is_valid` turns false.
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }
}

impl ScriptContext for LoopbackContext {
    fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

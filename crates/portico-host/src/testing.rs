//! In-memory engine objects for unit tests.

use std::sync::{Arc, Mutex};

use portico_common::{BrowserId, EngineError};

use crate::engine::{Browser, BrowserRef, Frame, FrameRef, ScriptContext, ScriptContextRef};
use crate::handler::RenderHandler;
use crate::ipc::{ProcessId, ProcessMessage};

pub struct FakeBrowser {
    id: BrowserId,
    frame: Arc<FakeFrame>,
    pub sent: Mutex<Vec<(ProcessId, ProcessMessage)>>,
    pub close_requests: Mutex<Vec<bool>>,
    pub fail_send: bool,
}

impl FakeBrowser {
    pub fn new(id: i32) -> Arc<Self> {
        Arc::new(Self::build(id, false))
    }

    pub fn failing(id: i32) -> Arc<Self> {
        Arc::new(Self::build(id, true))
    }

    fn build(id: i32, fail_send: bool) -> Self {
        Self {
            id: BrowserId(id),
            frame: Arc::new(FakeFrame::new("https://example.test/")),
            sent: Mutex::new(Vec::new()),
            close_requests: Mutex::new(Vec::new()),
            fail_send,
        }
    }

    pub fn frame(&self) -> Arc<FakeFrame> {
        Arc::clone(&self.frame)
    }
}

impl Browser for FakeBrowser {
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
        if self.fail_send {
            return Err(EngineError::SendFailed {
                browser: self.id,
                reason: "renderer gone".into(),
            });
        }
        self.sent.lock().unwrap().push((target, message));
        Ok(())
    }

    fn close(&self, force: bool) {
        self.close_requests.lock().unwrap().push(force);
    }

    fn main_frame(&self) -> Option<FrameRef> {
        let frame: FrameRef = self.frame.clone();
        Some(frame)
    }
}

pub struct FakeFrame {
    url: String,
    pub loaded: Mutex<Vec<(String, String)>>,
}

impl FakeFrame {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.into(),
            loaded: Mutex::new(Vec::new()),
        }
    }
}

impl Frame for FakeFrame {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn load_string(&self, html: &str, url: &str) {
        self.loaded.lock().unwrap().push((html.into(), url.into()));
    }
}

pub struct FakeContext;

impl ScriptContext for FakeContext {
    fn is_valid(&self) -> bool {
        true
    }
}

pub fn context() -> ScriptContextRef {
    Arc::new(FakeContext)
}

/// Records every callback as a short string in a shared log.
#[derive(Default, Clone)]
pub struct RecordingHandler {
    pub log: Arc<Mutex<Vec<String>>>,
    /// Message names this handler reports as consumed.
    pub consumes: Vec<String>,
}

impl RecordingHandler {
    pub fn with_log(log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            log,
            consumes: Vec::new(),
        }
    }
}

impl RenderHandler for RecordingHandler {
    fn on_process_message_received(
        &mut self,
        browser: &BrowserRef,
        _source: ProcessId,
        message: &ProcessMessage,
    ) -> bool {
        self.log
            .lock()
            .unwrap()
            .push(format!("message:{}:{}", browser.id(), message.name()));
        self.consumes.iter().any(|name| name == message.name())
    }

    fn on_context_created(
        &mut self,
        browser: &BrowserRef,
        _frame: &FrameRef,
        _context: &ScriptContextRef,
    ) {
        self.log
            .lock()
            .unwrap()
            .push(format!("context:{}", browser.id()));
    }
}

//! Application controller.
//!
//! Owns the engine UI thread and the renderer-side state: the handler
//! registry and the browser tracker. Shared as `Arc<Controller>`; the
//! engine thread holds a clone until it exits.
//!
//! State machine: `Idle -> Starting -> Running -> ShuttingDown`. The first
//! [`Controller::run_with_context`] spawns the thread; the thread moves to
//! `Running` once the engine reports its context ready.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use portico_common::{new_correlation_id, BindError, BrowserId, EventBus, HandlerKind, HostEvent};
use tokio::sync::broadcast;
use tracing::warn;

use crate::client::BrowserClient;
use crate::engine::{BrowserRef, Engine, EngineSettings};
use crate::handler::RenderHandler;
use crate::registry::RenderHandlerRegistry;
use crate::task::{UiCallback, UiDispatcher, UiTaskReceiver};
use crate::tracker::BrowserTracker;

mod dispatch;
mod lifecycle;

/// Name given to the engine UI thread.
pub const UI_THREAD_NAME: &str = "portico-ui";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Starting,
    Running,
    ShuttingDown,
}

struct ControllerInner {
    state: ControllerState,
    context_callback: Option<UiCallback>,
    engine: Option<Box<dyn Engine>>,
    receiver: Option<UiTaskReceiver>,
    thread: Option<JoinHandle<()>>,
}

/// Owns the engine UI thread and the renderer-side handler bindings.
pub struct Controller {
    registry: RenderHandlerRegistry,
    tracker: Mutex<BrowserTracker>,
    dispatcher: UiDispatcher,
    events: Arc<EventBus>,
    settings: EngineSettings,
    run_id: String,
    inner: Mutex<ControllerInner>,
}

impl Controller {
    /// Start configuring a controller around `engine`.
    pub fn builder(engine: impl Engine) -> ControllerBuilder {
        ControllerBuilder::new(engine)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ControllerState {
        lock(&self.inner).state
    }

    /// Correlation id tagging this controller's log output.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn registry(&self) -> &RenderHandlerRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Handle for posting work to the UI thread.
    pub fn dispatcher(&self) -> &UiDispatcher {
        &self.dispatcher
    }

    /// Receive host events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.events.subscribe()
    }

    /// Number of browsers the renderer side currently tracks.
    pub fn tracked_count(&self) -> usize {
        lock(&self.tracker).len()
    }

    /// Handler kind bound to `browser`, if any.
    pub fn bound_handler(&self, browser: BrowserId) -> Option<HandlerKind> {
        lock(&self.tracker).handler_kind(browser).cloned()
    }

    /// Create a browser client that requests `render_handler` for every
    /// browser it opens.
    pub fn create_client(&self, render_handler: impl Into<HandlerKind>) -> Arc<BrowserClient> {
        let kind = render_handler.into();
        if !self.registry.contains(&kind) {
            warn!(handler = %kind, "client requests a handler kind that is not registered");
        }
        BrowserClient::new(kind, self.dispatcher.clone(), Arc::clone(&self.events))
    }
}

/// Collects handler factories and settings before the engine starts.
pub struct ControllerBuilder {
    engine: Box<dyn Engine>,
    registry: RenderHandlerRegistry,
    required: Vec<HandlerKind>,
    settings: EngineSettings,
    events: Option<Arc<EventBus>>,
}

impl ControllerBuilder {
    pub fn new(engine: impl Engine) -> Self {
        Self {
            engine: Box::new(engine),
            registry: RenderHandlerRegistry::new(),
            required: Vec::new(),
            settings: EngineSettings::default(),
            events: None,
        }
    }

    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Share an existing event bus instead of creating one.
    pub fn events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn register<F>(mut self, kind: impl Into<HandlerKind>, factory: F) -> Self
    where
        F: Fn(&BrowserRef) -> Box<dyn RenderHandler> + Send + Sync + 'static,
    {
        self.registry.register(kind, factory);
        self
    }

    /// Fail [`build`](Self::build) unless `kind` ends up registered.
    pub fn require(mut self, kind: impl Into<HandlerKind>) -> Self {
        self.required.push(kind.into());
        self
    }

    /// Finish the controller. Fails if a required handler kind is missing.
    pub fn build(self) -> Result<Arc<Controller>, BindError> {
        self.registry.ensure_registered(&self.required)?;
        let (dispatcher, receiver) = UiDispatcher::channel();
        Ok(Arc::new(Controller {
            registry: self.registry,
            tracker: Mutex::new(BrowserTracker::new()),
            dispatcher,
            events: self.events.unwrap_or_default(),
            settings: self.settings,
            run_id: new_correlation_id(),
            inner: Mutex::new(ControllerInner {
                state: ControllerState::Idle,
                context_callback: None,
                engine: Some(self.engine),
                receiver: Some(receiver),
                thread: None,
            }),
        }))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

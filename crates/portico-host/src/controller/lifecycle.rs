use std::sync::Arc;
use std::thread;

use portico_common::{HostError, HostEvent};
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, error, info, info_span, trace, warn};

use crate::engine::Engine;
use crate::task::{UiTask, UiTaskReceiver};

use super::{lock, Controller, ControllerState, UI_THREAD_NAME};

/// Upper bound on tasks run between two engine pumps.
const MAX_TASKS_PER_PUMP: usize = 64;

impl Controller {
    /// Run `callback` on the UI thread once the engine context is ready.
    ///
    /// The first call spawns the engine thread and returns at once; the
    /// callback runs after engine initialization. Later calls run the
    /// callback in place when already on the UI thread, or post it there
    /// otherwise. Fails with [`HostError::ShutDown`] after shutdown began.
    pub fn run_with_context<F>(self: &Arc<Self>, callback: F) -> Result<(), HostError>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut inner = lock(&self.inner);
        let state = inner.state;
        match state {
            ControllerState::Idle => {
                let (Some(engine), Some(receiver)) = (inner.engine.take(), inner.receiver.take())
                else {
                    return Err(HostError::ShutDown);
                };
                inner.context_callback = Some(Box::new(callback));
                inner.state = ControllerState::Starting;

                let controller = Arc::clone(self);
                let spawned = thread::Builder::new()
                    .name(UI_THREAD_NAME.into())
                    .spawn(move || controller.engine_thread_main(engine, receiver));
                match spawned {
                    Ok(handle) => {
                        inner.thread = Some(handle);
                        info!(run = %self.run_id, "engine thread started");
                        Ok(())
                    }
                    Err(e) => {
                        inner.state = ControllerState::ShuttingDown;
                        inner.context_callback = None;
                        error!(run = %self.run_id, error = %e, "failed to spawn engine thread");
                        Err(e.into())
                    }
                }
            }
            ControllerState::Starting | ControllerState::Running => {
                drop(inner);
                if self.dispatcher.is_ui_thread() {
                    callback();
                } else {
                    self.run_on_ui(callback);
                }
                Ok(())
            }
            ControllerState::ShuttingDown => Err(HostError::ShutDown),
        }
    }

    /// Queue `callback` on the UI thread without waiting for it.
    ///
    /// Tasks posted before the engine starts run right after the context
    /// callback. Returns `false` if the UI loop has already exited.
    pub fn run_on_ui<F>(&self, callback: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.dispatcher.post(UiTask::Run(Box::new(callback)))
    }

    /// Stop the UI loop and wait for the engine thread to finish.
    ///
    /// A no-op if the thread never started or was already joined. Must not
    /// be called from the UI thread itself.
    pub fn shutdown(&self) -> Result<(), HostError> {
        if self.dispatcher.is_ui_thread() {
            return Err(HostError::ShutdownOnUiThread);
        }

        let handle = {
            let mut inner = lock(&self.inner);
            let Some(handle) = inner.thread.take() else {
                debug!(run = %self.run_id, "shutdown requested with no engine thread");
                return Ok(());
            };
            inner.state = ControllerState::ShuttingDown;
            handle
        };

        info!(run = %self.run_id, "shutting down engine thread");
        self.dispatcher.post(UiTask::Quit);
        handle.join().map_err(|_| HostError::ThreadPanicked)?;
        info!(run = %self.run_id, "engine thread joined");
        Ok(())
    }

    fn engine_thread_main(self: Arc<Self>, mut engine: Box<dyn Engine>, mut receiver: UiTaskReceiver) {
        let span = info_span!("engine", run = %self.run_id);
        let _guard = span.enter();
        self.dispatcher.bind_current_thread();

        if let Err(e) = engine.initialize(&self.settings) {
            error!(error = %e, "engine initialization failed");
            {
                let mut inner = lock(&self.inner);
                inner.state = ControllerState::ShuttingDown;
                inner.context_callback = None;
            }
            self.events.publish(HostEvent::Shutdown);
            return;
        }

        self.on_context_initialized();
        self.run_message_loop(engine.as_mut(), &mut receiver);

        lock(&self.tracker).clear();
        engine.shutdown();
        lock(&self.inner).state = ControllerState::ShuttingDown;
        info!("engine shut down");
        self.events.publish(HostEvent::Shutdown);
    }

    fn on_context_initialized(&self) {
        let callback = {
            let mut inner = lock(&self.inner);
            if inner.state == ControllerState::Starting {
                inner.state = ControllerState::Running;
            }
            inner.context_callback.take()
        };

        info!("engine context initialized");
        self.events.publish(HostEvent::ContextReady);
        match callback {
            Some(callback) => callback(),
            None => warn!("context initialized with no pending callback"),
        }
    }

    fn run_message_loop(&self, engine: &mut dyn Engine, receiver: &mut UiTaskReceiver) {
        loop {
            let mut ran = 0;
            while ran < MAX_TASKS_PER_PUMP {
                match receiver.try_recv() {
                    Ok(UiTask::Quit) => {
                        let mut dropped = 0;
                        while receiver.try_recv().is_ok() {
                            dropped += 1;
                        }
                        debug!(dropped, "UI loop quitting");
                        return;
                    }
                    Ok(task) => {
                        self.execute(task);
                        ran += 1;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        warn!("UI task channel closed, leaving loop");
                        return;
                    }
                }
            }

            engine.do_message_loop_work();
            if ran == 0 {
                thread::sleep(self.settings.pump_interval);
            }
        }
    }

    fn execute(&self, task: UiTask) {
        trace!(task = task.kind(), "running UI task");
        match task {
            UiTask::Run(callback) => callback(),
            UiTask::CloseAllBrowsers { client, force } => client.close_all_browsers(force),
            UiTask::DeliverMessage {
                browser,
                source,
                message,
            } => {
                if !self.on_process_message_received(&browser, source, &message) {
                    debug!(
                        browser_id = %browser.id(),
                        message = message.name(),
                        "process message not handled"
                    );
                }
            }
            UiTask::Quit => {}
        }
    }
}

//! One run of the host: start the engine, open browsers, wait for them to
//! bind, close them and shut down.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use portico_common::{EventBus, HandlerKind, HostError, HostEvent};
use portico_config::PorticoConfig;
use portico_host::loopback::{self, LoopbackEngine};
use portico_host::{Controller, Engine, EngineSettings, WindowDelegate, WindowOptions};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{error, info, warn};

use crate::handlers::LoggingHandler;
use crate::headless::{HeadlessView, HeadlessWindow};

const EVENT_POLL: Duration = Duration::from_millis(5);
const EVENTS_PER_BROWSER: usize = 4;

/// What to open during a session.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub url: String,
    pub browsers: usize,
    pub render_handler: HandlerKind,
    pub timeout: Duration,
}

impl SessionPlan {
    pub fn from_config(config: &PorticoConfig) -> Self {
        Self {
            url: config.client.start_url.clone(),
            browsers: 1,
            render_handler: HandlerKind::new(config.client.render_handler.clone()),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Counts of what happened during a session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub opened: usize,
    pub bound: usize,
    pub bind_failures: usize,
    pub closed: usize,
}

pub fn run(config: &PorticoConfig, plan: &SessionPlan) -> Result<SessionReport, HostError> {
    run_with_engine(LoopbackEngine::new(), config, plan)
}

/// Run a session on `engine`.
///
/// Events drive the waits. If the receiver falls behind, the counts are
/// rebuilt from the client's open set and the controller's bindings.
pub fn run_with_engine(
    engine: impl Engine,
    config: &PorticoConfig,
    plan: &SessionPlan,
) -> Result<SessionReport, HostError> {
    let bus = Arc::new(EventBus::new(event_capacity(plan.browsers)));
    let controller = Controller::builder(engine)
        .settings(EngineSettings::from_config(&config.engine))
        .events(Arc::clone(&bus))
        .register(plan.render_handler.clone(), LoggingHandler::factory)
        .require(plan.render_handler.clone())
        .build()?;
    info!(run = controller.run_id(), handler = %plan.render_handler, "controller ready");

    let mut events = bus.subscribe();
    let client = controller.create_client(plan.render_handler.clone());
    let window = WindowDelegate::new(Arc::new(HeadlessView), WindowOptions::from(&config.window));
    let title = config.window.title.clone();

    let ui_controller = Arc::clone(&controller);
    let ui_client = Arc::clone(&client);
    let url = plan.url.clone();
    let count = plan.browsers;
    controller.run_with_context(move || {
        window.on_window_created(&HeadlessWindow::new(title));
        for _ in 0..count {
            if let Err(e) = loopback::create_browser(&ui_controller, &ui_client, &url) {
                error!(error = %e, "failed to create browser");
            }
        }
    })?;

    let mut report = SessionReport::default();
    let deadline = Instant::now() + plan.timeout;

    let bind_wait = wait_until(&mut events, deadline, |event| {
        match event {
            Some(HostEvent::Shutdown) => return Err(HostError::ShutDown),
            Some(HostEvent::BrowserOpened(_)) => report.opened += 1,
            Some(HostEvent::HandlerBound { .. }) => report.bound += 1,
            Some(HostEvent::BindFailed { .. }) => report.bind_failures += 1,
            Some(_) => {}
            None => {
                let open = client.open_browsers();
                report.opened = report.opened.max(open.len());
                report.bound = open
                    .iter()
                    .filter(|b| controller.bound_handler(b.id()).is_some())
                    .count();
            }
        }
        Ok(report.bound + report.bind_failures >= plan.browsers)
    });
    if let Err(e) = bind_wait {
        error!(error = %e, "engine stopped before every browser was bound");
        controller.shutdown()?;
        return Err(e);
    }

    client.close_all_browsers(true);
    if report.opened > 0 {
        wait_until(&mut events, deadline, |event| {
            match event {
                Some(HostEvent::BrowserClosed(_)) => report.closed += 1,
                Some(_) => {}
                None => report.closed = report.opened.saturating_sub(client.open_count()),
            }
            Ok(report.closed >= report.opened)
        })?;
    }

    controller.shutdown()?;
    info!(?report, "session finished");
    Ok(report)
}

/// Bus capacity that holds every event a session of `browsers` publishes:
/// opened, bound or failed, and closed per browser, plus context ready and
/// shutdown.
fn event_capacity(browsers: usize) -> usize {
    (browsers + 1) * EVENTS_PER_BROWSER
}

/// Feed events to `step` until it returns `Ok(true)`, fails, or `deadline`
/// passes. `step` gets `None` after the receiver lagged and events were
/// lost.
fn wait_until(
    events: &mut broadcast::Receiver<HostEvent>,
    deadline: Instant,
    mut step: impl FnMut(Option<&HostEvent>) -> Result<bool, HostError>,
) -> Result<(), HostError> {
    loop {
        match events.try_recv() {
            Ok(event) => {
                if step(Some(&event))? {
                    return Ok(());
                }
            }
            Err(TryRecvError::Empty) => {
                if Instant::now() >= deadline {
                    warn!("timed out waiting for host events");
                    return Ok(());
                }
                thread::sleep(EVENT_POLL);
            }
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "event receiver lagged; recounting from host state");
                if step(None)? {
                    return Ok(());
                }
            }
            Err(TryRecvError::Closed) => return Ok(()),
        }
    }
}

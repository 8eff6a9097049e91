//! End-to-end tests: controller, client and tracker driven by the
//! loopback engine on a real UI thread.

use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use portico_common::{BrowserId, HostEvent};
use tokio::sync::broadcast;

use super::*;
use crate::controller::ControllerState;
use crate::engine::{Browser, BrowserRef, Frame};
use crate::handler::RenderHandler;
use crate::ipc::{ProcessId, ProcessMessage};
use crate::testing::RecordingHandler;

const WAIT: Duration = Duration::from_secs(5);

struct Harness {
    controller: Arc<Controller>,
    client: Arc<BrowserClient>,
    events: broadcast::Receiver<HostEvent>,
    log: Arc<Mutex<Vec<String>>>,
}

fn harness() -> Harness {
    let log = Arc::new(Mutex::new(Vec::new()));
    let handler_log = Arc::clone(&log);
    let controller = Controller::builder(LoopbackEngine::new())
        .settings(EngineSettings {
            pump_interval: Duration::from_millis(1),
            ..EngineSettings::default()
        })
        .register("recording", move |_: &BrowserRef| {
            Box::new(RecordingHandler {
                log: Arc::clone(&handler_log),
                consumes: vec!["Ping".into()],
            }) as Box<dyn RenderHandler>
        })
        .require("recording")
        .build()
        .unwrap();
    let events = controller.subscribe();
    let client = controller.create_client("recording");
    Harness {
        controller,
        client,
        events,
        log,
    }
}

impl Harness {
    /// Start the engine and open `count` browsers from the context callback.
    fn open(&self, count: usize) -> Vec<Arc<LoopbackBrowser>> {
        let (tx, rx) = mpsc::channel();
        let controller = Arc::clone(&self.controller);
        let client = Arc::clone(&self.client);
        self.controller
            .run_with_context(move || {
                let browsers: Vec<_> = (0..count)
                    .map(|i| {
                        create_browser(&controller, &client, &format!("https://example.test/{i}"))
                            .unwrap()
                    })
                    .collect();
                tx.send(browsers).unwrap();
            })
            .unwrap();
        rx.recv_timeout(WAIT).unwrap()
    }

    /// Wait until every task queued so far has run.
    fn flush(&self) {
        let (tx, rx) = mpsc::channel();
        assert!(self.controller.run_on_ui(move || tx.send(()).unwrap()));
        rx.recv_timeout(WAIT).unwrap();
    }

    async fn wait_for(&mut self, pred: impl Fn(&HostEvent) -> bool) -> HostEvent {
        let events = &mut self.events;
        tokio::time::timeout(WAIT, async {
            loop {
                match events.recv().await {
                    Ok(event) if pred(&event) => return event,
                    Ok(_) => continue,
                    Err(e) => panic!("event stream failed: {e}"),
                }
            }
        })
        .await
        .expect("timed out waiting for host event")
    }

    async fn wait_bound(&mut self, count: usize) {
        for _ in 0..count {
            self.wait_for(|e| matches!(e, HostEvent::HandlerBound { .. }))
                .await;
        }
    }
}

#[tokio::test]
async fn browsers_open_bind_and_close_cleanly() {
    let mut h = harness();
    let browsers = h.open(3);
    h.wait_bound(3).await;

    assert_eq!(h.client.open_count(), 3);
    assert_eq!(h.controller.tracked_count(), 3);
    for b in &browsers {
        assert_eq!(
            h.controller.bound_handler(b.id()).map(|k| k.to_string()),
            Some("recording".into())
        );
    }

    h.client.close_all_browsers(true);
    for _ in 0..3 {
        h.wait_for(|e| matches!(e, HostEvent::BrowserClosed(_)))
            .await;
    }
    h.flush();

    assert_eq!(h.client.open_count(), 0);
    assert_eq!(h.controller.tracked_count(), 0);
    assert!(browsers.iter().all(|b| b.is_closing()));

    h.controller.shutdown().unwrap();
    assert_eq!(h.controller.state(), ControllerState::ShuttingDown);
}

#[tokio::test]
async fn load_error_replaces_document_with_error_page() {
    let mut h = harness();
    let browser = h.open(1).remove(0);
    h.wait_bound(1).await;

    assert!(browser.fail_load(-2, "NAME_NOT_RESOLVED"));
    h.flush();

    let frame = browser.frame();
    let html = frame.document().expect("error page loaded");
    assert!(html.contains("Failed to load URL https://example.test/0"));
    assert!(html.contains("NAME_NOT_RESOLVED (-2)."));
    assert_eq!(frame.url(), "https://example.test/0");

    h.controller.shutdown().unwrap();
}

#[tokio::test]
async fn aborted_load_keeps_document() {
    let mut h = harness();
    let browser = h.open(1).remove(0);
    h.wait_bound(1).await;

    assert!(browser.fail_load(crate::client::ERR_ABORTED, "ABORTED"));
    h.flush();
    assert!(browser.frame().document().is_none());

    h.controller.shutdown().unwrap();
}

#[tokio::test]
async fn script_context_reaches_bound_handler() {
    let mut h = harness();
    let browser = h.open(1).remove(0);
    h.wait_bound(1).await;

    let context = browser.create_script_context().expect("posted");
    h.flush();

    assert!(crate::engine::ScriptContext::is_valid(context.as_ref()));
    let expected = format!("context:{}", browser.id());
    assert!(h.log.lock().unwrap().contains(&expected));

    h.controller.shutdown().unwrap();
}

#[tokio::test]
async fn custom_messages_reach_the_handler() {
    let mut h = harness();
    let browser = h.open(1).remove(0);
    h.wait_bound(1).await;

    browser
        .send_process_message(ProcessId::Renderer, ProcessMessage::new("Ping"))
        .unwrap();
    h.flush();

    let expected = format!("message:{}:Ping", browser.id());
    assert!(h.log.lock().unwrap().contains(&expected));

    h.controller.shutdown().unwrap();
}

#[tokio::test]
async fn messages_to_browser_process_are_rejected() {
    let mut h = harness();
    let browser = h.open(1).remove(0);
    h.wait_bound(1).await;

    let err = browser
        .send_process_message(ProcessId::Browser, ProcessMessage::new("Ping"))
        .unwrap_err();
    assert!(matches!(err, EngineError::SendFailed { browser: b, .. } if b == browser.id()));

    h.controller.shutdown().unwrap();
}

#[tokio::test]
async fn repeated_close_reports_once() {
    let mut h = harness();
    let browser = h.open(1).remove(0);
    h.wait_bound(1).await;

    browser.close(false);
    browser.close(true);
    h.wait_for(|e| matches!(e, HostEvent::BrowserClosed(_)))
        .await;
    h.flush();

    assert_eq!(h.client.open_count(), 0);
    assert!(h.events.try_recv().is_err());

    h.controller.shutdown().unwrap();
}

#[tokio::test]
async fn shutdown_drops_browsers_left_open() {
    let mut h = harness();
    h.open(2);
    h.wait_bound(2).await;
    assert_eq!(h.controller.tracked_count(), 2);

    h.controller.shutdown().unwrap();
    assert_eq!(h.controller.tracked_count(), 0);
    h.wait_for(|e| *e == HostEvent::Shutdown).await;
}

#[test]
fn create_browser_off_ui_thread_fails() {
    let h = harness();
    let err = create_browser(&h.controller, &h.client, "about:blank")
        .err()
        .unwrap();
    assert!(matches!(err, EngineError::Other(_)));
    assert_eq!(h.client.open_count(), 0);
}

#[test]
fn strict_engine_requires_resources_dir() {
    let missing = Controller::builder(LoopbackEngine::strict())
        .settings(EngineSettings {
            resources_dir: PathBuf::from("/nonexistent/portico/res"),
            ..EngineSettings::default()
        })
        .build()
        .unwrap();
    let mut events = missing.subscribe();
    missing.run_with_context(|| {}).unwrap();
    assert_eq!(events.blocking_recv().unwrap(), HostEvent::Shutdown);
    missing.shutdown().unwrap();

    let present = Controller::builder(LoopbackEngine::strict())
        .settings(EngineSettings {
            resources_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
            ..EngineSettings::default()
        })
        .build()
        .unwrap();
    let mut events = present.subscribe();
    present.run_with_context(|| {}).unwrap();
    assert_eq!(events.blocking_recv().unwrap(), HostEvent::ContextReady);
    present.shutdown().unwrap();
}

#[test]
fn browser_ids_are_unique() {
    let h = harness();
    let (tx, rx) = mpsc::channel();
    let controller = Arc::clone(&h.controller);
    let client = Arc::clone(&h.client);
    h.controller
        .run_with_context(move || {
            let ids: Vec<BrowserId> = (0..4)
                .map(|_| create_browser(&controller, &client, "about:blank").unwrap().id())
                .collect();
            tx.send(ids).unwrap();
        })
        .unwrap();

    let mut ids = rx.recv_timeout(WAIT).unwrap();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
    h.controller.shutdown().unwrap();
}

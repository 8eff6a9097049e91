use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

use crate::id::{BrowserId, HandlerKind};

/// Lifecycle notifications published by the host for observers
/// (the binary, tests, application code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HostEvent {
    ContextReady,
    BrowserOpened(BrowserId),
    BrowserClosed(BrowserId),
    HandlerBound {
        browser: BrowserId,
        kind: HandlerKind,
    },
    BindFailed {
        browser: BrowserId,
        reason: String,
    },
    Shutdown,
    #[serde(other)]
    Unknown,
}

/// Fan-out of [`HostEvent`]s to any number of subscribers.
pub struct EventBus {
    sender: broadcast::Sender<HostEvent>,
}

impl EventBus {
    /// Create a bus that buffers up to `capacity` events per slow subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of subscribers that will see `event`.
    pub fn publish(&self, event: HostEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                trace!(?event, "no subscribers");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

//! Change-notification bus for the session store.
//!
//! Backed by a `tokio::sync::broadcast::channel` so multiple subscribers
//! (UI views, exporters, tests) can consume the same stream without
//! blocking the writer. Events carry which collection changed; subscribers
//! re-read the repositories' watch channels for the current values.

use serde::Serialize;
use tokio::sync::broadcast;

const BUS_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreEvent {
    StudentsChanged,
    TasksChanged,
    AssignmentsChanged,
    LedgerChanged,
    SessionCleared,
}

/// Clone cheaply — the underlying `broadcast::Sender` is Arc-backed.
#[derive(Clone)]
pub struct StoreEventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl StoreEventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }

    /// Receives events emitted after the call; earlier events are not
    /// replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: StoreEvent) {
        // send() errors only with zero subscribers; that's fine.
        let _ = self.sender.send(event);
    }
}

impl Default for StoreEventBus {
    fn default() -> Self {
        Self::new()
    }
}

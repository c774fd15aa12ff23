//! Event bus for shopboard using tokio::broadcast
//!
//! Panels publish their transitions here so a presentation layer can redraw
//! without polling.

use tokio::sync::broadcast;

use crate::panel::{PanelKind, PanelStatus};

/// Events emitted by the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// A request was dispatched and the panel entered `Loading`
    Loading(PanelKind),
    /// The panel reached a settled state (`Success` or `Error`)
    Settled { kind: PanelKind, status: PanelStatus },
    /// A response arrived for a superseded dispatch and was discarded
    StaleResponseDropped { kind: PanelKind, generation: u64 },
    /// An export artifact was produced
    Exported { kind: PanelKind, filename: String },
}

/// Event bus for broadcasting panel events
///
/// Uses tokio::broadcast for multi-consumer support.
pub struct EventBus {
    sender: broadcast::Sender<PanelEvent>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create with default capacity (256 events)
    pub fn default_capacity() -> Self {
        Self::new(256)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: PanelEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.sender.subscribe()
    }

    /// Get current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

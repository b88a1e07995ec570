//! Broadcast-based event bus
//!
//! Observers subscribe to a [`CollectionEvent`] stream; emission never blocks
//! and never fails, even with no subscribers. A subscriber that falls more
//! than [`EVENT_CHANNEL_CAPACITY`] events behind skips the oldest ones.

use gridsave_domain::CollectionEvent;
use tokio::sync::broadcast;
use tracing::trace;

/// Channel capacity for the event stream
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Publish side of the notification channel
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CollectionEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to every event emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<CollectionEvent> {
        self.tx.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn emit(&self, event: CollectionEvent) {
        trace!(event = event.name(), subscribers = self.tx.receiver_count(), "Emitting event");
        // No subscribers is fine
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

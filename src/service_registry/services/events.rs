//! Broadcast fan-out of lifecycle events.

use crate::service_registry::domain::LifecycleEvent;
use std::sync::{PoisonError, RwLock};
use tokio::sync::broadcast;
use tracing::trace;

/// Default number of buffered events per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Typed publish/subscribe channel for [`LifecycleEvent`]s.
///
/// Slow subscribers observe `RecvError::Lagged` and should re-read registry
/// state. Closing the bus ends every current subscription.
#[derive(Debug)]
pub struct EventBus {
    sender: RwLock<broadcast::Sender<LifecycleEvent>>,
    capacity: usize,
}

impl EventBus {
    /// Creates a bus buffering `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: RwLock::new(sender),
            capacity: capacity.max(1),
        }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribe()
    }

    /// Publishes an event to current subscribers.
    pub fn publish(&self, event: LifecycleEvent) {
        let sender = self.sender.read().unwrap_or_else(PoisonError::into_inner);
        if let Err(broadcast::error::SendError(unheard)) = sender.send(event) {
            trace!(service_id = %unheard.service_id(), "no lifecycle subscribers");
        }
    }

    /// Ends every current subscription. Later subscribers use a fresh channel.
    pub fn close(&self) {
        let (fresh, _) = broadcast::channel(self.capacity);
        let previous = std::mem::replace(
            &mut *self.sender.write().unwrap_or_else(PoisonError::into_inner),
            fresh,
        );
        drop(previous);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

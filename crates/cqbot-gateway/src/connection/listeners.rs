//! Listener registry
//!
//! Listeners are keyed by event type. Dispatch clones the matching listeners
//! out of the lock and runs each one as its own task.

use super::pending::CallbackFuture;
use cqbot_core::{Event, EventType};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An event callback
pub type Listener = Arc<dyn Fn(Arc<Event>) -> CallbackFuture + Send + Sync>;

/// Event listeners grouped by event type, in registration order
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<HashMap<EventType, Vec<Listener>>>,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event type
    pub fn add(&self, event_type: EventType, listener: Listener) {
        self.listeners
            .write()
            .entry(event_type)
            .or_default()
            .push(listener);

        tracing::debug!(event_type = %event_type, "Listener registered");
    }

    /// Snapshot of the listeners for an event type
    #[must_use]
    pub fn listeners_for(&self, event_type: EventType) -> Vec<Listener> {
        self.listeners
            .read()
            .get(&event_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of listeners for an event type
    #[must_use]
    pub fn count(&self, event_type: EventType) -> usize {
        self.listeners.read().get(&event_type).map_or(0, Vec::len)
    }

    /// Start every listener of the event's type; returns how many were started
    ///
    /// Does not wait for the listeners. Must be called inside a Tokio runtime.
    pub fn dispatch(&self, event: Event) -> usize {
        let event_type = event.event_type();
        let listeners = self.listeners_for(event_type);
        let event = Arc::new(event);

        for listener in &listeners {
            let listener = Arc::clone(listener);
            let event = Arc::clone(&event);
            tokio::spawn(async move {
                if let Err(e) = listener(event).await {
                    tracing::warn!(event_type = %event_type, error = %e, "Listener failed");
                }
            });
        }

        listeners.len()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<EventType, usize> = self
            .listeners
            .read()
            .iter()
            .map(|(event_type, listeners)| (*event_type, listeners.len()))
            .collect();
        f.debug_struct("ListenerRegistry")
            .field("listeners", &counts)
            .finish()
    }
}

// # Event Bus
//
// In-process implementation of EventTransport.
//
// ## Purpose
//
// Plays the role of the browser window for hosts without a DOM: component
// event targets forward into the bus, and the relay listens on it. Delivery
// is synchronous and in installation order.

use crate::relay::StoreActionEvent;
use crate::sync::{read, write};
use crate::traits::{EventListener, EventTarget, EventTransport, ListenerId};
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// In-process event transport
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use storebind_core::relay::{EventBus, EventRelay};
/// use storebind_core::config::RelayConfig;
///
/// let bus = Arc::new(EventBus::new());
/// let relay = EventRelay::new(bus.clone(), RelayConfig::default());
/// assert!(relay.is_attached());
/// ```
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<HashMap<String, Vec<(ListenerId, EventListener)>>>,
    next_id: AtomicU64,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of listeners installed for `event_name`
    pub fn listener_count(&self, event_name: &str) -> usize {
        read(&self.listeners)
            .get(event_name)
            .map_or(0, |listeners| listeners.len())
    }
}

impl EventTarget for EventBus {
    fn dispatch_event(&self, event: StoreActionEvent) {
        // Listeners may install or remove listeners, so deliver from a copy
        let listeners: Vec<EventListener> = read(&self.listeners)
            .get(&event.name)
            .map(|listeners| listeners.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default();

        if listeners.is_empty() {
            debug!("No listeners for event {}", event.name);
            return;
        }

        for listener in listeners {
            listener(&event);
        }
    }
}

impl EventTransport for EventBus {
    fn add_listener(&self, event_name: &str, listener: EventListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        write(&self.listeners)
            .entry(event_name.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    fn remove_listener(&self, event_name: &str, id: ListenerId) {
        if let Some(listeners) = write(&self.listeners).get_mut(event_name) {
            listeners.retain(|(existing, _)| *existing != id);
        }
    }
}

// # Event Target Traits
//
// Defines the out-of-band event channel the relay is built on.
//
// ## Purpose
//
// Components that hold no direct store reference emit store actions as
// events. The events bubble up to a global transport, where the relay
// listens and forwards them into the registered stores.
//
// - [`EventTarget`]: anything that can emit an event (a component, an element)
// - [`EventTransport`]: the global channel that also accepts listeners
//
// ## Implementations
//
// - In-process: [`crate::relay::EventBus`]
// - Hosts with a real DOM can adapt their window object to [`EventTransport`]

use crate::relay::StoreActionEvent;
use std::sync::Arc;

/// Listener callback installed on an [`EventTransport`]
pub type EventListener = Arc<dyn Fn(&StoreActionEvent) + Send + Sync>;

/// Handle identifying an installed listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Event emission capability
pub trait EventTarget: Send + Sync {
    /// Emit an event
    ///
    /// Delivery is synchronous for in-process targets; emitting into a
    /// target with nobody listening is not an error.
    fn dispatch_event(&self, event: StoreActionEvent);
}

/// Global event transport
///
/// An [`EventTarget`] that additionally accepts listeners keyed by event name.
pub trait EventTransport: EventTarget {
    /// Install a listener for events named `event_name`
    fn add_listener(&self, event_name: &str, listener: EventListener) -> ListenerId;

    /// Remove a previously installed listener
    ///
    /// Removing an unknown listener is a no-op.
    fn remove_listener(&self, event_name: &str, id: ListenerId);
}

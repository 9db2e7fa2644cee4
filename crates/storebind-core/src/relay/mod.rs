//! Event relay
//!
//! Bridges store actions emitted as events back into registered stores.
//!
//! ## Flow
//!
//! ```text
//! ┌───────────┐  StoreActionEvent   ┌──────────────┐
//! │ Component │────(bubbles)───────▶│ EventTransport│
//! └───────────┘                     └──────────────┘
//!                                          │ one listener per registered store
//!                      ┌───────────────────┼───────────────────┐
//!                      ▼                   ▼                   ▼
//!               scope matches?      scope matches?      scope matches?
//!                      │                   │                   │
//!                 store.dispatch      store.dispatch      store.dispatch
//! ```
//!
//! A listener forwards an event when the event carries no scope or carries
//! the listener's own scope. A scope-less action therefore reaches every
//! registered store.
//!
//! Without a transport (non-browser hosts, tests) installing, removing and
//! emitting are silent no-ops.

mod bus;

pub use bus::EventBus;

use crate::action::Action;
use crate::config::RelayConfig;
use crate::scope::Scope;
use crate::sync::lock;
use crate::traits::{ActionSink, EventTransport, ListenerId};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A store action wrapped for transport
///
/// Mirrors a bubbling, composed custom event whose detail is the action with
/// its target scope injected.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreActionEvent {
    /// Event name
    pub name: String,
    /// The action, scope included
    pub detail: Action,
    /// Whether the event bubbles
    pub bubbles: bool,
    /// Whether the event crosses shadow boundaries
    pub composed: bool,
}

impl StoreActionEvent {
    /// Wrap `action` for `scope` using the event options of `config`
    pub fn new(action: Action, scope: Scope, config: &RelayConfig) -> Self {
        let options = config.event_options();
        Self {
            name: options.event_name.to_string(),
            detail: Action {
                scope: Some(scope),
                ..action
            },
            bubbles: options.bubbles,
            composed: options.composed,
        }
    }
}

/// Relay from the event transport into registered stores
///
/// Cloning yields another handle onto the same set of installed listeners.
#[derive(Clone)]
pub struct EventRelay {
    transport: Option<Arc<dyn EventTransport>>,
    config: Arc<RelayConfig>,
    listeners: Arc<Mutex<Vec<ListenerId>>>,
}

impl EventRelay {
    /// Create a relay listening on `transport`
    pub fn new(transport: Arc<dyn EventTransport>, config: RelayConfig) -> Self {
        Self {
            transport: Some(transport),
            config: Arc::new(config),
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a relay for a host without an event transport
    pub fn detached() -> Self {
        Self {
            transport: None,
            config: Arc::new(RelayConfig::default()),
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Whether a transport is available
    pub fn is_attached(&self) -> bool {
        self.transport.is_some()
    }

    /// Relay configuration
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Number of currently installed listeners
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    /// Wrap an action as a transportable event targeting `scope`
    ///
    /// # Example
    ///
    /// ```rust
    /// use storebind_core::{Action, Scope};
    /// use storebind_core::relay::EventRelay;
    ///
    /// let relay = EventRelay::detached();
    /// let event = relay.wrap_as_event(Action::new("todo/add"), Scope::DEFAULT);
    ///
    /// assert_eq!(event.name, "dispatchStoreAction");
    /// assert_eq!(event.detail.scope, Some(Scope::DEFAULT));
    /// assert!(event.bubbles && event.composed);
    /// ```
    pub fn wrap_as_event(&self, action: Action, scope: Scope) -> StoreActionEvent {
        StoreActionEvent::new(action, scope, &self.config)
    }

    /// Emit an action directly on the transport
    ///
    /// For hosts that hold no event target of their own.
    pub fn emit(&self, action: Action, scope: Scope) {
        let Some(transport) = &self.transport else {
            debug!("No event transport, dropping action {}", action.action_type);
            return;
        };
        transport.dispatch_event(self.wrap_as_event(action, scope));
    }

    /// Forward scope-matching events on the transport to `sink`
    ///
    /// Events without a scope match every listener.
    pub fn install_listener(&self, sink: Arc<dyn ActionSink>, scope: Scope) {
        let Some(transport) = &self.transport else {
            debug!("No event transport, not relaying events for scope {}", scope);
            return;
        };

        let id = transport.add_listener(
            &self.config.event_name,
            Arc::new(move |event: &StoreActionEvent| {
                let action = &event.detail;
                if action.scope.is_none_or(|target| target == scope) {
                    debug!("Relaying {} into scope {}", action.action_type, scope);
                    sink.dispatch(action.unscoped());
                }
            }),
        );
        lock(&self.listeners).push(id);
        debug!("Installed relay listener for scope {}", scope);
    }

    /// Detach every installed listener
    pub fn remove_all_listeners(&self) {
        let Some(transport) = &self.transport else {
            return;
        };

        let removed: Vec<ListenerId> = lock(&self.listeners).drain(..).collect();
        for id in &removed {
            transport.remove_listener(&self.config.event_name, *id);
        }
        debug!("Removed {} relay listener(s)", removed.len());
    }
}

//! Scoped store registry
//!
//! The registry maps [`Scope`]s to store instances so components can find a
//! shared store without holding a direct reference to it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storebind_core::registry::StoreRegistry;
//! use storebind_core::relay::EventRelay;
//!
//! // Create one registry at startup and hand clones to consumers
//! let registry = StoreRegistry::new(EventRelay::new(bus, RelayConfig::default()));
//!
//! // Register stores
//! registry.register_default_store(app_store);
//! registry.register_store(settings_scope, settings_store);
//!
//! // Look them up
//! let store = registry.get_store::<AppState>(Scope::DEFAULT);
//! ```
//!
//! ## Relay
//!
//! Registering a store also installs an event relay listener for it, so
//! actions emitted as events under the same scope (or under no scope) reach
//! the store. Re-registering a scope replaces the store but leaves the old
//! listener in place; listeners are only removed in bulk by [`StoreRegistry::reset`].

use crate::relay::EventRelay;
use crate::scope::Scope;
use crate::sync::{read, write};
use crate::traits::store::StoreSink;
use crate::traits::{ActionSink, StoreHandle};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// A registered store
struct RegistryEntry {
    /// The typed handle, boxed as `StoreHandle<S>`
    store: Box<dyn Any + Send + Sync>,

    /// Dispatch capability of the same store
    sink: Arc<dyn ActionSink>,

    /// State type name, for diagnostics
    state_type: &'static str,
}

/// Registry of stores keyed by scope
///
/// Cloning yields another handle onto the same registry. At most one store is
/// registered per scope; the last registration wins.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Clone)]
pub struct StoreRegistry {
    entries: Arc<RwLock<HashMap<Scope, RegistryEntry>>>,
    relay: EventRelay,
}

impl StoreRegistry {
    /// Create an empty registry that relays events through `relay`
    pub fn new(relay: EventRelay) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            relay,
        }
    }

    /// Create an empty registry without an event transport
    pub fn detached() -> Self {
        Self::new(EventRelay::detached())
    }

    /// The relay this registry installs listeners on
    pub fn relay(&self) -> &EventRelay {
        &self.relay
    }

    /// Register a store under `scope`
    ///
    /// Replaces any store previously registered under the same scope and
    /// installs a relay listener for the new one.
    ///
    /// # Parameters
    ///
    /// - `scope`: Scope to register the store under
    /// - `store`: The store to register
    pub fn register_store<S: 'static>(&self, scope: Scope, store: StoreHandle<S>) {
        let sink: Arc<dyn ActionSink> = Arc::new(StoreSink(store.clone()));
        let entry = RegistryEntry {
            store: Box::new(store),
            sink: sink.clone(),
            state_type: std::any::type_name::<S>(),
        };

        let replaced = write(&self.entries).insert(scope, entry).is_some();
        debug!(
            "Registered store for scope {} (state: {}, replaced: {})",
            scope,
            std::any::type_name::<S>(),
            replaced
        );

        self.relay.install_listener(sink, scope);
    }

    /// Register a store under [`Scope::DEFAULT`]
    pub fn register_default_store<S: 'static>(&self, store: StoreHandle<S>) {
        self.register_store(Scope::DEFAULT, store);
    }

    /// Look up the store registered under `scope`
    ///
    /// # Returns
    ///
    /// - `Some(store)`: A store with state type `S` is registered
    /// - `None`: Nothing is registered, or the registered store has another state type
    pub fn get_store<S: 'static>(&self, scope: Scope) -> Option<StoreHandle<S>> {
        let entries = read(&self.entries);
        let entry = entries.get(&scope)?;

        let store = entry.store.downcast_ref::<StoreHandle<S>>().cloned();
        if store.is_none() {
            debug!(
                "Store for scope {} has state {}, requested {}",
                scope,
                entry.state_type,
                std::any::type_name::<S>()
            );
        }
        store
    }

    /// Dispatch capability of the store registered under `scope`
    pub fn get_sink(&self, scope: Scope) -> Option<Arc<dyn ActionSink>> {
        read(&self.entries).get(&scope).map(|entry| entry.sink.clone())
    }

    /// Check if a store is registered under `scope`
    pub fn contains(&self, scope: Scope) -> bool {
        read(&self.entries).contains_key(&scope)
    }

    /// List all scopes with a registered store
    pub fn scopes(&self) -> Vec<Scope> {
        read(&self.entries).keys().copied().collect()
    }

    /// Remove every registration and every relay listener
    ///
    /// Intended for test isolation; safe to call on an empty registry.
    pub fn reset(&self) {
        let cleared = {
            let mut entries = write(&self.entries);
            let count = entries.len();
            entries.clear();
            count
        };
        self.relay.remove_all_listeners();
        debug!("Store registry reset ({} entries cleared)", cleared);
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::detached()
    }
}

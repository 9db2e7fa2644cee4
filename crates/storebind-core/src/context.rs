//! Binding context
//!
//! Bundles the two process-wide handles every binding needs: the store
//! registry and the binding table. Create one at startup and pass it (or
//! clones of it) to whatever constructs components.

use crate::bindings::BindingTable;
use crate::registry::StoreRegistry;
use crate::relay::EventRelay;

/// Registry and binding table shared by all bindings of a process
#[derive(Clone, Default)]
pub struct BindingContext {
    registry: StoreRegistry,
    bindings: BindingTable,
}

impl BindingContext {
    /// Create a context from existing handles
    pub fn new(registry: StoreRegistry, bindings: BindingTable) -> Self {
        Self { registry, bindings }
    }

    /// Create a context with an empty registry relaying through `relay`
    pub fn with_relay(relay: EventRelay) -> Self {
        Self::new(StoreRegistry::new(relay), BindingTable::new())
    }

    /// Create a context without an event transport
    pub fn detached() -> Self {
        Self::default()
    }

    /// The store registry
    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    /// The binding table
    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }
}

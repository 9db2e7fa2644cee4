// # storebind-core
//
// Binds component instances to Redux-like stores.
//
// ## Architecture Overview
//
// - **Store**: Trait for external state containers (`get_state`, `subscribe`, `dispatch`)
// - **StoreRegistry**: Scoped lookup of shared stores
// - **EventRelay**: Routes actions emitted as events back into registered stores
// - **BindingTable**: Per-class selector and dispatcher descriptors
// - **StoreBinding**: The lifecycle of one bound instance
// - **use_store_for**: The same lifecycle for hosts that are not `Component`s
//
// ## Design Principles
//
// 1. **Stores are external**: The library references stores, never owns their state
// 2. **Unbound is not an error**: Instances without a store stay inert
// 3. **No hidden globals**: Registry and binding table are explicit handles
// 4. **Library-First**: Nothing here installs a logger or spawns tasks

pub mod action;
pub mod bindings;
pub mod config;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod registry;
pub mod relay;
pub mod scope;
pub mod testing;
pub mod traits;

mod sync;

// Re-export core types for convenience
pub use action::Action;
pub use bindings::{BindingTable, DispatcherBinding, SelectorBinding};
pub use config::{RelayConfig, StorebindConfig};
pub use context::BindingContext;
pub use error::{Error, Result};
pub use lifecycle::{
    BindingOptions, Bound, Dispatcher, HostHooks, LifecycleState, StoreBinding, use_store_for,
};
pub use registry::StoreRegistry;
pub use relay::{EventBus, EventRelay, StoreActionEvent};
pub use scope::Scope;
pub use traits::{Component, EventTarget, EventTransport, Store, StoreHandle};

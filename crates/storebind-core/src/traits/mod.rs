//! Core traits for store binding
//!
//! This module defines the interfaces the binding machinery is written against.
//!
//! - [`Store`]: The external state container (`get_state`, `subscribe`, `dispatch`)
//! - [`EventTarget`]: The event emission capability of a host instance
//! - [`EventTransport`]: The global event channel the relay listens on
//! - [`Component`]: Hosts that carry the binding lifecycle directly

pub mod component;
pub mod event_target;
pub mod store;

pub use component::Component;
pub use event_target::{EventListener, EventTarget, EventTransport, ListenerId};
pub use store::{ActionSink, Listener, Store, StoreHandle, Unsubscribe, noop_unsubscribe};

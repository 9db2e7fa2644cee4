// # Component Trait
//
// The contract of hosts that carry the binding lifecycle themselves.
//
// A component declares the state type it reads from, may define its own
// teardown logic, and may expose an event target used when a dispatcher has
// no store to talk to. Hosts that cannot implement this trait are bound
// through [`crate::lifecycle::use_store_for`] instead.

use crate::traits::EventTarget;
use std::sync::Arc;

/// A bindable component
///
/// # Example
///
/// ```rust
/// use storebind_core::traits::Component;
///
/// #[derive(Clone)]
/// struct TodoState {
///     todos: Vec<String>,
/// }
///
/// #[derive(Default)]
/// struct TodoList {
///     todos: Vec<String>,
/// }
///
/// impl Component for TodoList {
///     type State = TodoState;
/// }
/// ```
pub trait Component: Send + 'static {
    /// State type of the store this component binds to
    type State: 'static;

    /// Host teardown logic
    ///
    /// Runs after the store subscription has been removed.
    fn disconnected(&mut self) {}

    /// Event emission capability used by the relay fallback
    ///
    /// `None` means the component is detached and fallback events are dropped.
    fn event_target(&self) -> Option<Arc<dyn EventTarget>> {
        None
    }
}

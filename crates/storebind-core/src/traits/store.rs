// # Store Trait
//
// Defines the capability set every bindable state container must offer.
//
// ## Purpose
//
// Stores are external collaborators: the binding machinery references them,
// never copies or owns their state. Anything with Redux-like semantics fits:
//
// - `get_state()`: current state snapshot
// - `subscribe(listener)`: register a change callback, returns an unsubscribe
// - `dispatch(action)`: feed an action into the store
//
// ## Usage
//
// ```rust,ignore
// use storebind_core::traits::Store;
//
// let unsubscribe = store.subscribe(Arc::new(|| println!("changed")));
// store.dispatch(Action::new("todo/add"));
// unsubscribe();
// ```

use crate::action::Action;
use std::sync::Arc;

/// Change listener registered with [`Store::subscribe`]
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// One-shot unsubscribe callback returned by [`Store::subscribe`]
pub type Unsubscribe = Box<dyn FnOnce() + Send>;

/// Shared handle to a store with state `S`
pub type StoreHandle<S> = Arc<dyn Store<State = S>>;

/// Unsubscribe callback that does nothing
///
/// Used as the initial value before a store is bound.
pub fn noop_unsubscribe() -> Unsubscribe {
    Box::new(|| {})
}

/// Trait for observable state containers
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. Listeners may be invoked from
/// inside `dispatch`, so implementations must not hold internal locks while
/// notifying: a listener typically calls `get_state()` right away.
///
/// # Errors
///
/// The contract is infallible. A store that panics inside `subscribe` or
/// `dispatch` propagates that panic to the caller unchanged.
pub trait Store: Send + Sync {
    /// State snapshot type
    type State;

    /// Current state snapshot
    fn get_state(&self) -> Self::State;

    /// Register a listener for state changes
    ///
    /// # Returns
    ///
    /// A callback that removes the listener again
    fn subscribe(&self, listener: Listener) -> Unsubscribe;

    /// Dispatch an action into the store
    fn dispatch(&self, action: Action);
}

/// Type-erased dispatch capability of a store
///
/// The registry and the relay only need to forward actions, so they hold
/// stores through this trait regardless of the state type.
pub trait ActionSink: Send + Sync {
    /// Forward an action to the underlying store
    fn dispatch(&self, action: Action);
}

pub(crate) struct StoreSink<S>(pub(crate) StoreHandle<S>);

impl<S> ActionSink for StoreSink<S> {
    fn dispatch(&self, action: Action) {
        self.0.dispatch(action);
    }
}

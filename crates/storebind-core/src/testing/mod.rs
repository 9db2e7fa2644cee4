// # Testing Support
//
// In-memory store double and the store inspection API.
//
// ## Purpose
//
// `MockStore` stands in for a real Redux-like store: it records every
// dispatched action, tracks its subscribers and only changes state when a
// test calls `update_state`, which notifies every subscriber synchronously.
//
// `inspector` connects to the store of a bound instance from the outside,
// the way a browser-driving test harness would.

pub mod inspector;

pub use inspector::{CommandKind, CommandStream, StoreCommand, StoreInspector, connect};

use crate::action::Action;
use crate::sync::lock;
use crate::traits::{Listener, Store, Unsubscribe};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

type Subscribers = Arc<Mutex<Vec<(u64, Listener)>>>;

/// In-memory store double
///
/// Dispatching only records the action; the state changes exclusively
/// through [`MockStore::update_state`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use storebind_core::Action;
/// use storebind_core::testing::MockStore;
/// use storebind_core::traits::Store;
///
/// let store = MockStore::new(0u32);
/// let calls = Arc::new(AtomicUsize::new(0));
/// let seen = calls.clone();
/// let unsubscribe = store.subscribe(Arc::new(move || {
///     seen.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// store.update_state(1);
/// store.dispatch(Action::new("ignored"));
/// unsubscribe();
/// store.update_state(2);
///
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// assert_eq!(store.get_state(), 2);
/// assert_eq!(store.dispatched().len(), 1);
/// ```
pub struct MockStore<S> {
    state: Mutex<S>,
    dispatched: Mutex<Vec<Action>>,
    subscribers: Subscribers,
    next_id: AtomicU64,
}

impl<S> MockStore<S> {
    /// Create a store holding `initial`
    pub fn new(initial: S) -> Self {
        Self {
            state: Mutex::new(initial),
            dispatched: Mutex::new(Vec::new()),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Every action dispatched so far, oldest first
    pub fn dispatched(&self) -> Vec<Action> {
        lock(&self.dispatched).clone()
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    /// Replace the state and notify every subscriber
    pub fn update_state(&self, state: S) {
        *lock(&self.state) = state;
        self.notify();
    }

    /// Notify every subscriber without changing the state
    ///
    /// Subscribers are called outside the store's locks, in subscription
    /// order.
    pub fn notify(&self) {
        let listeners: Vec<Listener> = lock(&self.subscribers)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

impl<S: Clone + Send> Store for MockStore<S> {
    type State = S;

    fn get_state(&self) -> S {
        lock(&self.state).clone()
    }

    fn subscribe(&self, listener: Listener) -> Unsubscribe {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.subscribers).push((id, listener));

        let subscribers = Arc::downgrade(&self.subscribers);
        Box::new(move || {
            if let Some(subscribers) = subscribers.upgrade() {
                lock(&subscribers).retain(|(existing, _)| *existing != id);
            }
        })
    }

    fn dispatch(&self, action: Action) {
        lock(&self.dispatched).push(action);
    }
}

impl<S: fmt::Debug> fmt::Debug for MockStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockStore")
            .field("state", &*lock(&self.state))
            .field("dispatched", &lock(&self.dispatched).len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_unsubscribe_removes_only_its_listener() {
        let store = MockStore::new(0u32);
        let calls = Arc::new(AtomicUsize::new(0));

        let first = calls.clone();
        let unsubscribe_first = store.subscribe(Arc::new(move || {
            first.fetch_add(1, Ordering::SeqCst);
        }));
        let second = calls.clone();
        let _keep = store.subscribe(Arc::new(move || {
            second.fetch_add(10, Ordering::SeqCst);
        }));

        unsubscribe_first();
        store.update_state(1);

        assert_eq!(calls.load(Ordering::SeqCst), 10);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_listener_may_read_state() {
        let store = Arc::new(MockStore::new(1u32));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let reader = Arc::downgrade(&store);
        let sink = seen.clone();
        let _unsubscribe = store.subscribe(Arc::new(move || {
            if let Some(store) = reader.upgrade() {
                lock(&sink).push(store.get_state());
            }
        }));

        store.update_state(2);
        store.update_state(3);

        assert_eq!(*lock(&seen), vec![2, 3]);
    }

    #[test]
    fn test_dispatch_records_without_notifying() {
        let store = MockStore::new(0u32);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let _unsubscribe = store.subscribe(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        store.dispatch(Action::new("a"));
        store.dispatch(Action::new("b"));

        let types: Vec<_> = store.dispatched().into_iter().map(|a| a.action_type).collect();
        assert_eq!(types, vec!["a", "b"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

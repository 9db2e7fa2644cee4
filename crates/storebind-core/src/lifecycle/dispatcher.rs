//! Dispatcher trampolines
//!
//! A [`Dispatcher`] is installed for every dispatcher descriptor of a host
//! type. Calling it dispatches straight into the store registered under the
//! descriptor's scope; when no store is registered, the action is wrapped as
//! a relay event and emitted through the host's own event target instead.

use crate::action::Action;
use crate::lifecycle::options::EventTargetFn;
use crate::registry::StoreRegistry;
use crate::scope::Scope;
use crate::sync::lock;
use std::fmt;
use std::sync::{Mutex, Weak};
use tracing::debug;

/// Dispatcher installed on a bound instance
///
/// Clones share the host and may be moved to other threads. A clone must
/// never be called while the host mutex is held, see [`Dispatcher::dispatch`].
pub struct Dispatcher<T> {
    member: &'static str,
    scope: Scope,
    registry: StoreRegistry,
    host: Weak<Mutex<T>>,
    event_target: EventTargetFn<T>,
}

impl<T> Dispatcher<T> {
    pub(crate) fn new(
        member: &'static str,
        scope: Scope,
        registry: StoreRegistry,
        host: Weak<Mutex<T>>,
        event_target: EventTargetFn<T>,
    ) -> Self {
        Self {
            member,
            scope,
            registry,
            host,
            event_target,
        }
    }

    /// Member name this dispatcher was declared under
    pub fn member(&self) -> &'static str {
        self.member
    }

    /// Scope the dispatched actions target
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Dispatch `action`
    ///
    /// The registry is consulted on every call, so a store registered after
    /// the instance was bound is picked up.
    ///
    /// # Deadlocks
    ///
    /// When no store is registered for the scope, the fallback locks the
    /// host to read its event target. The host mutex is not reentrant, so
    /// calling this while the host is locked blocks forever. That includes
    /// the render callback, [`Component::disconnected`], teardown hooks and
    /// closures passed to [`StoreBinding::with`] or
    /// [`StoreBinding::with_mut`]. Record the action there and dispatch it
    /// once the callback has returned.
    ///
    /// [`Component::disconnected`]: crate::traits::Component::disconnected
    /// [`StoreBinding::with`]: crate::lifecycle::StoreBinding::with
    /// [`StoreBinding::with_mut`]: crate::lifecycle::StoreBinding::with_mut
    pub fn dispatch(&self, action: Action) {
        if let Some(sink) = self.registry.get_sink(self.scope) {
            debug!(
                "{} dispatching {} into scope {}",
                self.member, action.action_type, self.scope
            );
            sink.dispatch(action);
            return;
        }

        let event = self.registry.relay().wrap_as_event(action, self.scope);
        let emitter = self.host.upgrade().and_then(|host| {
            let guard = lock(&host);
            (self.event_target)(&*guard)
        });

        match emitter {
            Some(emitter) => {
                debug!(
                    "{} has no store for scope {}, emitting {} as relay event",
                    self.member, self.scope, event.detail.action_type
                );
                emitter.dispatch_event(event);
            }
            None => debug!(
                "{} has no store for scope {} and no event target, dropping {}",
                self.member, self.scope, event.detail.action_type
            ),
        }
    }
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            member: self.member,
            scope: self.scope,
            registry: self.registry.clone(),
            host: self.host.clone(),
            event_target: self.event_target.clone(),
        }
    }
}

impl<T> fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("member", &self.member)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

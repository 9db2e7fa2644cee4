//! Binding options and host hooks

use crate::scope::Scope;
use crate::traits::{Component, EventTarget, StoreHandle};
use std::fmt;
use std::sync::Arc;

/// Render callback invoked after every notification-driven resync
pub type RenderFn<T> = Arc<dyn Fn(&mut T) + Send + Sync>;

/// Host teardown logic
pub(crate) type TeardownFn<T> = Box<dyn FnOnce(&mut T) + Send>;

/// Reads the event emission capability off a host
pub(crate) type EventTargetFn<T> = Arc<dyn Fn(&T) -> Option<Arc<dyn EventTarget>> + Send + Sync>;

/// Where the store of a binding comes from
pub(crate) enum StoreSource<S> {
    /// Registry lookup under [`Scope::DEFAULT`]
    Default,
    /// Registry lookup under an explicit scope
    Scope(Scope),
    /// A store instance supplied directly
    Explicit(StoreHandle<S>),
}

/// Options accepted when binding an instance
///
/// At most one store source is meaningful: setting [`store`](Self::store)
/// or [`scope`](Self::scope) replaces whatever was set before. Without
/// either, the store registered under [`Scope::DEFAULT`] is used.
pub struct BindingOptions<S, T> {
    pub(crate) source: StoreSource<S>,
    pub(crate) render: Option<RenderFn<T>>,
}

impl<S, T> BindingOptions<S, T> {
    /// Options binding to the default scope with no render callback
    pub fn new() -> Self {
        Self {
            source: StoreSource::Default,
            render: None,
        }
    }

    /// Bind to an explicit store instance
    pub fn store(mut self, store: StoreHandle<S>) -> Self {
        self.source = StoreSource::Explicit(store);
        self
    }

    /// Bind to the store registered under `scope`
    ///
    /// If nothing is registered under `scope` when the instance is bound, the
    /// instance stays unbound; it does not fall back to the default scope.
    pub fn scope(mut self, scope: Scope) -> Self {
        self.source = StoreSource::Scope(scope);
        self
    }

    /// Call `render` after every notification-driven resync
    pub fn render(mut self, render: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }
}

impl<S, T> Default for BindingOptions<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, T> fmt::Debug for BindingOptions<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            StoreSource::Default => "default".to_string(),
            StoreSource::Scope(scope) => format!("scope {:?}", scope),
            StoreSource::Explicit(_) => "explicit store".to_string(),
        };
        f.debug_struct("BindingOptions")
            .field("source", &source)
            .field("render", &self.render.is_some())
            .finish()
    }
}

/// Lifecycle hooks of a host
///
/// [`Component`]s provide these through the trait. Hosts bound through
/// [`crate::lifecycle::use_store_for`] supply them explicitly.
pub struct HostHooks<T> {
    pub(crate) teardown: Option<TeardownFn<T>>,
    pub(crate) event_target: EventTargetFn<T>,
}

impl<T: 'static> HostHooks<T> {
    /// No teardown logic and no event target
    pub fn new() -> Self {
        Self {
            teardown: None,
            event_target: Arc::new(|_: &T| -> Option<Arc<dyn EventTarget>> { None }),
        }
    }

    /// Host teardown logic, run after the store subscription is removed
    pub fn on_disconnect(mut self, teardown: impl FnOnce(&mut T) + Send + 'static) -> Self {
        self.teardown = Some(Box::new(teardown));
        self
    }

    /// Emit relay fallback events on a fixed target
    pub fn event_target(mut self, target: Arc<dyn EventTarget>) -> Self {
        self.event_target = Arc::new(move |_: &T| Some(target.clone()));
        self
    }

    /// Read the event target off the host each time a fallback event is emitted
    pub fn event_target_with(
        mut self,
        target: impl Fn(&T) -> Option<Arc<dyn EventTarget>> + Send + Sync + 'static,
    ) -> Self {
        self.event_target = Arc::new(target);
        self
    }
}

impl<C: Component> HostHooks<C> {
    /// Hooks backed by the [`Component`] implementation
    pub fn for_component() -> Self {
        Self::new()
            .on_disconnect(|component: &mut C| component.disconnected())
            .event_target_with(|component: &C| component.event_target())
    }
}

impl<T: 'static> Default for HostHooks<T> {
    fn default() -> Self {
        Self::new()
    }
}

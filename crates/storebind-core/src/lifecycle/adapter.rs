//! Binding for hosts that are not [`Component`](crate::traits::Component)s
//!
//! Objects from other component models are constructed elsewhere and only
//! handed over once they exist. [`use_store_for`] binds such an object in
//! place: the lifecycle runs directly against the shared target, and the
//! target's own teardown and event target are supplied through
//! [`HostHooks`].

use crate::context::BindingContext;
use crate::lifecycle::{BindingOptions, HostHooks, StoreBinding};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Bind an existing host to a store
///
/// Installs dispatchers for `T`, resolves the store from `options`, derives
/// every bound property once and subscribes. Disconnecting the returned
/// binding removes the subscription first and then runs
/// [`HostHooks::on_disconnect`].
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use storebind_core::{BindingContext, BindingOptions, HostHooks, use_store_for};
/// use storebind_core::testing::MockStore;
///
/// #[derive(Clone)]
/// struct Counter(u32);
///
/// #[derive(Default)]
/// struct Badge {
///     count: u32,
///     detached: bool,
/// }
///
/// let ctx = BindingContext::detached();
/// ctx.bindings()
///     .define::<Counter, Badge>()
///     .selector("count", |s: &Counter| s.0, |b: &mut Badge, v| b.count = v);
///
/// let store = Arc::new(MockStore::new(Counter(3)));
/// let badge = Arc::new(Mutex::new(Badge::default()));
/// let binding = use_store_for(
///     &ctx,
///     &badge,
///     BindingOptions::<Counter, Badge>::new().store(store.clone()),
///     HostHooks::new().on_disconnect(|b: &mut Badge| b.detached = true),
/// );
/// assert_eq!(badge.lock().unwrap().count, 3);
///
/// binding.disconnect();
/// assert!(badge.lock().unwrap().detached);
/// ```
pub fn use_store_for<S: 'static, T: Send + 'static>(
    ctx: &BindingContext,
    target: &Arc<Mutex<T>>,
    options: BindingOptions<S, T>,
    hooks: HostHooks<T>,
) -> StoreBinding<S, T> {
    debug!("Binding {} through adapter", std::any::type_name::<T>());
    StoreBinding::attach(ctx, target.clone(), options, hooks)
}

//! Binding lifecycle
//!
//! [`StoreBinding`] connects one host instance to a store:
//!
//! 1. Install a [`Dispatcher`] for every dispatcher descriptor of the host type
//! 2. Resolve the store (explicit store, explicit scope, or the default scope)
//! 3. Derive every bound property from the current state, then subscribe
//! 4. On every notification, derive all properties again, then render
//! 5. On disconnect, unsubscribe, then run the host's own teardown logic
//!
//! ## States
//!
//! ```text
//!  Unbound ──▶ Resolving ──▶ Bound ──(notify)──▶ Bound
//!                  │            │
//!                  ▼            ▼
//!               Unbound ──▶ Disposed
//! ```
//!
//! Failing to resolve a store is not an error: the instance keeps its
//! initial property values, and its dispatchers still work through the
//! registry and the relay fallback.
//!
//! ## Ownership
//!
//! The host is shared as `Arc<Mutex<T>>`. The store listener only holds weak
//! references, so dropping the binding and the host releases everything even
//! if the store outlives them. Store listeners lock the host while deriving
//! properties, so never dispatch into a store while holding the host lock.

mod adapter;
mod dispatcher;
mod options;
mod render;

pub use adapter::use_store_for;
pub use dispatcher::Dispatcher;
pub use options::{BindingOptions, HostHooks, RenderFn};
pub use render::{PerformUpdate, perform_update};

use crate::action::Action;
use crate::bindings::SelectorBinding;
use crate::context::BindingContext;
use crate::error::{Error, Result};
use crate::registry::StoreRegistry;
use crate::scope::Scope;
use crate::sync::{lock, read, write};
use crate::traits::{Component, Listener, Store, StoreHandle, Unsubscribe, noop_unsubscribe};
use options::{StoreSource, TeardownFn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};
use tracing::{debug, info};

/// Lifecycle state of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No store is bound
    Unbound,
    /// Looking up the store
    Resolving,
    /// Subscribed to a store
    Bound,
    /// Torn down
    Disposed,
}

/// Binding of a [`Component`]
pub type Bound<C> = StoreBinding<<C as Component>::State, C>;

/// Selector descriptors applied on every resync
///
/// Class descriptors come from the binding table; instance descriptors are
/// attached to a single binding and applied after the class ones.
struct Resync<S, T> {
    class: Vec<SelectorBinding<S, T>>,
    instance: RwLock<Vec<SelectorBinding<S, T>>>,
}

impl<S, T> Resync<S, T> {
    fn apply(&self, state: &S, target: &mut T) {
        for binding in &self.class {
            binding.apply(state, target);
        }
        for binding in read(&self.instance).iter() {
            binding.apply(state, target);
        }
    }
}

/// Takes one state snapshot and derives every bound property from it
fn resync_target<S, T>(store: &dyn Store<State = S>, target: &Mutex<T>, resync: &Resync<S, T>) {
    let state = store.get_state();
    let mut guard = lock(target);
    resync.apply(&state, &mut guard);
}

/// Binding between one host instance and a store
///
/// Dropping a binding that was never disconnected removes its store
/// subscription but does not run the host's teardown logic.
pub struct StoreBinding<S: 'static, T: 'static> {
    target: Arc<Mutex<T>>,
    store: Option<StoreHandle<S>>,
    resync: Arc<Resync<S, T>>,
    dispatchers: Vec<Dispatcher<T>>,
    unsubscribe: Mutex<Unsubscribe>,
    live: Arc<AtomicBool>,
    state: Mutex<LifecycleState>,
    teardown: Mutex<Option<TeardownFn<T>>>,
}

impl<S: 'static, T: Send + 'static> StoreBinding<S, T> {
    /// Construct a component and bind it
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use storebind_core::{BindingContext, BindingOptions, Bound};
    /// use storebind_core::testing::MockStore;
    /// use storebind_core::traits::Component;
    ///
    /// #[derive(Clone)]
    /// struct AppState {
    ///     title: String,
    /// }
    ///
    /// #[derive(Default)]
    /// struct Header {
    ///     title: String,
    /// }
    ///
    /// impl Component for Header {
    ///     type State = AppState;
    /// }
    ///
    /// let ctx = BindingContext::detached();
    /// ctx.bindings()
    ///     .define_component::<Header>()
    ///     .selector("title", |s: &AppState| s.title.clone(), |h: &mut Header, v| h.title = v);
    /// ctx.registry()
    ///     .register_default_store(Arc::new(MockStore::new(AppState { title: "hi".into() })));
    ///
    /// let header = Bound::<Header>::create(&ctx, Header::default(), BindingOptions::new());
    /// assert_eq!(header.with(|h| h.title.clone()), "hi");
    /// ```
    pub fn create(ctx: &BindingContext, component: T, options: BindingOptions<S, T>) -> Self
    where
        T: Component<State = S>,
    {
        Self::attach(
            ctx,
            Arc::new(Mutex::new(component)),
            options,
            HostHooks::for_component(),
        )
    }

    /// Run construction and binding against a shared host
    pub(crate) fn attach(
        ctx: &BindingContext,
        target: Arc<Mutex<T>>,
        options: BindingOptions<S, T>,
        hooks: HostHooks<T>,
    ) -> Self {
        let class = std::any::type_name::<T>();
        let mut state = LifecycleState::Unbound;

        // Dispatchers come first so they work whether or not a store resolves
        let dispatchers: Vec<Dispatcher<T>> = ctx
            .bindings()
            .dispatchers::<T>()
            .into_iter()
            .map(|binding| {
                Dispatcher::new(
                    binding.member,
                    binding.scope,
                    ctx.registry().clone(),
                    Arc::downgrade(&target),
                    hooks.event_target.clone(),
                )
            })
            .collect();

        state = transition(class, state, LifecycleState::Resolving);
        let store = resolve(ctx.registry(), options.source);

        let resync = Arc::new(Resync {
            class: ctx.bindings().selectors::<S, T>(),
            instance: RwLock::new(Vec::new()),
        });
        let live = Arc::new(AtomicBool::new(true));
        let mut unsubscribe = noop_unsubscribe();

        match &store {
            Some(store) => {
                resync_target(store.as_ref(), &target, &resync);

                let listener = notify_listener(
                    Arc::downgrade(&target),
                    Arc::downgrade(store),
                    resync.clone(),
                    live.clone(),
                    options.render,
                );
                unsubscribe = store.subscribe(listener);
                state = transition(class, state, LifecycleState::Bound);
            }
            None => {
                info!("No store bound for {}, ignoring bindings", class);
                state = transition(class, state, LifecycleState::Unbound);
            }
        }

        Self {
            target,
            store,
            resync,
            dispatchers,
            unsubscribe: Mutex::new(unsubscribe),
            live,
            state: Mutex::new(state),
            teardown: Mutex::new(hooks.teardown),
        }
    }
}

impl<S: 'static, T: 'static> StoreBinding<S, T> {
    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        *lock(&self.state)
    }

    /// Whether the binding is subscribed to a store
    pub fn is_bound(&self) -> bool {
        self.state() == LifecycleState::Bound
    }

    /// The resolved store, if any
    pub fn store(&self) -> Option<&StoreHandle<S>> {
        self.store.as_ref()
    }

    /// The shared host
    pub fn target(&self) -> &Arc<Mutex<T>> {
        &self.target
    }

    /// Read the host
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.target))
    }

    /// Mutate the host
    ///
    /// Do not dispatch from inside `f`: the host stays locked until `f` returns.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut lock(&self.target))
    }

    /// Derive every bound property from the current store state
    ///
    /// A no-op when no store is bound.
    pub fn resync(&self) {
        if let Some(store) = &self.store {
            resync_target(store.as_ref(), &self.target, &self.resync);
        }
    }

    /// Attach a selector to this instance only
    ///
    /// Instance selectors run after the class selectors on every resync, so
    /// they override class selectors for the same property. The property is
    /// derived right away when a store is bound.
    pub fn bind_selector<V: 'static>(
        &self,
        property: &'static str,
        select: impl Fn(&S) -> V + Send + Sync + 'static,
        assign: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) {
        let binding = SelectorBinding::new(property, select, assign);
        if let Some(store) = &self.store {
            let state = store.get_state();
            binding.apply(&state, &mut lock(&self.target));
        }
        write(&self.resync.instance).push(binding);
    }

    /// Dispatchers installed on this instance
    pub fn dispatchers(&self) -> &[Dispatcher<T>] {
        &self.dispatchers
    }

    /// The dispatcher declared under `member`
    ///
    /// When a member was declared more than once, the first declaration wins.
    pub fn dispatcher(&self, member: &str) -> Option<&Dispatcher<T>> {
        self.dispatchers.iter().find(|d| d.member() == member)
    }

    /// Call the dispatcher declared under `member`
    ///
    /// # Errors
    ///
    /// [`Error::UnknownDispatcher`] if the host type declares no such member.
    pub fn dispatch(&self, member: &str, action: Action) -> Result<()> {
        let dispatcher = self
            .dispatcher(member)
            .ok_or_else(|| Error::unknown_dispatcher(std::any::type_name::<T>(), member))?;
        dispatcher.dispatch(action);
        Ok(())
    }

    /// Tear the binding down
    ///
    /// Removes the store subscription, then runs the host's own teardown
    /// logic. Later calls do nothing.
    pub fn disconnect(&self) {
        let class = std::any::type_name::<T>();
        {
            let mut state = lock(&self.state);
            if *state == LifecycleState::Disposed {
                debug!("{} already disconnected", class);
                return;
            }
            *state = transition(class, *state, LifecycleState::Disposed);
        }

        self.release_subscription();

        let teardown = lock(&self.teardown).take();
        if let Some(teardown) = teardown {
            teardown(&mut lock(&self.target));
        }
    }

    fn release_subscription(&self) {
        self.live.store(false, Ordering::SeqCst);
        let unsubscribe = std::mem::replace(&mut *lock(&self.unsubscribe), noop_unsubscribe());
        unsubscribe();
    }
}

impl<S: 'static, T: 'static> Drop for StoreBinding<S, T> {
    fn drop(&mut self) {
        if self.state() != LifecycleState::Disposed {
            self.release_subscription();
        }
    }
}

fn transition(class: &str, from: LifecycleState, to: LifecycleState) -> LifecycleState {
    debug!("{}: {:?} -> {:?}", class, from, to);
    to
}

fn resolve<S: 'static>(registry: &StoreRegistry, source: StoreSource<S>) -> Option<StoreHandle<S>> {
    match source {
        StoreSource::Explicit(store) => Some(store),
        StoreSource::Scope(scope) => registry.get_store(scope),
        StoreSource::Default => registry.get_store(Scope::DEFAULT),
    }
}

fn notify_listener<S: 'static, T: Send + 'static>(
    target: Weak<Mutex<T>>,
    store: Weak<dyn Store<State = S>>,
    resync: Arc<Resync<S, T>>,
    live: Arc<AtomicBool>,
    render: Option<RenderFn<T>>,
) -> Listener {
    Arc::new(move || {
        if !live.load(Ordering::SeqCst) {
            return;
        }
        let (Some(target), Some(store)) = (target.upgrade(), store.upgrade()) else {
            return;
        };

        let state = store.get_state();
        let mut guard = lock(&target);
        resync.apply(&state, &mut guard);
        if let Some(render) = &render {
            render(&mut guard);
        }
    })
}

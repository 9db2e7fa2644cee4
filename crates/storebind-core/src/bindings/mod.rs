//! Per-class binding configuration
//!
//! The binding table records, for each host type, which properties are
//! derived from store state and which members act as dispatchers. It is
//! populated up front (typically right next to the type definition) and read
//! by the lifecycle whenever an instance is bound.
//!
//! ## Usage
//!
//! ```rust
//! use storebind_core::{BindingTable, Scope};
//!
//! struct AppState {
//!     todos: Vec<String>,
//! }
//!
//! #[derive(Default)]
//! struct TodoList {
//!     todos: Vec<String>,
//! }
//!
//! let table = BindingTable::new();
//! table
//!     .define::<AppState, TodoList>()
//!     .selector("todos", |s: &AppState| s.todos.clone(), |c: &mut TodoList, v| c.todos = v)
//!     .dispatcher("add_todo", Scope::DEFAULT);
//!
//! assert_eq!(table.selectors::<AppState, TodoList>().len(), 1);
//! assert_eq!(table.dispatchers::<TodoList>().len(), 1);
//! ```
//!
//! Every call appends a descriptor. Annotating the same property twice keeps
//! both descriptors; avoiding that is up to the caller.

use crate::scope::Scope;
use crate::sync::{read, write};
use crate::traits::Component;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

/// A property derived from store state
///
/// Combines a pure selector (`&S -> V`) with the assignment of its result to
/// the host (`&mut T, V`).
pub struct SelectorBinding<S, T> {
    property: &'static str,
    apply: Arc<dyn Fn(&S, &mut T) + Send + Sync>,
}

impl<S: 'static, T: 'static> SelectorBinding<S, T> {
    /// Create a selector binding for `property`
    pub fn new<V: 'static>(
        property: &'static str,
        select: impl Fn(&S) -> V + Send + Sync + 'static,
        assign: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        Self {
            property,
            apply: Arc::new(move |state: &S, target: &mut T| assign(target, select(state))),
        }
    }
}

impl<S, T> SelectorBinding<S, T> {
    /// Name of the bound property
    pub fn property(&self) -> &'static str {
        self.property
    }

    /// Derive the property from `state` and write it to `target`
    pub fn apply(&self, state: &S, target: &mut T) {
        (self.apply)(state, target)
    }
}

impl<S, T> Clone for SelectorBinding<S, T> {
    fn clone(&self) -> Self {
        Self {
            property: self.property,
            apply: self.apply.clone(),
        }
    }
}

impl<S, T> fmt::Debug for SelectorBinding<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorBinding")
            .field("property", &self.property)
            .finish_non_exhaustive()
    }
}

/// A member that turns calls into store actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherBinding {
    /// Member name
    pub member: &'static str,
    /// Scope the dispatched actions target
    pub scope: Scope,
}

/// Binding descriptors keyed by host type
///
/// Cloning yields another handle onto the same table.
#[derive(Clone, Default)]
pub struct BindingTable {
    /// `Vec<SelectorBinding<S, T>>` keyed by `(T, S)`
    selectors: Arc<RwLock<HashMap<(TypeId, TypeId), Box<dyn Any + Send + Sync>>>>,

    /// Dispatcher descriptors keyed by `T`
    dispatchers: Arc<RwLock<HashMap<TypeId, Vec<DispatcherBinding>>>>,
}

impl BindingTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Start annotating host type `T` bound to state `S`
    pub fn define<S: 'static, T: 'static>(&self) -> ClassBindings<'_, S, T> {
        ClassBindings {
            table: self,
            _marker: PhantomData,
        }
    }

    /// Start annotating a [`Component`]
    pub fn define_component<C: Component>(&self) -> ClassBindings<'_, C::State, C> {
        self.define::<C::State, C>()
    }

    /// Append a selector descriptor for `T`
    pub fn add_selector<S: 'static, T: 'static>(&self, binding: SelectorBinding<S, T>) {
        let key = (TypeId::of::<T>(), TypeId::of::<S>());
        let mut selectors = write(&self.selectors);
        let entry = selectors
            .entry(key)
            .or_insert_with(|| {
                Box::new(Vec::<SelectorBinding<S, T>>::new()) as Box<dyn Any + Send + Sync>
            });

        if let Some(bindings) = entry.downcast_mut::<Vec<SelectorBinding<S, T>>>() {
            bindings.push(binding);
        }
    }

    /// Append a dispatcher descriptor for `T`
    pub fn add_dispatcher<T: 'static>(&self, binding: DispatcherBinding) {
        write(&self.dispatchers)
            .entry(TypeId::of::<T>())
            .or_default()
            .push(binding);
    }

    /// Selector descriptors of `T` for state `S`
    ///
    /// Empty if `T` was never annotated.
    pub fn selectors<S: 'static, T: 'static>(&self) -> Vec<SelectorBinding<S, T>> {
        read(&self.selectors)
            .get(&(TypeId::of::<T>(), TypeId::of::<S>()))
            .and_then(|entry| entry.downcast_ref::<Vec<SelectorBinding<S, T>>>())
            .cloned()
            .unwrap_or_default()
    }

    /// Dispatcher descriptors of `T`
    ///
    /// Empty if `T` was never annotated.
    pub fn dispatchers<T: 'static>(&self) -> Vec<DispatcherBinding> {
        read(&self.dispatchers)
            .get(&TypeId::of::<T>())
            .cloned()
            .unwrap_or_default()
    }
}

/// Builder appending descriptors for one host type
pub struct ClassBindings<'a, S, T> {
    table: &'a BindingTable,
    _marker: PhantomData<fn(&S, &mut T)>,
}

impl<S: 'static, T: 'static> ClassBindings<'_, S, T> {
    /// Bind `property` to a selector
    pub fn selector<V: 'static>(
        self,
        property: &'static str,
        select: impl Fn(&S) -> V + Send + Sync + 'static,
        assign: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        self.table
            .add_selector(SelectorBinding::new(property, select, assign));
        self
    }

    /// Mark `member` as a dispatcher targeting `scope`
    pub fn dispatcher(self, member: &'static str, scope: Scope) -> Self {
        self.table
            .add_dispatcher::<T>(DispatcherBinding { member, scope });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct State {
        value: u32,
    }

    #[derive(Default)]
    struct Host {
        value: u32,
        doubled: u32,
    }

    #[test]
    fn test_unannotated_class_is_empty() {
        let table = BindingTable::new();
        assert!(table.selectors::<State, Host>().is_empty());
        assert!(table.dispatchers::<Host>().is_empty());
    }

    #[test]
    fn test_selectors_accumulate() {
        let table = BindingTable::new();
        table
            .define::<State, Host>()
            .selector("value", |s: &State| s.value, |h: &mut Host, v| h.value = v)
            .selector("doubled", |s: &State| s.value * 2, |h: &mut Host, v| h.doubled = v);

        let selectors = table.selectors::<State, Host>();
        let properties: Vec<_> = selectors.iter().map(|b| b.property()).collect();
        assert_eq!(properties, vec!["value", "doubled"]);

        let mut host = Host::default();
        for binding in &selectors {
            binding.apply(&State { value: 4 }, &mut host);
        }
        assert_eq!(host.value, 4);
        assert_eq!(host.doubled, 8);
    }

    #[test]
    fn test_selectors_are_keyed_by_state_type() {
        let table = BindingTable::new();
        table
            .define::<State, Host>()
            .selector("value", |s: &State| s.value, |h: &mut Host, v| h.value = v);

        assert!(table.selectors::<String, Host>().is_empty());
    }

    #[test]
    fn test_dispatchers_accumulate() {
        let table = BindingTable::new();
        let scope = Scope::new("todos");
        table
            .define::<State, Host>()
            .dispatcher("add", scope)
            .dispatcher("add", scope);

        assert_eq!(
            table.dispatchers::<Host>(),
            vec![
                DispatcherBinding { member: "add", scope },
                DispatcherBinding { member: "add", scope },
            ]
        );
    }
}

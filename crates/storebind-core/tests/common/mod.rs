//! Test doubles and common utilities for binding contract tests
//!
//! These doubles record what the binding machinery does to them (events
//! emitted, subscriptions removed, teardown order) without implementing any
//! real component framework.

#![allow(dead_code)]

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use storebind_core::relay::StoreActionEvent;
use storebind_core::testing::MockStore;
use storebind_core::traits::{Component, EventTarget, Listener, Store, Unsubscribe};
use storebind_core::{Action, BindingContext, Scope};

/// One todo item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoItem {
    pub id: String,
    pub title: String,
    pub done: bool,
}

/// State of the todo store
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TodoState {
    pub todos: Vec<TodoItem>,
}

/// Create an open todo item
pub fn todo(id: &str, title: &str) -> TodoItem {
    TodoItem {
        id: id.to_string(),
        title: title.to_string(),
        done: false,
    }
}

/// Create a state holding `todos`
pub fn todo_state(todos: Vec<TodoItem>) -> TodoState {
    TodoState { todos }
}

/// Ordered log shared between doubles
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// An event target that records every event it emits
#[derive(Default)]
pub struct RecordingTarget {
    events: Mutex<Vec<StoreActionEvent>>,
    forward: Option<Arc<dyn EventTarget>>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record, then hand each event to `next`
    pub fn forwarding_to(next: Arc<dyn EventTarget>) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            forward: Some(next),
        }
    }

    pub fn events(&self) -> Vec<StoreActionEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventTarget for RecordingTarget {
    fn dispatch_event(&self, event: StoreActionEvent) {
        self.events.lock().unwrap().push(event.clone());
        if let Some(next) = &self.forward {
            next.dispatch_event(event);
        }
    }
}

/// A store wrapper that logs when a subscription is removed
pub struct LoggingStore<S> {
    inner: Arc<MockStore<S>>,
    log: CallLog,
}

impl<S> LoggingStore<S> {
    pub fn new(inner: Arc<MockStore<S>>, log: CallLog) -> Self {
        Self { inner, log }
    }
}

impl<S: Clone + Send + 'static> Store for LoggingStore<S> {
    type State = S;

    fn get_state(&self) -> S {
        self.inner.get_state()
    }

    fn subscribe(&self, listener: Listener) -> Unsubscribe {
        let unsubscribe = self.inner.subscribe(listener);
        let log = self.log.clone();
        Box::new(move || {
            log.push("unsubscribe");
            unsubscribe();
        })
    }

    fn dispatch(&self, action: Action) {
        self.inner.dispatch(action);
    }
}

/// A store wrapper that counts state reads
pub struct CountingStore<S> {
    inner: Arc<MockStore<S>>,
    reads: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: Arc<MockStore<S>>) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
        }
    }

    /// Number of `get_state` calls so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl<S: Clone + Send + 'static> Store for CountingStore<S> {
    type State = S;

    fn get_state(&self) -> S {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_state()
    }

    fn subscribe(&self, listener: Listener) -> Unsubscribe {
        self.inner.subscribe(listener)
    }

    fn dispatch(&self, action: Action) {
        self.inner.dispatch(action);
    }
}

/// A todo list component
#[derive(Default)]
pub struct TodoList {
    pub todos: Vec<TodoItem>,
    pub renders: usize,
    pub target: Option<Arc<dyn EventTarget>>,
    pub log: Option<CallLog>,
}

impl TodoList {
    /// A list emitting fallback events on `target`
    pub fn with_target(target: Arc<dyn EventTarget>) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    /// A list logging its own teardown to `log`
    pub fn with_log(log: CallLog) -> Self {
        Self {
            log: Some(log),
            ..Self::default()
        }
    }
}

impl Component for TodoList {
    type State = TodoState;

    fn disconnected(&mut self) {
        if let Some(log) = &self.log {
            log.push("teardown");
        }
    }

    fn event_target(&self) -> Option<Arc<dyn EventTarget>> {
        self.target.clone()
    }
}

/// Annotate `TodoList`: `todos` selector and an `add_todo` dispatcher on `scope`
pub fn define_todo_list(ctx: &BindingContext, scope: Scope) {
    ctx.bindings()
        .define_component::<TodoList>()
        .selector(
            "todos",
            |s: &TodoState| s.todos.clone(),
            |list: &mut TodoList, todos| list.todos = todos,
        )
        .dispatcher("add_todo", scope);
}

/// A host that does not implement `Component`
#[derive(Debug, Default)]
pub struct PlainCounter {
    pub open: usize,
    pub closed: bool,
}

/// Annotate `PlainCounter` with an `open` selector
pub fn define_plain_counter(ctx: &BindingContext) {
    ctx.bindings().define::<TodoState, PlainCounter>().selector(
        "open",
        |s: &TodoState| s.todos.iter().filter(|t| !t.done).count(),
        |counter: &mut PlainCounter, open| counter.open = open,
    );
}

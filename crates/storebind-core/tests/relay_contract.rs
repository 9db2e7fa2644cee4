//! Contract Test: Event Relay
//!
//! Verifies how actions travel when a dispatcher has no store to talk to.
//!
//! Constraints verified:
//! - A dispatcher without a store emits exactly one relay event and
//!   dispatches nothing directly
//! - Scope-tagged events reach only stores of that scope
//! - Scope-less events reach every registered store
//! - Without a transport everything is a silent no-op
//! - A cloned dispatcher relays from another thread once host callbacks
//!   have returned
//!
//! If this test fails, relayed actions are lost or reach the wrong store.

mod common;

use common::*;
use std::sync::{Arc, Mutex};
use std::thread;
use storebind_core::relay::{EventBus, EventRelay, StoreActionEvent};
use storebind_core::testing::MockStore;
use storebind_core::traits::EventTarget;
use storebind_core::{Action, BindingContext, BindingOptions, Bound, RelayConfig, Scope};

fn relayed_context(bus: &Arc<EventBus>) -> BindingContext {
    BindingContext::with_relay(EventRelay::new(bus.clone(), RelayConfig::default()))
}

fn scopeless_event(action: Action) -> StoreActionEvent {
    let config = RelayConfig::default();
    let options = config.event_options();
    StoreActionEvent {
        name: options.event_name.to_string(),
        detail: action,
        bubbles: options.bubbles,
        composed: options.composed,
    }
}

#[test]
fn scenario_b_dispatcher_without_store_emits_one_event() {
    let bus = Arc::new(EventBus::new());
    let ctx = relayed_context(&bus);
    define_todo_list(&ctx, Scope::DEFAULT);
    let other = Arc::new(MockStore::new(todo_state(vec![])));
    ctx.registry().register_store(Scope::new("other"), other.clone());

    let target = Arc::new(RecordingTarget::forwarding_to(bus.clone()));
    let list = Bound::<TodoList>::create(
        &ctx,
        TodoList::with_target(target.clone()),
        BindingOptions::new(),
    );
    list.dispatch("add_todo", Action::new("a")).unwrap();

    let events = target.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "dispatchStoreAction");
    assert_eq!(events[0].detail.action_type, "a");
    assert_eq!(events[0].detail.scope, Some(Scope::DEFAULT));
    assert!(events[0].detail.fields.is_empty());
    assert!(events[0].bubbles && events[0].composed);
    assert!(other.dispatched().is_empty());
}

#[test]
fn cloned_dispatcher_relays_after_render_returns() {
    let bus = Arc::new(EventBus::new());
    let ctx = relayed_context(&bus);
    define_todo_list(&ctx, Scope::DEFAULT);
    let store = Arc::new(MockStore::new(todo_state(vec![])));

    // The render callback runs under the host lock, so it only queues
    let pending = Arc::new(Mutex::new(Vec::new()));
    let queue = pending.clone();
    let target = Arc::new(RecordingTarget::new());
    let list = Bound::<TodoList>::create(
        &ctx,
        TodoList::with_target(target.clone()),
        BindingOptions::new()
            .store(store.clone())
            .render(move |list: &mut TodoList| {
                queue.lock().unwrap().push(list.todos.len());
            }),
    );
    let dispatcher = list.dispatcher("add_todo").unwrap().clone();

    store.update_state(todo_state(vec![todo("1", "x")]));
    let queued: Vec<usize> = pending.lock().unwrap().drain(..).collect();

    thread::spawn(move || {
        for count in queued {
            dispatcher.dispatch(Action::new("todo/seen").with_payload(count));
        }
    })
    .join()
    .unwrap();

    let events = target.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].detail.action_type, "todo/seen");
    assert_eq!(events[0].detail.payload(), Some(&serde_json::json!(1)));
    assert!(store.dispatched().is_empty());
}

#[test]
fn scoped_event_reaches_only_matching_store() {
    let bus = Arc::new(EventBus::new());
    let ctx = relayed_context(&bus);
    let s1 = Scope::new("s1");
    let s2 = Scope::new("s2");
    let store_1 = Arc::new(MockStore::new(todo_state(vec![])));
    let store_2 = Arc::new(MockStore::new(todo_state(vec![])));
    ctx.registry().register_store(s1, store_1.clone());
    ctx.registry().register_store(s2, store_2.clone());

    ctx.registry().relay().emit(Action::new("only/s1"), s1);

    assert_eq!(store_1.dispatched(), vec![Action::new("only/s1")]);
    assert!(store_2.dispatched().is_empty());
    // The scope is stripped before the store sees the action
    assert_eq!(store_1.dispatched()[0].scope, None);
}

#[test]
fn scopeless_event_reaches_every_store() {
    let bus = Arc::new(EventBus::new());
    let ctx = relayed_context(&bus);
    let default_store = Arc::new(MockStore::new(todo_state(vec![])));
    let scoped_store = Arc::new(MockStore::new(todo_state(vec![])));
    ctx.registry().register_default_store(default_store.clone());
    ctx.registry().register_store(Scope::new("todos"), scoped_store.clone());

    bus.dispatch_event(scopeless_event(Action::new("broadcast")));

    assert_eq!(default_store.dispatched(), vec![Action::new("broadcast")]);
    assert_eq!(scoped_store.dispatched(), vec![Action::new("broadcast")]);
}

#[test]
fn relayed_action_reaches_store_of_another_context() {
    // The emitting side has no store; the receiving side shares the bus
    let bus = Arc::new(EventBus::new());
    let scope = Scope::new("shared");
    let emitting = relayed_context(&bus);
    define_todo_list(&emitting, scope);
    let receiving = relayed_context(&bus);
    let store = Arc::new(MockStore::new(todo_state(vec![])));
    receiving.registry().register_store(scope, store.clone());

    let list = Bound::<TodoList>::create(
        &emitting,
        TodoList::with_target(bus.clone()),
        BindingOptions::new(),
    );
    list.dispatch("add_todo", Action::new("todo/add").with("title", "relayed"))
        .unwrap();

    assert_eq!(
        store.dispatched(),
        vec![Action::new("todo/add").with("title", "relayed")]
    );
}

#[test]
fn detached_relay_drops_silently() {
    let ctx = BindingContext::detached();
    define_todo_list(&ctx, Scope::DEFAULT);
    let store = Arc::new(MockStore::new(todo_state(vec![])));
    ctx.registry().register_store(Scope::new("elsewhere"), store.clone());

    // No store for the dispatcher scope and no event target
    let list = Bound::<TodoList>::create(&ctx, TodoList::default(), BindingOptions::new());
    list.dispatch("add_todo", Action::new("dropped")).unwrap();
    ctx.registry().relay().emit(Action::new("dropped"), Scope::DEFAULT);

    assert!(!ctx.registry().relay().is_attached());
    assert_eq!(ctx.registry().relay().listener_count(), 0);
    assert!(store.dispatched().is_empty());
}

#[test]
fn custom_event_name_is_honored() {
    let bus = Arc::new(EventBus::new());
    let config = RelayConfig {
        event_name: "storeAction".to_string(),
        ..RelayConfig::default()
    };
    let ctx = BindingContext::with_relay(EventRelay::new(bus.clone(), config));
    let store = Arc::new(MockStore::new(todo_state(vec![])));
    ctx.registry().register_default_store(store.clone());

    assert_eq!(bus.listener_count("storeAction"), 1);
    assert_eq!(bus.listener_count("dispatchStoreAction"), 0);

    // Events under the default name are ignored
    bus.dispatch_event(scopeless_event(Action::new("ignored")));
    ctx.registry().relay().emit(Action::new("seen"), Scope::DEFAULT);

    assert_eq!(store.dispatched(), vec![Action::new("seen")]);
}

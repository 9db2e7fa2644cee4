//! Contract Test: Store Inspection
//!
//! Verifies that an inspector observes the store of a bound instance.
//!
//! Constraints verified:
//! - Connecting publishes the current state, then one snapshot per notification
//! - Actions dispatched through the inspector reach the store and are logged
//! - A registered inspector handle logs the instance's own dispatches
//! - The command stream stays idle while nothing happens
//! - Instances without a store cannot be inspected
//!
//! If this test fails, external harnesses see stale or missing state.

mod common;

use common::*;
use serde_json::json;
use std::sync::Arc;
use storebind_core::testing::{self, CommandKind, MockStore, StoreInspector};
use storebind_core::{Action, BindingContext, BindingOptions, Bound, Error, Scope};
use tokio_stream::StreamExt;
use tokio_test::{assert_pending, task};

fn bound_list(store: &Arc<MockStore<TodoState>>) -> Bound<TodoList> {
    let ctx = BindingContext::detached();
    define_todo_list(&ctx, Scope::DEFAULT);
    Bound::<TodoList>::create(
        &ctx,
        TodoList::default(),
        BindingOptions::new().store(store.clone()),
    )
}

#[tokio::test]
async fn inspector_streams_state_snapshots() {
    let store = Arc::new(MockStore::new(todo_state(vec![])));
    let list = bound_list(&store);

    let inspector = testing::connect(&list).expect("bound instance can be inspected");
    let mut commands = inspector.commands().expect("stream not taken yet");

    store.update_state(todo_state(vec![todo("1", "x")]));

    let initial = commands.next().await.unwrap();
    assert_eq!(initial.kind, CommandKind::State);
    assert_eq!(initial.payload, json!({"todos": []}));

    let updated = commands.next().await.unwrap();
    assert_eq!(updated.kind, CommandKind::State);
    assert_eq!(
        updated.payload,
        json!({"todos": [{"id": "1", "title": "x", "done": false}]})
    );
    assert!(updated.recorded_at >= initial.recorded_at);
    assert_eq!(inspector.get_state(), updated.payload);
}

#[tokio::test]
async fn inspector_dispatches_into_bound_store() {
    let store = Arc::new(MockStore::new(todo_state(vec![])));
    let list = bound_list(&store);
    let inspector = testing::connect(&list).unwrap();
    let mut commands = inspector.commands().unwrap();

    let action = Action::new("todo/add").with_payload(json!({"title": "x"}));
    inspector.dispatch_action(action.clone());

    assert_eq!(store.dispatched(), vec![action.clone()]);
    assert_eq!(inspector.dispatched_actions(), vec![action]);

    let _initial = commands.next().await.unwrap();
    let dispatched = commands.next().await.unwrap();
    assert_eq!(dispatched.kind, CommandKind::Action);
    assert_eq!(
        dispatched.payload,
        json!({"type": "todo/add", "payload": {"title": "x"}})
    );
}

#[tokio::test]
async fn registered_inspector_logs_component_dispatches() {
    let store = Arc::new(MockStore::new(todo_state(vec![])));
    let inspector = StoreInspector::<TodoState>::wrap(store.clone()).unwrap();
    let mut commands = inspector.commands().unwrap();

    let ctx = BindingContext::detached();
    define_todo_list(&ctx, Scope::DEFAULT);
    ctx.registry().register_default_store(inspector.store());
    let list = Bound::<TodoList>::create(&ctx, TodoList::default(), BindingOptions::new());
    assert!(list.is_bound());

    let action = Action::new("todo/add").with_payload("x");
    list.dispatch("add_todo", action.clone()).unwrap();

    assert_eq!(store.dispatched(), vec![action.clone()]);
    assert_eq!(inspector.dispatched_actions(), vec![action]);

    let _initial = commands.next().await.unwrap();
    let dispatched = commands.next().await.unwrap();
    assert_eq!(dispatched.kind, CommandKind::Action);
    assert_eq!(dispatched.payload, json!({"type": "todo/add", "payload": "x"}));
}

#[tokio::test]
async fn command_stream_is_idle_without_activity() {
    let store = Arc::new(MockStore::new(todo_state(vec![])));
    let list = bound_list(&store);
    let inspector = testing::connect(&list).unwrap();
    let mut commands = task::spawn(inspector.commands().unwrap());

    // Only the initial snapshot is queued
    assert!(commands.poll_next().is_ready());
    assert_pending!(commands.poll_next());

    store.notify();
    assert!(commands.is_woken());
    assert!(commands.poll_next().is_ready());
    assert_pending!(commands.poll_next());
}

#[tokio::test]
async fn disconnected_inspector_stops_snapshots() {
    let store = Arc::new(MockStore::new(todo_state(vec![])));
    let list = bound_list(&store);
    let inspector = testing::connect(&list).unwrap();
    assert_eq!(store.subscriber_count(), 2);

    inspector.disconnect();
    store.update_state(todo_state(vec![todo("1", "x")]));

    assert_eq!(store.subscriber_count(), 1);
    assert_eq!(inspector.get_state(), json!({"todos": []}));
}

#[test]
fn unbound_instance_cannot_be_inspected() {
    let ctx = BindingContext::detached();
    define_todo_list(&ctx, Scope::DEFAULT);
    let list = Bound::<TodoList>::create(&ctx, TodoList::default(), BindingOptions::new());

    let result = testing::connect(&list);

    assert!(matches!(result, Err(Error::NoBoundStore(_))));
}

#[test]
fn commands_serialize_with_timestamp() {
    let store = Arc::new(MockStore::new(todo_state(vec![])));
    let list = bound_list(&store);
    let inspector = testing::connect(&list).unwrap();
    let mut commands = task::spawn(inspector.commands().unwrap());

    let std::task::Poll::Ready(Some(command)) = commands.poll_next() else {
        panic!("initial snapshot is queued on connect");
    };
    let value = serde_json::to_value(&command).unwrap();

    assert_eq!(value["kind"], "state");
    assert_eq!(value["payload"], json!({"todos": []}));
    assert!(value["recorded_at"].is_string());
}

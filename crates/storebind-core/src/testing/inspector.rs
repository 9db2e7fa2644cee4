//! Store inspection
//!
//! Connects to the store of a bound instance from outside the component
//! tree. The inspector keeps the latest state snapshot as JSON, logs
//! actions and publishes both as a stream of [`StoreCommand`]s.
//!
//! Every inspector owns a recording handle to its store, see
//! [`StoreInspector::store`]. Actions reach the log when they pass through
//! that handle. Registering or binding the handle instead of the raw store
//! puts every dispatcher, relayed event and direct call on the log.
//!
//! ```text
//!   attach / connect ──▶ State snapshot
//!   notify           ──▶ State snapshot
//!   store().dispatch ──▶ store.dispatch, then Action command
//! ```

use crate::action::Action;
use crate::error::{Error, Result};
use crate::lifecycle::StoreBinding;
use crate::sync::lock;
use crate::traits::{Store, StoreHandle, Unsubscribe, noop_unsubscribe};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, warn};

/// Stream of commands observed by an inspector
pub type CommandStream = UnboundedReceiverStream<StoreCommand>;

/// Kind of an inspected command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// An action received by the inspected store
    Action,
    /// A state snapshot
    State,
}

/// One observed store command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreCommand {
    /// Command kind
    pub kind: CommandKind,
    /// The action or the state, as JSON
    pub payload: Value,
    /// When the command was observed
    pub recorded_at: DateTime<Utc>,
}

impl StoreCommand {
    fn new(kind: CommandKind, payload: Value) -> Self {
        Self {
            kind,
            payload,
            recorded_at: Utc::now(),
        }
    }
}

/// Latest snapshot plus the command channel, shared with the store listener
struct Recorder {
    latest: Mutex<Value>,
    actions: Mutex<Vec<Action>>,
    sender: UnboundedSender<StoreCommand>,
}

impl Recorder {
    fn record_state(&self, state: Value) {
        *lock(&self.latest) = state.clone();
        self.send(StoreCommand::new(CommandKind::State, state));
    }

    fn record_action(&self, action: Action) {
        let payload = action.to_value();
        lock(&self.actions).push(action);
        self.send(StoreCommand::new(CommandKind::Action, payload));
    }

    fn send(&self, command: StoreCommand) {
        // Nobody listening is fine, the snapshot and log are still kept
        if self.sender.send(command).is_err() {
            debug!("Inspector command stream closed");
        }
    }
}

/// Store decorator that logs each action after forwarding it
struct InspectedStore<S: 'static> {
    inner: StoreHandle<S>,
    recorder: Arc<Recorder>,
}

impl<S: 'static> Store for InspectedStore<S> {
    type State = S;

    fn get_state(&self) -> S {
        self.inner.get_state()
    }

    fn subscribe(&self, listener: crate::traits::Listener) -> Unsubscribe {
        self.inner.subscribe(listener)
    }

    fn dispatch(&self, action: Action) {
        self.inner.dispatch(action.clone());
        self.recorder.record_action(action);
    }
}

/// Inspector attached to a bound store
pub struct StoreInspector<S: 'static> {
    store: StoreHandle<S>,
    recorder: Arc<Recorder>,
    receiver: Mutex<Option<UnboundedReceiver<StoreCommand>>>,
    unsubscribe: Mutex<Unsubscribe>,
}

/// Connect an inspector to the store bound to `binding`
///
/// Publishes the current state right away, then one snapshot per store
/// notification. Only actions sent through [`StoreInspector::store`] or
/// [`StoreInspector::dispatch_action`] are logged: the binding keeps the
/// store it was created with. To log the instance's own dispatches, bind
/// the handle of an inspector made with [`StoreInspector::wrap`].
///
/// # Errors
///
/// - [`Error::NoBoundStore`] if `binding` has no resolved store
/// - [`Error::Json`] if the current state cannot be serialized
pub fn connect<S, T>(binding: &StoreBinding<S, T>) -> Result<StoreInspector<S>>
where
    S: Serialize + 'static,
    T: 'static,
{
    let store = binding
        .store()
        .cloned()
        .ok_or(Error::NoBoundStore(std::any::type_name::<T>()))?;
    StoreInspector::attach(store)
}

impl<S: Serialize + 'static> StoreInspector<S> {
    /// Wrap a store before it is registered or bound
    ///
    /// Register or bind [`store`](Self::store) in place of `store` so that
    /// every action the store receives is logged.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use storebind_core::testing::{MockStore, StoreInspector};
    /// use storebind_core::traits::Store;
    /// use storebind_core::{Action, BindingContext, Scope};
    ///
    /// let ctx = BindingContext::detached();
    /// let inspector = StoreInspector::<u32>::wrap(Arc::new(MockStore::new(0u32))).unwrap();
    /// ctx.registry().register_default_store(inspector.store());
    ///
    /// let store = ctx.registry().get_store::<u32>(Scope::DEFAULT).unwrap();
    /// store.dispatch(Action::new("increment"));
    /// assert_eq!(inspector.dispatched_actions(), vec![Action::new("increment")]);
    /// ```
    pub fn wrap(store: StoreHandle<S>) -> Result<Self> {
        Self::attach(store)
    }

    /// Attach directly to a store
    pub fn attach(store: StoreHandle<S>) -> Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let initial = serde_json::to_value(store.get_state())?;
        let recorder = Arc::new(Recorder {
            latest: Mutex::new(Value::Null),
            actions: Mutex::new(Vec::new()),
            sender,
        });
        recorder.record_state(initial);

        let unsubscribe = store.subscribe(snapshot_listener(
            Arc::downgrade(&store),
            Arc::downgrade(&recorder),
        ));
        let store: StoreHandle<S> = Arc::new(InspectedStore {
            inner: store,
            recorder: recorder.clone(),
        });

        Ok(Self {
            store,
            recorder,
            receiver: Mutex::new(Some(receiver)),
            unsubscribe: Mutex::new(unsubscribe),
        })
    }
}

impl<S: 'static> StoreInspector<S> {
    /// Latest state snapshot
    pub fn get_state(&self) -> Value {
        lock(&self.recorder.latest).clone()
    }

    /// Actions received through [`store`](Self::store), oldest first
    pub fn dispatched_actions(&self) -> Vec<Action> {
        lock(&self.recorder.actions).clone()
    }

    /// Recording handle to the inspected store
    ///
    /// Reads and subscriptions go straight to the store. Each dispatch is
    /// logged after the store has processed it, so snapshots caused by an
    /// action precede it on the stream.
    pub fn store(&self) -> StoreHandle<S> {
        self.store.clone()
    }

    /// Dispatch `action` into the inspected store
    pub fn dispatch_action(&self, action: Action) {
        self.store.dispatch(action);
    }

    /// Take the command stream
    ///
    /// Returns `None` after the first call.
    pub fn commands(&self) -> Option<CommandStream> {
        lock(&self.receiver).take().map(UnboundedReceiverStream::new)
    }

    /// Stop receiving store notifications
    pub fn disconnect(&self) {
        let unsubscribe = std::mem::replace(&mut *lock(&self.unsubscribe), noop_unsubscribe());
        unsubscribe();
    }
}

impl<S: 'static> Drop for StoreInspector<S> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn snapshot_listener<S: Serialize + 'static>(
    store: Weak<dyn Store<State = S>>,
    recorder: Weak<Recorder>,
) -> crate::traits::Listener {
    Arc::new(move || {
        let (Some(store), Some(recorder)) = (store.upgrade(), recorder.upgrade()) else {
            return;
        };
        match serde_json::to_value(store.get_state()) {
            Ok(state) => recorder.record_state(state),
            Err(e) => warn!("Failed to serialize inspected state: {}", e),
        }
    })
}

// # todo_demo - Interactive Todo List
//
// Wires a reducer store to three hosts and drives it from stdin:
//
// - `TodoList`: a `Component` with a `todos` selector and an `add_todo`
//   dispatcher that talks to the store directly
// - `OpenCount`: a plain struct bound through `use_store_for`
// - `QuickAdd`: a component living in a context without stores, whose
//   dispatcher reaches the store through the event relay
//
// The store is registered through an inspector, which logs every state
// snapshot and every action the store receives at debug level.
//
// ## Configuration
//
// - `TODO_DEMO_CONFIG`: Optional path to a JSON storebind configuration
// - `TODO_DEMO_LOG_LEVEL`: trace, debug, info, warn or error (default info)
//
// ## Commands
//
// ```text
// add <title>     add through TodoList (direct dispatch)
// quick <title>   add through QuickAdd (relayed)
// toggle <id>     flip a todo
// clear           drop finished todos
// list            print the list
// quit            exit
// ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::env;
use std::process::ExitCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use storebind_core::testing::{StoreCommand, StoreInspector};
use storebind_core::traits::{Component, EventTarget, Listener, Store, StoreHandle, Unsubscribe};
use storebind_core::{
    Action, BindingContext, BindingOptions, Bound, EventBus, EventRelay, HostHooks, Scope,
    StorebindConfig, use_store_for,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::{LinesStream, UnboundedReceiverStream};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum DemoExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DemoExitCode> for ExitCode {
    fn from(code: DemoExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Demo configuration
struct Config {
    storebind: StorebindConfig,
    log_level: Level,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let storebind = match env::var("TODO_DEMO_CONFIG") {
            Ok(path) => StorebindConfig::load(&path)
                .with_context(|| format!("Failed to load TODO_DEMO_CONFIG '{}'", path))?,
            Err(_) => StorebindConfig::new(),
        };

        let level = env::var("TODO_DEMO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_level = match level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            other => anyhow::bail!(
                "TODO_DEMO_LOG_LEVEL '{}' is not supported. \
                Supported levels: trace, debug, info, warn, error",
                other
            ),
        };

        Ok(Self {
            storebind,
            log_level,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Todo {
    id: u64,
    title: String,
    done: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
struct TodoState {
    todos: Vec<Todo>,
    next_id: u64,
}

fn reduce(state: &TodoState, action: &Action) -> TodoState {
    let mut next = state.clone();
    match action.action_type.as_str() {
        "todo/add" => {
            let title = action
                .payload()
                .and_then(|p| p.as_str())
                .unwrap_or("untitled")
                .to_string();
            next.next_id += 1;
            next.todos.push(Todo {
                id: next.next_id,
                title,
                done: false,
            });
        }
        "todo/toggle" => {
            let id = action.payload().and_then(|p| p.as_u64());
            for todo in next.todos.iter_mut().filter(|t| Some(t.id) == id) {
                todo.done = !todo.done;
            }
        }
        "todo/clear" => next.todos.retain(|t| !t.done),
        other => debug!("Ignoring unknown action {}", other),
    }
    next
}

type Reducer<S> = fn(&S, &Action) -> S;

/// Minimal reducer store
struct ReducerStore<S> {
    state: Mutex<S>,
    reducer: Reducer<S>,
    listeners: Arc<Mutex<Vec<(u64, Listener)>>>,
    next_id: AtomicU64,
}

impl<S> ReducerStore<S> {
    fn new(initial: S, reducer: Reducer<S>) -> Self {
        Self {
            state: Mutex::new(initial),
            reducer,
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<S: Clone + Send> Store for ReducerStore<S> {
    type State = S;

    fn get_state(&self) -> S {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn subscribe(&self, listener: Listener) -> Unsubscribe {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));

        let listeners = Arc::downgrade(&self.listeners);
        Box::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|(existing, _)| *existing != id);
            }
        })
    }

    fn dispatch(&self, action: Action) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            *state = (self.reducer)(&state, &action);
        }

        // Notify outside the state lock, listeners read the state right away
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

#[derive(Default)]
struct TodoList {
    todos: Vec<Todo>,
}

impl TodoList {
    fn print(&self) {
        if self.todos.is_empty() {
            info!("(no todos)");
        }
        for todo in &self.todos {
            info!("[{}] {} {}", if todo.done { "x" } else { " " }, todo.id, todo.title);
        }
    }
}

impl Component for TodoList {
    type State = TodoState;

    fn disconnected(&mut self) {
        info!("TodoList detached with {} todo(s)", self.todos.len());
    }
}

struct QuickAdd {
    bus: Arc<EventBus>,
}

impl Component for QuickAdd {
    type State = TodoState;

    fn event_target(&self) -> Option<Arc<dyn EventTarget>> {
        Some(self.bus.clone())
    }
}

#[derive(Debug, Default)]
struct OpenCount {
    open: usize,
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DemoExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DemoExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DemoExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(config).await {
            error!("Demo error: {:#}", e);
            DemoExitCode::RuntimeError
        } else {
            DemoExitCode::CleanShutdown
        }
    });

    result.into()
}

async fn run(config: Config) -> Result<()> {
    let todos = Scope::new("todos");
    let bus = Arc::new(EventBus::new());

    // The app context owns the store and listens on the bus
    let app = BindingContext::with_relay(EventRelay::new(bus.clone(), config.storebind.relay));
    app.bindings()
        .define_component::<TodoList>()
        .selector(
            "todos",
            |s: &TodoState| s.todos.clone(),
            |list: &mut TodoList, todos| list.todos = todos,
        )
        .dispatcher("add_todo", todos);
    app.bindings().define::<TodoState, OpenCount>().selector(
        "open",
        |s: &TodoState| s.todos.iter().filter(|t| !t.done).count(),
        |count: &mut OpenCount, open| count.open = open,
    );

    let reducer_store = Arc::new(ReducerStore::new(TodoState::default(), reduce));
    let inspector = StoreInspector::<TodoState>::wrap(reducer_store)
        .context("Failed to inspect the todo store")?;
    if let Some(commands) = inspector.commands() {
        tokio::spawn(log_commands(commands));
    }
    let store = inspector.store();
    app.registry().register_store(todos, store.clone());

    // A widget context without stores, reaching the app only through the bus
    let widgets = BindingContext::with_relay(EventRelay::detached());
    widgets
        .bindings()
        .define_component::<QuickAdd>()
        .dispatcher("submit", todos);

    let list =
        Bound::<TodoList>::create(&app, TodoList::default(), BindingOptions::new().scope(todos));
    let open_count = Arc::new(Mutex::new(OpenCount::default()));
    let counter = use_store_for(
        &app,
        &open_count,
        BindingOptions::<TodoState, OpenCount>::new()
            .scope(todos)
            .render(|count: &mut OpenCount| info!("{} open todo(s)", count.open)),
        HostHooks::new().on_disconnect(|count: &mut OpenCount| {
            debug!("OpenCount detached at {}", count.open)
        }),
    );
    let quick_add = Bound::<QuickAdd>::create(
        &widgets,
        QuickAdd { bus: bus.clone() },
        BindingOptions::new(),
    );
    if !quick_add.is_bound() {
        debug!("QuickAdd has no store and relays through the bus");
    }

    info!("Todo demo ready, type `quit` to exit");

    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    loop {
        tokio::select! {
            line = lines.next() => {
                let Some(line) = line else { break };
                let line = line.context("Failed to read stdin")?;
                if !handle_command(line.trim(), &list, &quick_add, &store)? {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received SIGINT");
                break;
            }
        }
    }

    info!("Shutting down");
    inspector.disconnect();
    counter.disconnect();
    list.disconnect();
    quick_add.disconnect();
    Ok(())
}

/// Run one stdin command, returns false on `quit`
fn handle_command(
    line: &str,
    list: &Bound<TodoList>,
    quick_add: &Bound<QuickAdd>,
    store: &StoreHandle<TodoState>,
) -> Result<bool> {
    let (command, argument) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "" => {}
        "add" => list.dispatch("add_todo", Action::new("todo/add").with_payload(argument))?,
        "quick" => quick_add.dispatch("submit", Action::new("todo/add").with_payload(argument))?,
        "toggle" => match argument.parse::<u64>() {
            Ok(id) => store.dispatch(Action::new("todo/toggle").with_payload(id)),
            Err(_) => warn!("toggle expects a numeric id, got '{}'", argument),
        },
        "clear" => store.dispatch(Action::new("todo/clear")),
        "list" => list.with(TodoList::print),
        "quit" => return Ok(false),
        other => warn!("Unknown command '{}'", other),
    }
    Ok(true)
}

async fn log_commands(mut commands: UnboundedReceiverStream<StoreCommand>) {
    while let Some(command) = commands.next().await {
        match serde_json::to_string(&command) {
            Ok(json) => debug!("inspector: {}", json),
            Err(e) => warn!("Failed to serialize inspector command: {}", e),
        }
    }
}

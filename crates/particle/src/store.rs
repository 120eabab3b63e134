// File: src/store.rs
// Purpose: Process-memory state store with reducers, action middleware and subscribers

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Store state: a JSON object
pub type State = Map<String, Value>;

/// `(state, action) -> next state`
pub type Reducer = Arc<dyn Fn(&State, &Action) -> State + Send + Sync>;

/// `(state, action) -> action`; `None` drops the action
pub type ActionMiddleware = Arc<dyn Fn(&State, Action) -> Option<Action> + Send + Sync>;

pub type Listener = Arc<dyn Fn(&State) + Send + Sync>;

/// An action: `{"type": ..., "payload": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = payload.into();
        self
    }
}

struct StoreInner {
    state: State,
    reducers: HashMap<String, Reducer>,
    middleware: Vec<ActionMiddleware>,
    listeners: Vec<(u64, Listener)>,
    next_listener: u64,
    persist_keys: Vec<String>,
    logger: bool,
}

/// Shared store handle. Clones see the same state.
///
/// ```
/// use particle::store::{Action, Store};
/// use serde_json::{json, Map, Value};
///
/// let store = Store::new(Map::new());
/// store.add_reducer("increment", |state, _action| {
///     let mut next = state.clone();
///     let count = next.get("count").and_then(Value::as_i64).unwrap_or(0);
///     next.insert("count".into(), json!(count + 1));
///     next
/// });
/// store.dispatch(Action::new("increment"));
/// assert_eq!(store.get_state()["count"], json!(1));
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<RwLock<StoreInner>>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("Store")
            .field("state", &inner.state)
            .field("reducers", &inner.reducers.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(State::new())
    }
}

impl Store {
    pub fn new(initial_state: State) -> Self {
        Self::with_persist_keys(initial_state, Vec::<String>::new())
    }

    /// `persist_keys` name the state entries handed to the client for
    /// local persistence, see [`Store::persisted_state`]
    pub fn with_persist_keys<I, S>(initial_state: State, persist_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                state: initial_state,
                reducers: HashMap::new(),
                middleware: Vec::new(),
                listeners: Vec::new(),
                next_listener: 0,
                persist_keys: persist_keys.into_iter().map(Into::into).collect(),
                logger: false,
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the current state
    pub fn get_state(&self) -> State {
        self.read().state.clone()
    }

    pub fn add_reducer<F>(&self, action_type: impl Into<String>, reducer: F)
    where
        F: Fn(&State, &Action) -> State + Send + Sync + 'static,
    {
        self.write().reducers.insert(action_type.into(), Arc::new(reducer));
    }

    /// Middleware run in registration order before the reducer
    pub fn add_middleware<F>(&self, middleware: F)
    where
        F: Fn(&State, Action) -> Option<Action> + Send + Sync + 'static,
    {
        self.write().middleware.push(Arc::new(middleware));
    }

    /// Log every dispatched action and state change at `info`
    pub fn enable_logger(&self) {
        self.write().logger = true;
    }

    /// Call `listener` after every state change
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&State) + Send + Sync + 'static,
    {
        let mut inner = self.write();
        let id = inner.next_listener;
        inner.next_listener += 1;
        inner.listeners.push((id, Arc::new(listener)));
        Subscription {
            id,
            store: self.clone(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.read().listeners.len()
    }

    /// Run `action` through the middleware and its reducer, then notify
    /// subscribers. Returns `false` when a middleware dropped the action or
    /// no reducer is registered for its type.
    ///
    /// The reducer is chosen by the type the action had when dispatched.
    pub fn dispatch(&self, action: Action) -> bool {
        let action_type = action.kind.clone();
        let (state, middleware, reducer, logger) = {
            let inner = self.read();
            (
                inner.state.clone(),
                inner.middleware.clone(),
                inner.reducers.get(&action_type).cloned(),
                inner.logger,
            )
        };

        if logger {
            info!(action = %action_type, payload = %action.payload, "store action");
        }

        let mut action = action;
        for mw in &middleware {
            match mw(&state, action) {
                Some(next) => action = next,
                None => {
                    debug!(action = %action_type, "action dropped by middleware");
                    return false;
                }
            }
        }

        let Some(reducer) = reducer else {
            debug!(action = %action_type, "no reducer for action");
            return false;
        };

        let (next, listeners) = {
            let mut inner = self.write();
            let next = reducer(&inner.state, &action);
            inner.state = next.clone();
            let listeners: Vec<Listener> = inner.listeners.iter().map(|(_, l)| l.clone()).collect();
            (next, listeners)
        };

        if logger {
            info!(prev = %serde_json::Value::Object(state), next = %serde_json::Value::Object(next.clone()), "store state changed");
        }

        for listener in listeners {
            listener(&next);
        }
        true
    }

    /// The persisted subset of the state
    pub fn persisted_state(&self) -> State {
        let inner = self.read();
        inner
            .persist_keys
            .iter()
            .filter_map(|key| inner.state.get(key).map(|value| (key.clone(), value.clone())))
            .collect()
    }

    fn unsubscribe(&self, id: u64) -> bool {
        let mut inner = self.write();
        let before = inner.listeners.len();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
        inner.listeners.len() != before
    }
}

/// Handle returned by [`Store::subscribe`]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    store: Store,
}

impl Subscription {
    /// Stop receiving updates. Returns `false` if already removed.
    pub fn unsubscribe(self) -> bool {
        self.store.unsubscribe(self.id)
    }
}

static GLOBAL_STORE: Lazy<RwLock<Option<Store>>> = Lazy::new(|| RwLock::new(None));

/// Create the process-wide store, replacing any previous one
pub fn create_store<I, S>(initial_state: State, persist_keys: I) -> Store
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let store = Store::with_persist_keys(initial_state, persist_keys);
    *GLOBAL_STORE.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(store.clone());
    store
}

/// The process-wide store, if one was created
pub fn use_store() -> Option<Store> {
    GLOBAL_STORE
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

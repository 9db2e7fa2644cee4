//! Actions dispatched into stores
//!
//! An [`Action`] is a `type` string plus arbitrary JSON fields. When it
//! travels through the event relay it additionally carries the [`Scope`] it
//! targets; the relay strips that scope again before the store sees it.

use crate::error::{Error, Result};
use crate::scope::Scope;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Field name holding the action type
const TYPE_KEY: &str = "type";

/// A store action
///
/// Serializes as a flat JSON object, e.g.
/// `{"type": "todo/add", "payload": {"title": "x"}}`. The scope is transport
/// metadata and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Action type
    #[serde(rename = "type")]
    pub action_type: String,

    /// Target scope, only set while the action travels through the relay
    #[serde(skip)]
    pub scope: Option<Scope>,

    /// Remaining fields
    ///
    /// `type` is reserved for [`action_type`](Self::action_type) and must not
    /// appear here.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Action {
    /// Create an action with no extra fields
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            scope: None,
            fields: Map::new(),
        }
    }

    /// Add a field
    ///
    /// The reserved key `type` is ignored; set
    /// [`action_type`](Self::action_type) instead.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key == TYPE_KEY {
            warn!("Ignoring reserved `type` field on action {}", self.action_type);
            return self;
        }
        self.fields.insert(key, value.into());
        self
    }

    /// Add a `payload` field
    pub fn with_payload(self, payload: impl Into<Value>) -> Self {
        self.with("payload", payload)
    }

    /// Get a field by name
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get the `payload` field
    pub fn payload(&self) -> Option<&Value> {
        self.field("payload")
    }

    /// Copy of this action tagged with `scope`
    pub fn scoped(&self, scope: Scope) -> Self {
        Self {
            scope: Some(scope),
            ..self.clone()
        }
    }

    /// Copy of this action without a scope
    pub fn unscoped(&self) -> Self {
        Self {
            scope: None,
            ..self.clone()
        }
    }

    /// Read an action from a JSON value
    ///
    /// The value must be an object with a string `type` field.
    pub fn from_value(value: Value) -> Result<Self> {
        match value.get(TYPE_KEY) {
            Some(Value::String(_)) => Ok(serde_json::from_value(value)?),
            Some(other) => Err(Error::invalid_action(format!(
                "`type` must be a string, got {}",
                other
            ))),
            None => Err(Error::invalid_action("missing `type` field")),
        }
    }

    /// JSON representation of this action
    pub fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert(TYPE_KEY.to_string(), Value::String(self.action_type.clone()));
        Value::Object(object)
    }
}

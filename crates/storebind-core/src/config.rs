//! Configuration types for storebind
//!
//! Only the relay transport is configurable from data. Which store a
//! component binds to is chosen in code through
//! [`crate::lifecycle::BindingOptions`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main storebind configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorebindConfig {
    /// Event relay settings
    #[serde(default)]
    pub relay: RelayConfig,
}

impl StorebindConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.relay.validate()
    }
}

/// Event relay configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Name of the events the relay listens for
    #[serde(default = "default_event_name")]
    pub event_name: String,

    /// Whether wrapped actions bubble
    #[serde(default = "default_true")]
    pub bubbles: bool,

    /// Whether wrapped actions cross shadow boundaries
    #[serde(default = "default_true")]
    pub composed: bool,
}

impl RelayConfig {
    /// Validate the relay configuration
    pub fn validate(&self) -> Result<()> {
        if self.event_name.is_empty() {
            return Err(Error::config("Relay event name cannot be empty"));
        }
        if self.event_name.chars().any(char::is_whitespace) {
            return Err(Error::config(format!(
                "Relay event name cannot contain whitespace: '{}'",
                self.event_name
            )));
        }
        Ok(())
    }

    /// Event options hosts use to configure their own emitters
    ///
    /// Frameworks that declare emitted events up front (rather than calling
    /// [`crate::relay::EventRelay::wrap_as_event`]) use these to stay
    /// compatible with the relay.
    pub fn event_options(&self) -> EventOptions<'_> {
        EventOptions {
            event_name: &self.event_name,
            bubbles: self.bubbles,
            composed: self.composed,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            event_name: default_event_name(),
            bubbles: true,
            composed: true,
        }
    }
}

/// Emitter options derived from a [`RelayConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOptions<'a> {
    /// Event name
    pub event_name: &'a str,
    /// Whether the event bubbles
    pub bubbles: bool,
    /// Whether the event crosses shadow boundaries
    pub composed: bool,
}

/// Default relay event name
pub const DEFAULT_EVENT_NAME: &str = "dispatchStoreAction";

fn default_event_name() -> String {
    DEFAULT_EVENT_NAME.to_string()
}

fn default_true() -> bool {
    true
}

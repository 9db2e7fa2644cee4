//! Error types for store binding
//!
//! Binding, notification, disposal and dispatch never fail for normal usage.
//! The variants below cover the fallible edges: configuration, action
//! parsing, dispatcher lookup by name and store inspection.

use thiserror::Error;

/// Result type alias for storebind operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for storebind
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A dispatcher member was called that the class never declared
    #[error("Unknown dispatcher `{member}` on {class}")]
    UnknownDispatcher {
        /// Host type name
        class: &'static str,
        /// Requested member name
        member: String,
    },

    /// The instance has no resolved store
    #[error("No bound store on {0}")]
    NoBoundStore(&'static str),

    /// A JSON value could not be read as an action
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors (config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unknown dispatcher error
    pub fn unknown_dispatcher(class: &'static str, member: impl Into<String>) -> Self {
        Self::UnknownDispatcher {
            class,
            member: member.into(),
        }
    }

    /// Create an invalid action error
    pub fn invalid_action(msg: impl Into<String>) -> Self {
        Self::InvalidAction(msg.into())
    }
}

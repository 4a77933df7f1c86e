//! Error types for modelkit.
//!
//! Pipe and destination failures travel as [`anyhow::Error`] so callers can
//! downcast back to whatever the pipe raised, a [`ModelkitError`] included.
//! Everything modelkit raises on its own is a [`ModelkitError`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for modelkit operations.
#[derive(Debug, Error)]
pub enum ModelkitError {
    /// A lookup by identifier matched nothing, or fewer rows than requested.
    #[error("{0}")]
    NotFound(#[from] ModelNotFoundError),

    /// A session save had no key to write under.
    #[error("{0}")]
    SessionKey(#[from] SessionKeyError),

    /// The underlying query builder failed.
    #[error("Query error: {0}")]
    Query(String),

    /// The underlying session store failed.
    #[error("Session error: {0}")]
    Session(String),

    /// A job was pushed onto a queue that no longer accepts work.
    #[error("Queue '{0}' is closed")]
    QueueClosed(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ModelkitError {
    /// Returns true if this is a not-found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Error raised when a model lookup by UUID comes back empty or short.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("No query results for model [{model}] {}", format_ids(ids))]
pub struct ModelNotFoundError {
    /// The model type that was queried.
    pub model: String,
    /// The identifiers that were requested.
    pub ids: Vec<Uuid>,
}

fn format_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ModelNotFoundError {
    /// Creates a new not-found error for a model.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ids: Vec::new(),
        }
    }

    /// Sets the requested identifiers.
    #[must_use]
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.ids = ids.into_iter().collect();
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert(
            "model".to_string(),
            serde_json::Value::String(self.model.clone()),
        );
        map.insert(
            "ids".to_string(),
            serde_json::Value::Array(
                self.ids
                    .iter()
                    .map(|id| serde_json::Value::String(id.to_string()))
                    .collect(),
            ),
        );
        map
    }
}

/// Error raised when an object is saved to the session without any key.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("The {type_name} does not have a default session key")]
pub struct SessionKeyError {
    /// The type that attempted the save.
    pub type_name: String,
}

impl SessionKeyError {
    /// Creates a new session key error.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }

    /// Creates the error for a concrete type.
    #[must_use]
    pub fn for_type<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>())
    }
}

/// Result alias for modelkit operations.
pub type Result<T, E = ModelkitError> = std::result::Result<T, E>;

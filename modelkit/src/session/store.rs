//! Session store contract and an in-memory implementation.

use crate::errors::ModelkitError;
use dashmap::DashMap;
use serde_json::Value;

/// A key-value session store.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: Value) -> Result<(), ModelkitError>;
}

/// A session store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    values: DashMap<String, Value>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).map(|entry| entry.value().clone())
    }

    /// Returns true if `key` holds a value.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Removes `key`, returning its value.
    pub fn forget(&self, key: &str) -> Option<Value> {
        self.values.remove(key).map(|(_, value)| value)
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn put(&self, key: &str, value: Value) -> Result<(), ModelkitError> {
        tracing::trace!(key = %key, "Session put");
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_get_forget() {
        let store = InMemorySessionStore::new();
        assert!(store.is_empty());

        store.put("cart", json!({"items": 2})).unwrap();
        store.put("cart", json!({"items": 3})).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.has("cart"));
        assert_eq!(store.get("cart"), Some(json!({"items": 3})));
        assert_eq!(store.forget("cart"), Some(json!({"items": 3})));
        assert!(!store.has("cart"));
    }
}

//! Capability for types that save themselves into a session.

use super::store::SessionStore;
use crate::errors::{ModelkitError, SessionKeyError};
use serde_json::Value;
use std::fmt;

/// Lets a value serialize itself into a [`SessionStore`].
///
/// The stored value is the first representation the type provides, in this
/// order:
///
/// 1. [`to_json`](SavesToSession::to_json), stored as is;
/// 2. [`json_serialize`](SavesToSession::json_serialize), encoded to a JSON string;
/// 3. [`to_html`](SavesToSession::to_html);
/// 4. [`to_display_string`](SavesToSession::to_display_string);
/// 5. the `Debug` rendering.
///
/// Types with bespoke needs override [`to_session`](SavesToSession::to_session).
pub trait SavesToSession: fmt::Debug {
    /// Key used when `save_to_session` is called without one.
    fn default_session_key(&self) -> Option<String> {
        None
    }

    /// JSON text for this value.
    fn to_json(&self) -> Option<String> {
        None
    }

    /// JSON value for this value.
    fn json_serialize(&self) -> Option<Value> {
        None
    }

    /// HTML for this value.
    fn to_html(&self) -> Option<String> {
        None
    }

    /// Plain string for this value, usually its `Display` output.
    fn to_display_string(&self) -> Option<String> {
        None
    }

    /// Builds the value written to the session.
    fn to_session(&self) -> Result<Value, ModelkitError> {
        if let Some(json) = self.to_json() {
            return Ok(Value::String(json));
        }
        if let Some(value) = self.json_serialize() {
            return Ok(Value::String(serde_json::to_string(&value)?));
        }
        if let Some(html) = self.to_html() {
            return Ok(Value::String(html));
        }
        if let Some(text) = self.to_display_string() {
            return Ok(Value::String(text));
        }
        Ok(Value::String(format!("{self:?}")))
    }

    /// Writes this value into `store`.
    ///
    /// The key is `key` if given, otherwise the default session key. With
    /// neither, a [`SessionKeyError`] is returned and the store is untouched.
    fn save_to_session(&self, store: &dyn SessionStore, key: Option<&str>) -> Result<(), ModelkitError> {
        let key = match key {
            Some(key) => key.to_string(),
            None => self
                .default_session_key()
                .ok_or_else(SessionKeyError::for_type::<Self>)?,
        };

        let value = self.to_session()?;
        tracing::debug!(key = %key, "Saving to session");
        store.put(&key, value)
    }
}

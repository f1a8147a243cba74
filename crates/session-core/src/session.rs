//! Per-request session handle

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::payload::SessionPayload;

/// Mutable session mapping shared between the middleware and the handler.
///
/// Clones point at the same mapping. An empty mapping at the end of the
/// request means there is nothing to persist.
#[derive(Clone, Default)]
pub struct Session {
    inner: Arc<Mutex<SessionPayload>>,
}

impl Session {
    pub fn new(payload: SessionPayload) -> Self {
        Self {
            inner: Arc::new(Mutex::new(payload)),
        }
    }

    /// Typed read. `None` when the key is missing or does not deserialize as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.inner.lock().get(key).cloned()?;
        serde_json::from_value(value).ok()
    }

    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.inner.lock().get(key).cloned()
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn insert<T: Serialize>(
        &self,
        key: impl Into<String>,
        value: T,
    ) -> Result<Option<Value>, serde_json::Error> {
        let value = serde_json::to_value(value)?;
        Ok(self.inner.lock().insert(key.into(), value))
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.lock().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.lock().contains_key(key)
    }

    /// Merge `entries` into the session, overwriting existing keys.
    pub fn extend(&self, entries: SessionPayload) {
        self.inner.lock().extend(entries);
    }

    /// Drop every key. Ends the session once the response goes out.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn snapshot(&self) -> SessionPayload {
        self.inner.lock().clone()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("keys", &self.inner.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Cart {
        items: Vec<String>,
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::default();
        let handler_view = session.clone();

        handler_view.insert("user_id", 42).unwrap();
        assert_eq!(session.get::<i64>("user_id"), Some(42));
        assert!(!session.is_empty());

        handler_view.clear();
        assert!(session.is_empty());
    }

    #[test]
    fn test_typed_access() {
        let session = Session::default();
        let cart = Cart {
            items: vec!["apple".into(), "pear".into()],
        };
        assert_eq!(session.insert("cart", &cart).unwrap(), None);

        assert_eq!(session.get::<Cart>("cart"), Some(cart));
        assert_eq!(session.get::<i64>("cart"), None);
        assert_eq!(session.get::<i64>("missing"), None);
    }

    #[test]
    fn test_insert_remove_extend() {
        let session = Session::new(json!({ "a": 1 }).as_object().unwrap().clone());
        assert_eq!(session.insert("a", 2).unwrap(), Some(json!(1)));
        assert_eq!(session.remove("a"), Some(json!(2)));
        assert!(!session.contains_key("a"));

        session.extend(json!({ "b": true, "c": [1, 2] }).as_object().unwrap().clone());
        assert_eq!(session.len(), 2);
        assert_eq!(session.get_value("c"), Some(json!([1, 2])));
        assert_eq!(session.snapshot().len(), 2);
    }
}

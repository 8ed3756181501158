//! Client-scoped key/value storage.
//!
//! The storefront keeps a visitor's cart, wishlist, chat session and theme in
//! a small string-keyed store that mirrors browser local storage. Stores in
//! this crate never touch it directly through globals: they take a
//! [`Storage`] implementation when opened, hydrate from it once, and write a
//! JSON snapshot back after each mutation.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage keys shared with the client.
pub mod keys {
    /// JSON array of cart line items.
    pub const CART: &str = "cart";

    /// JSON array of wishlist items.
    pub const WISHLIST: &str = "wishlist";

    /// Opaque chat conversation id.
    pub const CHAT_SESSION_ID: &str = "chat_session_id";

    /// `"light"` or `"dark"`.
    pub const THEME: &str = "theme";

    /// Every key the storefront reads or writes.
    pub const ALL: [&str; 4] = [CART, WISHLIST, CHAT_SESSION_ID, THEME];
}

/// A string key/value store with local-storage semantics.
///
/// Writes are infallible from the caller's point of view; an implementation
/// that can fail is expected to log and carry on, the way a browser drops a
/// write when its quota is exhausted.
pub trait Storage {
    /// Read a value, `None` when the key has never been written.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write or overwrite a value.
    fn set_item(&mut self, key: &str, value: String);

    /// Delete a value. Deleting a missing key is a no-op.
    fn remove_item(&mut self, key: &str);
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) {
        (**self).set_item(key, value);
    }

    fn remove_item(&mut self, key: &str) {
        (**self).remove_item(key);
    }
}

/// In-process [`Storage`] backed by a `HashMap`.
///
/// Tracks which keys were written or removed since construction so a caller
/// staging values from elsewhere can write back only what changed.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    dirty: Vec<String>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed storage with existing values without marking them dirty.
    #[must_use]
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            dirty: Vec::new(),
        }
    }

    /// Keys written or removed since construction, in first-touch order.
    #[must_use]
    pub fn dirty_keys(&self) -> &[String] {
        &self.dirty
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn touch(&mut self, key: &str) {
        if !self.dirty.iter().any(|k| k == key) {
            self.dirty.push(key.to_owned());
        }
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.touch(key);
        self.values.insert(key.to_owned(), value);
    }

    fn remove_item(&mut self, key: &str) {
        self.touch(key);
        self.values.remove(key);
    }
}

/// Read and decode a JSON value.
///
/// Missing keys yield `None` silently. Undecodable values are logged and
/// also yield `None`, so callers fall back to their empty state.
pub fn load_json<T: DeserializeOwned>(storage: &impl Storage, key: &str) -> Option<T> {
    let raw = storage.get_item(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unreadable stored value");
            None
        }
    }
}

/// Encode a value as JSON and write it.
pub fn save_json<T: Serialize + ?Sized>(storage: &mut impl Storage, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => storage.set_item(key, raw),
        Err(e) => tracing::error!(key, error = %e, "Failed to encode value for storage"),
    }
}

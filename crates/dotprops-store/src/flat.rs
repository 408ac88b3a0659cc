//! The in-memory flat store: an insertion-ordered `key -> value` map.
//!
//! The store knows nothing about types or groups. Grouping happens only when
//! the codec renders the store to text.

use indexmap::IndexMap;

use crate::key::SEPARATOR;

/// Insertion-ordered mapping from dotted keys to string values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlatStore {
    entries: IndexMap<String, String>,
}

impl FlatStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. Returns the previous value, if any.
    ///
    /// Replacing keeps the key at its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    /// Remove a key, returning its position and value.
    pub fn remove_full(&mut self, key: &str) -> Option<(usize, String)> {
        self.entries
            .shift_remove_full(key)
            .map(|(index, _, value)| (index, value))
    }

    /// Insert a key at `index`, shifting later entries back.
    pub fn insert_at(&mut self, index: usize, key: impl Into<String>, value: impl Into<String>) {
        self.entries.shift_insert(index, key.into(), value.into());
    }

    /// Whether `prefix` itself or any key beneath `prefix.` is present.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.entries.keys().any(|k| is_under(k, prefix))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlatStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (k, v) in iter {
            store.insert(k, v);
        }
        store
    }
}

fn is_under(key: &str, prefix: &str) -> bool {
    match key.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with(SEPARATOR),
        None => false,
    }
}

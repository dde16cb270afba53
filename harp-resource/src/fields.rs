//! Case-insensitive property bag

use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    /// Key spelling from the first insertion.
    name: String,
    value: Value,
}

/// Mapping from property name to value with case-insensitive keys.
///
/// Keys are unique up to Unicode lowercase folding. Writing to an existing
/// key replaces the value but keeps the spelling of the first insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: HashMap<String, Entry>,
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

impl Fields {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property value. Last write wins; the key spelling of the
    /// first insertion is retained.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.get_mut(&fold(&name)) {
            Some(entry) => entry.value = value,
            None => {
                self.entries.insert(fold(&name), Entry { name, value });
            }
        }
    }

    /// Look up a property value by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(&fold(name)).map(|e| &e.value)
    }

    /// Whether a property with this name exists, ignoring case
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&fold(name))
    }

    /// Remove a property by name, returning its value if present
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(&fold(name)).map(|e| e.value)
    }

    /// Property names as first inserted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.name.as_str())
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.values().map(|e| (e.name.as_str(), &e.value))
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

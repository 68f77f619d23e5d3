use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form relationship metadata
///
/// Serialised as a plain JSON object. Keys are kept sorted so exports are
/// byte-stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Metadata {
    data: BTreeMap<String, serde_json::Value>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<BTreeMap<String, serde_json::Value>> for Metadata {
    fn from(data: BTreeMap<String, serde_json::Value>) -> Self {
        Self { data }
    }
}

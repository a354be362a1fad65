//! In-memory key-value store
//!
//! Backed by a [`DashMap`]. Every instance is independent, so tests get
//! isolation by constructing a fresh store.

use async_trait::async_trait;
use dashmap::DashMap;

use tredgate_core::ports::IKeyValueStore;

/// Process-local implementation of the key-value port
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: DashMap<String, String>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value under `key`, bypassing the async port
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|v| v.value().clone())
    }

    /// Stores a raw value, bypassing the async port
    ///
    /// Useful for seeding fixtures, including deliberately corrupted ones.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

#[async_trait]
impl IKeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

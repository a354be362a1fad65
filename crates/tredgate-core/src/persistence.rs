//! Whole-collection JSON persistence over a single key
//!
//! Both stores keep their records as one JSON array under one key and
//! rewrite the full array on every mutation. [`JsonCollection`] is the shared
//! read/write helper for that layout.
//!
//! A missing key and a value that does not parse are both read as an empty
//! collection. Parse failures are logged at `warn` and never surfaced.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::ports::IKeyValueStore;

/// Storage key of the loan collection
pub const LOANS_KEY: &str = "tredgate_loans";

/// Storage key of the audit log collection
pub const AUDIT_LOGS_KEY: &str = "tredgate_audit_logs";

/// A typed JSON array stored under one key of an [`IKeyValueStore`]
pub struct JsonCollection<T> {
    store: Arc<dyn IKeyValueStore>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a collection stored under `key`
    pub fn new(store: Arc<dyn IKeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    /// Returns the storage key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the full collection
    ///
    /// # Errors
    ///
    /// Only errors from the underlying store are returned. Absent or
    /// unparseable data yields an empty vector.
    pub async fn load(&self) -> anyhow::Result<Vec<T>> {
        let Some(raw) = self.store.get(&self.key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => {
                tracing::debug!(key = %self.key, count = items.len(), "Loaded collection");
                Ok(items)
            }
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "Stored collection is not valid JSON, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Replaces the stored collection with `items`
    pub async fn save(&self, items: &[T]) -> anyhow::Result<()> {
        let raw = serde_json::to_string(items)?;
        self.store.set(&self.key, raw).await?;
        tracing::debug!(key = %self.key, count = items.len(), "Saved collection");
        Ok(())
    }

    /// Removes the stored collection
    pub async fn clear(&self) -> anyhow::Result<()> {
        self.store.remove(&self.key).await?;
        tracing::debug!(key = %self.key, "Cleared collection");
        Ok(())
    }
}

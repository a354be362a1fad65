//! Key-value store port (driven/secondary port)
//!
//! The persistence substrate under both stores: a flat map from string keys
//! to string values. Collections are stored whole, one JSON document per key.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific
//!   (SQLite, in-memory) and don't need domain-level classification.
//! - Values are opaque strings; parsing them is the caller's business, so a
//!   corrupted value is never an adapter error.

/// Port trait for string key-value persistence
///
/// ## Implementation Notes
///
/// - `set` replaces any existing value for the key.
/// - `remove` on a missing key is not an error.
/// - Each call must be atomic on its own; callers that read-modify-write
///   provide their own serialization.
#[async_trait::async_trait]
pub trait IKeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Stores `value` under `key`
    async fn set(&self, key: &str, value: String) -> anyhow::Result<()>;

    /// Removes `key` and its value
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

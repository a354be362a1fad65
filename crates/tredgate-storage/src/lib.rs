//! Tredgate Storage - Key-value persistence adapters
//!
//! Implementations of the `IKeyValueStore` port from `tredgate-core`:
//! - [`InMemoryKeyValueStore`] - process-local map, used by tests and the
//!   `memory` backend
//! - [`SqliteKeyValueStore`] - SQLite table `kv_store`, one row per key
//!
//! ## Architecture
//!
//! This crate is a driven (secondary) adapter in the hexagonal architecture.
//! The stores in `tredgate-audit` and `tredgate-loans` only see the port.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use tredgate_core::ports::IKeyValueStore;
//! use tredgate_storage::{DatabasePool, SqliteKeyValueStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = DatabasePool::new(Path::new("/home/user/.local/share/tredgate/tredgate.db")).await?;
//! let store: Arc<dyn IKeyValueStore> = Arc::new(SqliteKeyValueStore::new(pool.pool().clone()));
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod pool;
pub mod sqlite;

pub use memory::InMemoryKeyValueStore;
pub use pool::DatabasePool;
pub use sqlite::SqliteKeyValueStore;

/// Errors that can occur in the storage adapters
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::QueryFailed(e.to_string())
    }
}

//! SQLite implementation of IKeyValueStore
//!
//! One row per key in the `kv_store` table:
//!
//! | Column       | SQL Type | Content                           |
//! |--------------|----------|-----------------------------------|
//! | `key`        | TEXT     | Storage key, primary key          |
//! | `value`      | TEXT     | Opaque value (a JSON collection)  |
//! | `updated_at` | TEXT     | RFC 3339 time of the last write   |

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use tredgate_core::ports::IKeyValueStore;

use crate::StorageError;

/// SQLite-based implementation of the key-value port
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Creates a new store using the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists the stored keys in lexical order
    pub async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query("SELECT key FROM kv_store ORDER BY key ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("key").map_err(StorageError::from))
            .collect()
    }
}

#[async_trait]
impl IKeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        match row {
            Some(row) => Ok(Some(
                row.try_get::<String, _>("value")
                    .map_err(StorageError::from)?,
            )),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        let updated_at = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(&value)
        .bind(&updated_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        tracing::trace!(key = %key, bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        tracing::trace!(key = %key, "Removed value");
        Ok(())
    }
}

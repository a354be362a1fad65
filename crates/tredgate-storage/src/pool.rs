//! Database connection pool management
//!
//! Wraps SQLx's SqlitePool for the `kv_store` table:
//! - Parent directories of the database file are created on demand
//! - WAL journal mode, so the CLI can read while another process writes
//! - The schema is applied on every connect (idempotent)
//! - In-memory mode for tests

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::StorageError;

/// Manages a pool of SQLite connections for Tredgate persistence
///
/// The pool is configured with:
/// - WAL journal mode for concurrent read access
/// - 5 max connections for file-based databases
/// - 1 connection for in-memory databases (required for data persistence)
/// - 5-second busy timeout to handle write contention
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Creates a new database pool connected to the specified file
    ///
    /// This will:
    /// 1. Create parent directories if they don't exist
    /// 2. Create the database file if it doesn't exist
    /// 3. Enable WAL journal mode
    /// 4. Create the `kv_store` table if needed
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConnectionFailed` if the connection cannot be established,
    /// or `StorageError::MigrationFailed` if schema migrations fail.
    pub async fn new(db_path: &Path) -> Result<Self, StorageError> {
        // Create parent directory if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::ConnectionFailed(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                StorageError::ConnectionFailed(format!(
                    "Failed to connect to database at {}: {}",
                    db_path.display(),
                    e
                ))
            })?;

        Self::run_migrations(&pool).await?;

        tracing::info!(
            path = %db_path.display(),
            "Database pool initialized"
        );

        Ok(Self { pool })
    }

    /// Creates an in-memory database pool for testing
    ///
    /// Uses a single connection to ensure data persistence across queries
    /// (SQLite in-memory databases are per-connection).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConnectionFailed` if the connection cannot be established,
    /// or `StorageError::MigrationFailed` if schema migrations fail.
    pub async fn in_memory() -> Result<Self, StorageError> {
        // The database lives and dies with its only connection, so it must
        // never be reaped for idleness or age.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| {
                StorageError::ConnectionFailed(format!("Failed to create in-memory database: {}", e))
            })?;

        Self::run_migrations(&pool).await?;

        tracing::debug!("In-memory database pool initialized");

        Ok(Self { pool })
    }

    /// Returns a reference to the underlying SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every connection, waiting for in-flight queries to finish
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("Database pool closed");
    }

    /// Applies the schema
    async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
        let migration_sql = include_str!("migrations/20250101_initial.sql");
        sqlx::raw_sql(migration_sql)
            .execute(pool)
            .await
            .map_err(|e| {
                StorageError::MigrationFailed(format!("Failed to create kv_store table: {}", e))
            })?;

        tracing::debug!("Database migrations completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_creates_schema() {
        let pool = DatabasePool::in_memory().await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store")
            .fetch_one(pool.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_new_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("a").join("b").join("tredgate.db");

        let pool = DatabasePool::new(&db_path).await.unwrap();
        assert!(db_path.exists());
        pool.close().await;
    }

    #[tokio::test]
    async fn test_reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("tredgate.db");

        DatabasePool::new(&db_path).await.unwrap().close().await;
        let reopened = DatabasePool::new(&db_path).await;
        assert!(reopened.is_ok());
    }
}

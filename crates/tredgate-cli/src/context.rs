//! Wiring shared by the store-backed commands
//!
//! Resolves the configuration file, opens the configured key-value backend
//! and builds the audit log and loan stores on top of it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tredgate_audit::AuditLogStore;
use tredgate_core::{
    config::{Config, StorageBackend},
    domain::PaymentFormula,
    ports::IKeyValueStore,
};
use tredgate_loans::LoanStore;
use tredgate_storage::{DatabasePool, InMemoryKeyValueStore, SqliteKeyValueStore};

/// `--config` if given, otherwise the platform default location
pub fn resolve_config_path(explicit: Option<&str>) -> PathBuf {
    explicit
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path)
}

/// Loads the configuration at `path`
///
/// A missing default file means defaults; a missing explicit file, or a file
/// that does not parse, is an error.
pub fn load_config(path: &Path, explicit: bool) -> Result<Config> {
    if !path.exists() {
        if explicit {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }
        return Ok(Config::default());
    }

    Config::load(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Stores opened for a single command invocation
pub struct AppContext {
    pub loans: LoanStore,
    pub audit: Arc<AuditLogStore>,
    pub payment_formula: PaymentFormula,
    pool: Option<DatabasePool>,
}

impl AppContext {
    /// Opens the backend named by `config.storage`
    pub async fn open(config: &Config) -> Result<Self> {
        match config.storage.backend {
            StorageBackend::Sqlite => {
                let db_path = &config.storage.database_path;
                let pool = DatabasePool::new(db_path)
                    .await
                    .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
                let store = Arc::new(SqliteKeyValueStore::new(pool.pool().clone()));
                let mut ctx = Self::with_store(store, config);
                ctx.pool = Some(pool);
                Ok(ctx)
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; nothing is kept after this command");
                Ok(Self::with_store(
                    Arc::new(InMemoryKeyValueStore::new()),
                    config,
                ))
            }
        }
    }

    /// Builds the stores over an already opened backend
    pub fn with_store(store: Arc<dyn IKeyValueStore>, config: &Config) -> Self {
        let audit = Arc::new(AuditLogStore::new(Arc::clone(&store)));
        let loans =
            LoanStore::new(store, Arc::clone(&audit)).with_decision_rule(config.decision_rule());
        Self {
            loans,
            audit,
            payment_formula: config.payment.formula,
            pool: None,
        }
    }

    /// Flushes and closes the database, if any
    pub async fn close(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
        }
    }
}

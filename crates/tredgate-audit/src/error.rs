//! Error types for the audit log store

use thiserror::Error;

/// Errors that can occur while reading or writing the audit log
///
/// A corrupted collection is not an error; it reads as empty.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The key-value backend failed
    #[error("audit storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

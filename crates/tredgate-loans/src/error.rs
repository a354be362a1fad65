//! Error types for the loan store

use thiserror::Error;
use tredgate_audit::AuditError;
use tredgate_core::domain::DomainError;

/// Errors that can occur in loan store operations
#[derive(Debug, Error)]
pub enum LoanStoreError {
    /// The application input was rejected; nothing was written
    #[error("{0}")]
    Validation(#[from] DomainError),

    /// The key-value backend failed while reading or writing loans
    #[error("loan storage error: {0}")]
    Storage(#[from] anyhow::Error),

    /// The audit entry for an operation could not be recorded
    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl LoanStoreError {
    /// Returns the validation failure, if this is one
    pub fn as_validation(&self) -> Option<&DomainError> {
        match self {
            LoanStoreError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

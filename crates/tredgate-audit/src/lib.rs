//! Tredgate Audit - Append-only audit trail for loan operations
//!
//! Provides:
//! - `AuditLogStore`: owns the audit collection stored under
//!   `tredgate_audit_logs`; append, list, per-loan queries and reset
//! - `AuditError`: error type for store operations
//!
//! The store keeps `loanId` as an opaque reference and never reads loans.

pub mod error;
pub mod store;

pub use error::AuditError;
pub use store::AuditLogStore;

//! Tredgate Loans - Loan application store
//!
//! Provides:
//! - `LoanStore`: owns the loan collection stored under `tredgate_loans`,
//!   creates applications, applies manual and automatic decisions, and
//!   records every change in the `AuditLogStore` it was given
//! - `LoanStoreError`: validation, storage and audit failures
//!
//! ## Lifecycle
//!
//! ```text
//! create ──► pending ──update_status / auto_decide──► approved | rejected
//! ```
//!
//! Updating or deciding an unknown loan is a silent no-op, and decided loans
//! may be decided again; neither is rejected by the store.

pub mod error;
pub mod store;

pub use error::LoanStoreError;
pub use store::LoanStore;

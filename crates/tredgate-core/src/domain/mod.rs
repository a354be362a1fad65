//! Domain entities and business logic
//!
//! This module contains the core domain types for Tredgate:
//! - Newtypes for type-safe identifiers and validated applicant names
//! - Loan applications and their status lifecycle
//! - Audit entries for tracking loan operations
//! - The auto-decision rule and monthly payment formula
//! - Portfolio summary figures
//! - Domain-specific error types

pub mod audit;
pub mod decision;
pub mod errors;
pub mod loan;
pub mod newtypes;
pub mod payment;
pub mod summary;

// Re-export commonly used types
pub use audit::{AuditAction, AuditEntry, AuditEvent, NewAuditEntry};
pub use decision::{should_auto_approve, DecisionRule};
pub use errors::DomainError;
pub use loan::{LoanApplication, LoanStatus, NewLoanApplication};
pub use newtypes::*;
pub use payment::{calculate_monthly_payment, PaymentFormula};
pub use summary::LoanSummary;

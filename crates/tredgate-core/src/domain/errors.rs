//! Domain error types
//!
//! This module defines error types specific to domain operations:
//! loan application validation failures and identifier parsing errors.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Applicant name is empty or whitespace-only
    #[error("Applicant name is required")]
    MissingApplicantName,

    /// Amount is zero, negative, or not a finite number
    #[error("Amount must be greater than 0")]
    InvalidAmount,

    /// Term is zero or negative
    #[error("Term must be greater than 0")]
    InvalidTerm,

    /// Interest rate was not supplied
    #[error("Interest rate is required")]
    MissingInterestRate,

    /// Interest rate is negative or not a finite number
    #[error("Interest rate must be 0 or greater")]
    InvalidInterestRate,

    /// Unknown loan status name
    #[error("Invalid loan status: {0}")]
    InvalidStatus(String),

    /// Unknown audit action name
    #[error("Invalid audit action: {0}")]
    InvalidAction(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}

impl DomainError {
    /// Returns true for errors raised while validating a new loan application
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::MissingApplicantName
                | DomainError::InvalidAmount
                | DomainError::InvalidTerm
                | DomainError::MissingInterestRate
                | DomainError::InvalidInterestRate
        )
    }
}

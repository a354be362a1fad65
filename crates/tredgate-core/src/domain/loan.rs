//! Loan application domain entities
//!
//! A loan application moves through a small lifecycle:
//!
//! ```text
//! (created) ──► Pending ──► Approved
//!                  │
//!                  └──────► Rejected
//! ```
//!
//! Only `Pending → Approved` and `Pending → Rejected` are modeled as business
//! transitions. [`LoanApplication::set_status`] does not refuse other
//! transitions; callers that care can consult [`LoanStatus::can_transition_to`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decision::DecisionRule;
use super::errors::DomainError;
use super::newtypes::{ApplicantName, LoanId};
use super::payment::{calculate_monthly_payment, PaymentFormula};

/// Status of a loan application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Awaiting a decision
    Pending,
    /// Approved, manually or by the decision rule
    Approved,
    /// Rejected, manually or by the decision rule
    Rejected,
}

impl LoanStatus {
    /// All statuses in display order
    pub const ALL: [LoanStatus; 3] = [
        LoanStatus::Pending,
        LoanStatus::Approved,
        LoanStatus::Rejected,
    ];

    /// Returns the stable lowercase name used in storage and output
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
        }
    }

    /// Returns true for `Approved` and `Rejected`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoanStatus::Pending)
    }

    /// Returns true if `self → target` is one of the modeled transitions
    pub fn can_transition_to(&self, target: LoanStatus) -> bool {
        matches!(
            (self, target),
            (LoanStatus::Pending, LoanStatus::Approved) | (LoanStatus::Pending, LoanStatus::Rejected)
        )
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(LoanStatus::Pending),
            "approved" => Ok(LoanStatus::Approved),
            "rejected" => Ok(LoanStatus::Rejected),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

/// Unvalidated input for creating a loan application
///
/// Mirrors what an application form submits. `interest_rate` is optional so
/// that a missing rate can be reported separately from a negative one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoanApplication {
    pub applicant_name: String,
    pub amount: f64,
    pub term_months: i64,
    pub interest_rate: Option<f64>,
}

impl NewLoanApplication {
    /// Creates an input with every field supplied
    pub fn new(
        applicant_name: impl Into<String>,
        amount: f64,
        term_months: i64,
        interest_rate: f64,
    ) -> Self {
        Self {
            applicant_name: applicant_name.into(),
            amount,
            term_months,
            interest_rate: Some(interest_rate),
        }
    }

    /// Checks every field and returns the first failure
    ///
    /// Fields are checked in form order: name, amount, term, interest rate.
    pub fn validate(&self) -> Result<(), DomainError> {
        ApplicantName::new(&self.applicant_name)?;

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(DomainError::InvalidAmount);
        }

        if self.term_months <= 0 || self.term_months > i64::from(u32::MAX) {
            return Err(DomainError::InvalidTerm);
        }

        match self.interest_rate {
            None => Err(DomainError::MissingInterestRate),
            Some(rate) if !rate.is_finite() || rate < 0.0 => Err(DomainError::InvalidInterestRate),
            Some(_) => Ok(()),
        }
    }
}

/// A loan application record
///
/// Serialized with camelCase keys (`applicantName`, `termMonths`, ...) as
/// stored under the `tredgate_loans` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    id: LoanId,
    applicant_name: ApplicantName,
    amount: f64,
    term_months: u32,
    interest_rate: f64,
    status: LoanStatus,
    created_at: DateTime<Utc>,
}

impl LoanApplication {
    /// Validates the input and creates a new pending application
    ///
    /// A fresh [`LoanId`] and the current time are assigned.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure of [`NewLoanApplication::validate`].
    ///
    /// # Example
    ///
    /// ```
    /// use tredgate_core::domain::{LoanApplication, LoanStatus, NewLoanApplication};
    ///
    /// let loan = LoanApplication::new(NewLoanApplication::new(" Alice ", 25000.0, 12, 0.05)).unwrap();
    /// assert_eq!(loan.applicant_name().as_str(), "Alice");
    /// assert_eq!(loan.status(), LoanStatus::Pending);
    /// ```
    pub fn new(input: NewLoanApplication) -> Result<Self, DomainError> {
        input.validate()?;

        let applicant_name = ApplicantName::new(&input.applicant_name)?;
        let term_months =
            u32::try_from(input.term_months).map_err(|_| DomainError::InvalidTerm)?;
        let interest_rate = input
            .interest_rate
            .ok_or(DomainError::MissingInterestRate)?;

        Ok(Self {
            id: LoanId::new(),
            applicant_name,
            amount: input.amount,
            term_months,
            interest_rate,
            status: LoanStatus::Pending,
            created_at: Utc::now(),
        })
    }

    /// Returns the loan ID
    pub fn id(&self) -> &LoanId {
        &self.id
    }

    /// Returns the applicant name
    pub fn applicant_name(&self) -> &ApplicantName {
        &self.applicant_name
    }

    /// Returns the requested amount
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Returns the term in months
    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    /// Returns the annual interest rate as a fraction
    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    /// Returns the current status
    pub fn status(&self) -> LoanStatus {
        self.status
    }

    /// Returns when the application was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sets the status and returns the previous one
    pub fn set_status(&mut self, status: LoanStatus) -> LoanStatus {
        std::mem::replace(&mut self.status, status)
    }

    /// Outcome of `rule` for this loan's amount and term
    pub fn decide(&self, rule: &DecisionRule) -> LoanStatus {
        rule.decide(self.amount, self.term_months)
    }

    /// Amortized monthly payment for this loan
    pub fn monthly_payment(&self) -> f64 {
        calculate_monthly_payment(self.amount, self.term_months, self.interest_rate)
    }

    /// Monthly payment for this loan using the given formula
    pub fn monthly_payment_with(&self, formula: PaymentFormula) -> f64 {
        formula.monthly_payment(self.amount, self.term_months, self.interest_rate)
    }
}

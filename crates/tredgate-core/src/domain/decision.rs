//! Auto-decision rule
//!
//! A loan is auto-approved when both its amount and its term are within the
//! rule's limits. Both limits are inclusive.

use serde::{Deserialize, Serialize};

use super::loan::LoanStatus;

/// Largest amount approved by the default rule
pub const DEFAULT_MAX_AUTO_APPROVE_AMOUNT: f64 = 100_000.0;

/// Longest term (in months) approved by the default rule
pub const DEFAULT_MAX_AUTO_APPROVE_TERM_MONTHS: u32 = 60;

/// Thresholds for automatic approval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionRule {
    /// Maximum amount that is still approved
    pub max_amount: f64,
    /// Maximum term in months that is still approved
    pub max_term_months: u32,
}

impl Default for DecisionRule {
    fn default() -> Self {
        Self {
            max_amount: DEFAULT_MAX_AUTO_APPROVE_AMOUNT,
            max_term_months: DEFAULT_MAX_AUTO_APPROVE_TERM_MONTHS,
        }
    }
}

impl DecisionRule {
    /// Creates a rule with custom thresholds
    pub fn new(max_amount: f64, max_term_months: u32) -> Self {
        Self {
            max_amount,
            max_term_months,
        }
    }

    /// Returns true iff `amount <= max_amount` and `term_months <= max_term_months`
    pub fn should_auto_approve(&self, amount: f64, term_months: u32) -> bool {
        amount <= self.max_amount && term_months <= self.max_term_months
    }

    /// Maps the approval outcome to `Approved` or `Rejected`
    pub fn decide(&self, amount: f64, term_months: u32) -> LoanStatus {
        if self.should_auto_approve(amount, term_months) {
            LoanStatus::Approved
        } else {
            LoanStatus::Rejected
        }
    }

    /// Short explanation of a decision, recorded in audit details
    pub fn explain(&self, amount: f64, term_months: u32) -> String {
        if self.should_auto_approve(amount, term_months) {
            format!(
                "Auto-approved: amount {amount} <= {} and term {term_months} <= {} months",
                self.max_amount, self.max_term_months
            )
        } else if amount > self.max_amount {
            format!(
                "Auto-rejected: amount {amount} exceeds {}",
                self.max_amount
            )
        } else {
            format!(
                "Auto-rejected: term {term_months} months exceeds {} months",
                self.max_term_months
            )
        }
    }
}

/// Decision rule with the default thresholds (100000, 60 months)
pub fn should_auto_approve(amount: f64, term_months: u32) -> bool {
    DecisionRule::default().should_auto_approve(amount, term_months)
}

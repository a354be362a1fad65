//! Portfolio summary figures

use serde::{Deserialize, Serialize};

use super::loan::{LoanApplication, LoanStatus};

/// Counts and totals over a set of loan applications
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Sum of all requested amounts
    pub total_amount: f64,
    /// Sum of approved amounts
    pub approved_amount: f64,
}

impl LoanSummary {
    /// Builds a summary from a slice of loans
    pub fn from_loans(loans: &[LoanApplication]) -> Self {
        loans.iter().fold(Self::default(), |mut summary, loan| {
            summary.total += 1;
            summary.total_amount += loan.amount();
            match loan.status() {
                LoanStatus::Pending => summary.pending += 1,
                LoanStatus::Approved => {
                    summary.approved += 1;
                    summary.approved_amount += loan.amount();
                }
                LoanStatus::Rejected => summary.rejected += 1,
            }
            summary
        })
    }

    /// Share of decided loans that were approved, `None` if nothing is decided
    pub fn approval_rate(&self) -> Option<f64> {
        let decided = self.approved + self.rejected;
        if decided == 0 {
            None
        } else {
            Some(self.approved as f64 / decided as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewLoanApplication;

    fn loan(amount: f64, status: LoanStatus) -> LoanApplication {
        let mut loan =
            LoanApplication::new(NewLoanApplication::new("Test", amount, 12, 0.05)).unwrap();
        loan.set_status(status);
        loan
    }

    #[test]
    fn test_empty_summary() {
        let summary = LoanSummary::from_loans(&[]);
        assert_eq!(summary, LoanSummary::default());
        assert_eq!(summary.approval_rate(), None);
    }

    #[test]
    fn test_counts_and_totals() {
        let loans = vec![
            loan(1000.0, LoanStatus::Pending),
            loan(2000.0, LoanStatus::Approved),
            loan(3000.0, LoanStatus::Approved),
            loan(4000.0, LoanStatus::Rejected),
        ];
        let summary = LoanSummary::from_loans(&loans);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.approved, 2);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.total_amount, 10_000.0);
        assert_eq!(summary.approved_amount, 5000.0);
        assert_eq!(summary.approval_rate(), Some(2.0 / 3.0));
    }
}

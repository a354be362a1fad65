//! Loan store
//!
//! Owns the loan collection and drives the audit log. Every mutation reads
//! the whole collection, changes it, and writes it back under a per-store
//! async mutex. The matching audit entry is appended afterwards; if that
//! append fails the previous collection is written back, so an operation
//! either lands together with its audit entry or not at all.

use std::sync::Arc;

use tokio::sync::Mutex;
use tredgate_audit::AuditLogStore;
use tredgate_core::{
    domain::{
        calculate_monthly_payment, DecisionRule, LoanApplication, LoanId, LoanStatus,
        LoanSummary, NewLoanApplication,
    },
    persistence::{JsonCollection, LOANS_KEY},
    ports::IKeyValueStore,
};

use crate::LoanStoreError;

/// How a status change came about; selects the audit action
enum StatusChange {
    Manual,
    Auto { reason: String },
}

/// Owner of the loan application collection
pub struct LoanStore {
    loans: JsonCollection<LoanApplication>,
    audit: Arc<AuditLogStore>,
    rule: DecisionRule,
    write_lock: Mutex<()>,
}

impl LoanStore {
    /// Creates a store backed by `store` under the `tredgate_loans` key,
    /// logging to `audit` and deciding with the default rule
    pub fn new(store: Arc<dyn IKeyValueStore>, audit: Arc<AuditLogStore>) -> Self {
        Self {
            loans: JsonCollection::new(store, LOANS_KEY),
            audit,
            rule: DecisionRule::default(),
            write_lock: Mutex::new(()),
        }
    }

    /// Replaces the decision rule used by [`LoanStore::auto_decide`]
    pub fn with_decision_rule(mut self, rule: DecisionRule) -> Self {
        self.rule = rule;
        self
    }

    /// The rule applied by [`LoanStore::auto_decide`]
    pub fn decision_rule(&self) -> &DecisionRule {
        &self.rule
    }

    /// The audit log this store writes to
    pub fn audit(&self) -> &Arc<AuditLogStore> {
        &self.audit
    }

    /// All loans in persistence order
    ///
    /// Missing or unparseable data yields an empty list.
    pub async fn list(&self) -> Result<Vec<LoanApplication>, LoanStoreError> {
        Ok(self.loans.load().await?)
    }

    /// Loans currently in `status`, in persistence order
    pub async fn list_by_status(
        &self,
        status: LoanStatus,
    ) -> Result<Vec<LoanApplication>, LoanStoreError> {
        let mut loans = self.list().await?;
        loans.retain(|loan| loan.status() == status);
        Ok(loans)
    }

    /// Looks up a single loan
    pub async fn get(&self, loan_id: &LoanId) -> Result<Option<LoanApplication>, LoanStoreError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|loan| loan.id() == loan_id))
    }

    /// Validates `input` and stores a new pending application
    ///
    /// A `loan_created` audit entry is appended for the new loan.
    ///
    /// # Errors
    ///
    /// - [`LoanStoreError::Validation`] if a field is invalid; nothing is
    ///   written and nothing is logged.
    /// - [`LoanStoreError::Storage`] / [`LoanStoreError::Audit`] if the
    ///   backend fails; the loan collection is left as it was.
    pub async fn create(
        &self,
        input: NewLoanApplication,
    ) -> Result<LoanApplication, LoanStoreError> {
        let loan = LoanApplication::new(input)?;

        let _guard = self.write_lock.lock().await;
        let previous = self.loans.load().await?;
        let mut loans = previous.clone();
        loans.push(loan.clone());
        self.loans.save(&loans).await?;

        if let Err(e) = self
            .audit
            .log_loan_created(*loan.id(), loan.applicant_name().as_str())
            .await
        {
            self.restore(&previous).await;
            return Err(e.into());
        }

        tracing::info!(
            loan_id = %loan.id(),
            amount = loan.amount(),
            term_months = loan.term_months(),
            "Loan application created"
        );
        Ok(loan)
    }

    /// Sets the status of a loan and records a `status_changed` entry
    ///
    /// Returns the updated loan, or `None` without writing anything if no
    /// loan has `loan_id`. The transition itself is not checked: a decided
    /// loan can be decided again.
    pub async fn update_status(
        &self,
        loan_id: &LoanId,
        new_status: LoanStatus,
    ) -> Result<Option<LoanApplication>, LoanStoreError> {
        self.change_status(loan_id, |_| (new_status, StatusChange::Manual))
            .await
    }

    /// Applies the decision rule to a loan and records an `auto_decided` entry
    ///
    /// Returns the updated loan, or `None` without writing anything if no
    /// loan has `loan_id`.
    pub async fn auto_decide(
        &self,
        loan_id: &LoanId,
    ) -> Result<Option<LoanApplication>, LoanStoreError> {
        let rule = self.rule;
        self.change_status(loan_id, |loan| {
            let status = loan.decide(&rule);
            let reason = rule.explain(loan.amount(), loan.term_months());
            (status, StatusChange::Auto { reason })
        })
        .await
    }

    /// Removes a loan; returns whether it existed
    ///
    /// Audit entries for the loan are kept and nothing new is logged.
    pub async fn delete(&self, loan_id: &LoanId) -> Result<bool, LoanStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut loans = self.loans.load().await?;
        let before = loans.len();
        loans.retain(|loan| loan.id() != loan_id);

        if loans.len() == before {
            return Ok(false);
        }

        self.loans.save(&loans).await?;
        tracing::info!(loan_id = %loan_id, "Loan application deleted");
        Ok(true)
    }

    /// Removes every loan. Meant for resets and tests.
    pub async fn clear(&self) -> Result<(), LoanStoreError> {
        let _guard = self.write_lock.lock().await;
        self.loans.clear().await?;
        tracing::info!("Loan applications cleared");
        Ok(())
    }

    /// Counts and totals over all loans
    pub async fn summary(&self) -> Result<LoanSummary, LoanStoreError> {
        Ok(LoanSummary::from_loans(&self.list().await?))
    }

    /// Amortized monthly payment; see [`calculate_monthly_payment`]
    pub fn calculate_monthly_payment(amount: f64, term_months: u32, interest_rate: f64) -> f64 {
        calculate_monthly_payment(amount, term_months, interest_rate)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn change_status<F>(
        &self,
        loan_id: &LoanId,
        decide: F,
    ) -> Result<Option<LoanApplication>, LoanStoreError>
    where
        F: FnOnce(&LoanApplication) -> (LoanStatus, StatusChange),
    {
        let _guard = self.write_lock.lock().await;
        let previous = self.loans.load().await?;
        let mut loans = previous.clone();

        let Some(loan) = loans.iter_mut().find(|loan| loan.id() == loan_id) else {
            tracing::debug!(loan_id = %loan_id, "Status change for unknown loan ignored");
            return Ok(None);
        };

        let (new_status, change) = decide(loan);
        let previous_status = loan.set_status(new_status);
        let updated = loan.clone();
        self.loans.save(&loans).await?;

        let logged = match &change {
            StatusChange::Manual => {
                self.audit
                    .log_status_changed(*loan_id, previous_status, new_status)
                    .await
            }
            StatusChange::Auto { reason } => {
                self.audit
                    .log_auto_decided(*loan_id, previous_status, new_status, reason)
                    .await
            }
        };
        if let Err(e) = logged {
            self.restore(&previous).await;
            return Err(e.into());
        }

        tracing::info!(
            loan_id = %loan_id,
            from = %previous_status,
            to = %new_status,
            automatic = matches!(change, StatusChange::Auto { .. }),
            "Loan status changed"
        );
        Ok(Some(updated))
    }

    /// Writes back a collection snapshot after a failed audit append
    async fn restore(&self, snapshot: &[LoanApplication]) {
        if let Err(e) = self.loans.save(snapshot).await {
            tracing::error!(error = %e, "Failed to restore loans after audit failure");
        }
    }
}

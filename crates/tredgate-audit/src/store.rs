//! AuditLogStore - append-only audit log service
//!
//! Entries are appended in call order and never rewritten. The whole log is
//! read and written back on every append; appends are serialized by an async
//! mutex so concurrent callers cannot lose each other's entries.

use std::sync::Arc;

use tokio::sync::Mutex;
use tredgate_core::{
    domain::{
        audit::{AuditAction, AuditEntry, NewAuditEntry},
        LoanId, LoanStatus,
    },
    persistence::{JsonCollection, AUDIT_LOGS_KEY},
    ports::IKeyValueStore,
};

use crate::AuditError;

/// Owner of the audit log collection
pub struct AuditLogStore {
    entries: JsonCollection<AuditEntry>,
    write_lock: Mutex<()>,
}

impl AuditLogStore {
    /// Creates a store backed by `store`, using the `tredgate_audit_logs` key
    pub fn new(store: Arc<dyn IKeyValueStore>) -> Self {
        Self {
            entries: JsonCollection::new(store, AUDIT_LOGS_KEY),
            write_lock: Mutex::new(()),
        }
    }

    /// All entries in insertion order
    ///
    /// Missing or unparseable data yields an empty list.
    pub async fn list(&self) -> Result<Vec<AuditEntry>, AuditError> {
        Ok(self.entries.load().await?)
    }

    /// Assigns an ID and timestamp to `input` and appends it to the log
    pub async fn append(&self, input: NewAuditEntry) -> Result<AuditEntry, AuditError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.entries.load().await?;
        let entry = AuditEntry::new(input);
        entries.push(entry.clone());
        self.entries.save(&entries).await?;

        tracing::debug!(
            entry_id = %entry.id(),
            loan_id = %entry.loan_id(),
            action = %entry.action(),
            "Appended audit entry"
        );
        Ok(entry)
    }

    /// Entries referring to `loan_id`, in insertion order
    pub async fn list_for_loan(&self, loan_id: &LoanId) -> Result<Vec<AuditEntry>, AuditError> {
        let mut entries = self.list().await?;
        entries.retain(|entry| entry.loan_id() == loan_id);
        Ok(entries)
    }

    /// Entries with the given action, in insertion order
    pub async fn list_by_action(&self, action: AuditAction) -> Result<Vec<AuditEntry>, AuditError> {
        let mut entries = self.list().await?;
        entries.retain(|entry| entry.action() == action);
        Ok(entries)
    }

    /// Removes every entry. Meant for resets and tests.
    pub async fn clear(&self) -> Result<(), AuditError> {
        let _guard = self.write_lock.lock().await;
        self.entries.clear().await?;
        tracing::info!("Audit log cleared");
        Ok(())
    }

    // ========================================================================
    // Loan lifecycle
    // ========================================================================

    /// Record creation of a loan in the pending state.
    pub async fn log_loan_created(
        &self,
        loan_id: LoanId,
        applicant_name: &str,
    ) -> Result<AuditEntry, AuditError> {
        let input = NewAuditEntry::loan_created(loan_id)
            .with_details(format!("Loan application created for {applicant_name}"));
        self.append(input).await
    }

    /// Record an explicit status change.
    pub async fn log_status_changed(
        &self,
        loan_id: LoanId,
        previous_status: LoanStatus,
        new_status: LoanStatus,
    ) -> Result<AuditEntry, AuditError> {
        let input = NewAuditEntry::status_changed(loan_id, previous_status, new_status)
            .with_details(format!(
                "Status changed from {previous_status} to {new_status}"
            ));
        self.append(input).await
    }

    /// Record a status change made by the decision rule.
    pub async fn log_auto_decided(
        &self,
        loan_id: LoanId,
        previous_status: LoanStatus,
        new_status: LoanStatus,
        reason: &str,
    ) -> Result<AuditEntry, AuditError> {
        let input =
            NewAuditEntry::auto_decided(loan_id, previous_status, new_status).with_details(reason);
        self.append(input).await
    }
}

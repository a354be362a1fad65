//! Integration tests for LoanStore + AuditLogStore
//!
//! Each test builds fresh stores over a fresh backend, so no state leaks
//! between tests.

use std::collections::HashSet;
use std::sync::Arc;

use tredgate_audit::AuditLogStore;
use tredgate_core::{
    domain::{AuditAction, DomainError, LoanApplication, LoanId, LoanStatus, NewLoanApplication},
    persistence::{AUDIT_LOGS_KEY, LOANS_KEY},
    ports::IKeyValueStore,
};
use tredgate_loans::{LoanStore, LoanStoreError};
use tredgate_storage::{DatabasePool, InMemoryKeyValueStore, SqliteKeyValueStore};

// ============================================================================
// Test helpers
// ============================================================================

struct Harness {
    backend: Arc<InMemoryKeyValueStore>,
    loans: LoanStore,
    audit: Arc<AuditLogStore>,
}

fn setup() -> Harness {
    let backend = Arc::new(InMemoryKeyValueStore::new());
    let kv: Arc<dyn IKeyValueStore> = Arc::clone(&backend) as Arc<dyn IKeyValueStore>;
    let audit = Arc::new(AuditLogStore::new(Arc::clone(&kv)));
    let loans = LoanStore::new(kv, Arc::clone(&audit));
    Harness {
        backend,
        loans,
        audit,
    }
}

async fn setup_sqlite() -> (Arc<dyn IKeyValueStore>, LoanStore) {
    let pool = DatabasePool::in_memory()
        .await
        .expect("Failed to create in-memory database");
    let kv: Arc<dyn IKeyValueStore> = Arc::new(SqliteKeyValueStore::new(pool.pool().clone()));
    let audit = Arc::new(AuditLogStore::new(Arc::clone(&kv)));
    (Arc::clone(&kv), LoanStore::new(kv, audit))
}

fn alice() -> NewLoanApplication {
    NewLoanApplication::new("Alice", 25000.0, 12, 0.05)
}

async fn create(store: &LoanStore, name: &str, amount: f64, term: i64) -> LoanApplication {
    store
        .create(NewLoanApplication::new(name, amount, term, 0.07))
        .await
        .expect("create loan")
}

// ============================================================================
// create
// ============================================================================

#[tokio::test]
async fn test_create_logs_exactly_one_loan_created_entry() {
    let h = setup();
    let loan = h.loans.create(alice()).await.unwrap();

    assert_eq!(loan.status(), LoanStatus::Pending);
    assert_eq!(loan.applicant_name().as_str(), "Alice");

    let entries = h.audit.list().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action(), AuditAction::LoanCreated);
    assert_eq!(entries[0].new_status(), LoanStatus::Pending);
    assert_eq!(entries[0].previous_status(), None);
    assert_eq!(entries[0].loan_id(), loan.id());
}

#[tokio::test]
async fn test_create_assigns_unique_ids() {
    let h = setup();
    let mut ids = HashSet::new();
    for i in 0..25 {
        let loan = create(&h.loans, &format!("Applicant {i}"), 1000.0 + i as f64, 12).await;
        assert!(ids.insert(*loan.id()), "duplicate id {}", loan.id());
    }
    assert_eq!(h.loans.list().await.unwrap().len(), 25);
}

#[tokio::test]
async fn test_create_trims_applicant_name() {
    let h = setup();
    let loan = h
        .loans
        .create(NewLoanApplication::new("  Bob Jones  ", 5000.0, 6, 0.0))
        .await
        .unwrap();
    assert_eq!(loan.applicant_name().as_str(), "Bob Jones");
}

#[tokio::test]
async fn test_each_validation_failure_has_no_side_effect() {
    let h = setup();
    let mut missing_rate = alice();
    missing_rate.interest_rate = None;

    let cases = vec![
        (
            NewLoanApplication::new("", 1000.0, 12, 0.05),
            DomainError::MissingApplicantName,
        ),
        (
            NewLoanApplication::new("Eve", 0.0, 12, 0.05),
            DomainError::InvalidAmount,
        ),
        (
            NewLoanApplication::new("Eve", -10.0, 12, 0.05),
            DomainError::InvalidAmount,
        ),
        (
            NewLoanApplication::new("Eve", 1000.0, 0, 0.05),
            DomainError::InvalidTerm,
        ),
        (
            NewLoanApplication::new("Eve", 1000.0, 12, -0.01),
            DomainError::InvalidInterestRate,
        ),
        (missing_rate, DomainError::MissingInterestRate),
    ];

    for (input, expected) in cases {
        match h.loans.create(input).await {
            Err(LoanStoreError::Validation(e)) => assert_eq!(e, expected),
            other => panic!("expected validation error {expected:?}, got {other:?}"),
        }
    }

    assert!(h.backend.raw(LOANS_KEY).is_none());
    assert!(h.backend.raw(AUDIT_LOGS_KEY).is_none());
}

// ============================================================================
// update_status / auto_decide
// ============================================================================

#[tokio::test]
async fn test_update_status_appends_status_changed() {
    let h = setup();
    let loan = h.loans.create(alice()).await.unwrap();

    let updated = h
        .loans
        .update_status(loan.id(), LoanStatus::Approved)
        .await
        .unwrap()
        .expect("loan exists");
    assert_eq!(updated.status(), LoanStatus::Approved);

    let entries = h.audit.list().await.unwrap();
    assert_eq!(entries.len(), 2);
    let last = &entries[1];
    assert_eq!(last.action(), AuditAction::StatusChanged);
    assert_eq!(last.previous_status(), Some(LoanStatus::Pending));
    assert_eq!(last.new_status(), LoanStatus::Approved);

    let listed = h.loans.list().await.unwrap();
    assert_eq!(listed[0].status(), LoanStatus::Approved);
}

#[tokio::test]
async fn test_update_status_does_not_guard_transitions() {
    let h = setup();
    let loan = h.loans.create(alice()).await.unwrap();

    h.loans
        .update_status(loan.id(), LoanStatus::Rejected)
        .await
        .unwrap();
    let again = h
        .loans
        .update_status(loan.id(), LoanStatus::Approved)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(again.status(), LoanStatus::Approved);
    let trail = h.audit.list_for_loan(loan.id()).await.unwrap();
    assert_eq!(trail.len(), 3);
    assert_eq!(trail[2].previous_status(), Some(LoanStatus::Rejected));
    assert_eq!(trail[2].new_status(), LoanStatus::Approved);
}

#[tokio::test]
async fn test_auto_decide_rejects_large_long_loan() {
    let h = setup();
    let loan = h
        .loans
        .create(NewLoanApplication::new("Carol", 150000.0, 72, 0.09))
        .await
        .unwrap();

    let decided = h.loans.auto_decide(loan.id()).await.unwrap().unwrap();
    assert_eq!(decided.status(), LoanStatus::Rejected);

    let entries = h.audit.list_for_loan(loan.id()).await.unwrap();
    let last = entries.last().unwrap();
    assert_eq!(last.action(), AuditAction::AutoDecided);
    assert_eq!(last.previous_status(), Some(LoanStatus::Pending));
    assert_eq!(last.new_status(), LoanStatus::Rejected);
    assert!(last.details().unwrap().contains("amount"));
}

#[tokio::test]
async fn test_auto_decide_approves_at_boundary() {
    let h = setup();
    let loan = create(&h.loans, "Dan", 100000.0, 60).await;

    let decided = h.loans.auto_decide(loan.id()).await.unwrap().unwrap();
    assert_eq!(decided.status(), LoanStatus::Approved);
}

#[tokio::test]
async fn test_auto_decide_rejects_just_over_boundary() {
    let h = setup();
    let over_amount = create(&h.loans, "Ed", 100001.0, 60).await;
    let over_term = create(&h.loans, "Flo", 100000.0, 61).await;

    for id in [over_amount.id(), over_term.id()] {
        let decided = h.loans.auto_decide(id).await.unwrap().unwrap();
        assert_eq!(decided.status(), LoanStatus::Rejected);
    }
}

#[tokio::test]
async fn test_missing_loan_operations_are_silent() {
    let h = setup();
    create(&h.loans, "Gus", 1000.0, 12).await;
    let unknown = LoanId::new();

    assert!(h
        .loans
        .update_status(&unknown, LoanStatus::Approved)
        .await
        .unwrap()
        .is_none());
    assert!(h.loans.auto_decide(&unknown).await.unwrap().is_none());
    assert_eq!(h.audit.list().await.unwrap().len(), 1);
}

// ============================================================================
// Audit trail ordering
// ============================================================================

#[tokio::test]
async fn test_list_for_loan_preserves_order_across_interleaving() {
    let h = setup();
    let a = create(&h.loans, "A", 1000.0, 12).await;
    let b = create(&h.loans, "B", 200000.0, 120).await;
    h.loans.auto_decide(b.id()).await.unwrap();
    h.loans
        .update_status(a.id(), LoanStatus::Rejected)
        .await
        .unwrap();
    let c = create(&h.loans, "C", 5000.0, 24).await;
    h.loans
        .update_status(b.id(), LoanStatus::Approved)
        .await
        .unwrap();

    let actions = |entries: Vec<tredgate_core::domain::AuditEntry>| -> Vec<AuditAction> {
        entries.iter().map(|e| e.action()).collect()
    };

    assert_eq!(
        actions(h.audit.list_for_loan(a.id()).await.unwrap()),
        vec![AuditAction::LoanCreated, AuditAction::StatusChanged]
    );
    assert_eq!(
        actions(h.audit.list_for_loan(b.id()).await.unwrap()),
        vec![
            AuditAction::LoanCreated,
            AuditAction::AutoDecided,
            AuditAction::StatusChanged
        ]
    );
    assert_eq!(
        actions(h.audit.list_for_loan(c.id()).await.unwrap()),
        vec![AuditAction::LoanCreated]
    );

    let all = h.audit.list().await.unwrap();
    let positions: Vec<usize> = h
        .audit
        .list_for_loan(b.id())
        .await
        .unwrap()
        .iter()
        .map(|entry| all.iter().position(|e| e.id() == entry.id()).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

// ============================================================================
// Empty state, reset, corruption
// ============================================================================

#[tokio::test]
async fn test_fresh_stores_are_empty() {
    let h = setup();
    assert!(h.loans.list().await.unwrap().is_empty());
    assert!(h.audit.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_empties_both_stores() {
    let h = setup();
    let loan = h.loans.create(alice()).await.unwrap();
    h.loans.auto_decide(loan.id()).await.unwrap();

    h.loans.clear().await.unwrap();
    h.audit.clear().await.unwrap();

    assert!(h.loans.list().await.unwrap().is_empty());
    assert!(h.audit.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupted_loans_read_as_empty() {
    let h = setup();
    h.backend.insert_raw(LOANS_KEY, "{\"oops\": ");

    assert!(h.loans.list().await.unwrap().is_empty());
    assert!(h.loans.get(&LoanId::new()).await.unwrap().is_none());

    let loan = h.loans.create(alice()).await.unwrap();
    assert_eq!(h.loans.list().await.unwrap(), vec![loan]);
}

// ============================================================================
// delete / summary
// ============================================================================

#[tokio::test]
async fn test_delete_keeps_audit_entries() {
    let h = setup();
    let loan = h.loans.create(alice()).await.unwrap();

    assert!(h.loans.delete(loan.id()).await.unwrap());
    assert!(!h.loans.delete(loan.id()).await.unwrap());

    assert!(h.loans.get(loan.id()).await.unwrap().is_none());
    assert_eq!(h.audit.list_for_loan(loan.id()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_summary_and_status_filter() {
    let h = setup();
    let a = create(&h.loans, "A", 10000.0, 12).await;
    let b = create(&h.loans, "B", 20000.0, 24).await;
    create(&h.loans, "C", 30000.0, 36).await;
    h.loans
        .update_status(a.id(), LoanStatus::Approved)
        .await
        .unwrap();
    h.loans
        .update_status(b.id(), LoanStatus::Rejected)
        .await
        .unwrap();

    let summary = h.loans.summary().await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.approved, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.total_amount, 60000.0);
    assert_eq!(summary.approved_amount, 10000.0);

    let pending = h.loans.list_by_status(LoanStatus::Pending).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].applicant_name().as_str(), "C");
}

// ============================================================================
// Persistence round-trip
// ============================================================================

#[tokio::test]
async fn test_collections_reload_equal_from_sqlite() {
    let (kv, store) = setup_sqlite().await;
    let a = store.create(alice()).await.unwrap();
    store
        .create(NewLoanApplication::new("Zoe", 80000.0, 48, 0.0625))
        .await
        .unwrap();
    store.auto_decide(a.id()).await.unwrap();

    let loans_before = store.list().await.unwrap();
    let audit_before = store.audit().list().await.unwrap();

    let audit = Arc::new(AuditLogStore::new(Arc::clone(&kv)));
    let reloaded = LoanStore::new(kv, Arc::clone(&audit));

    assert_eq!(reloaded.list().await.unwrap(), loans_before);
    assert_eq!(audit.list().await.unwrap(), audit_before);
}

#[tokio::test]
async fn test_unrounded_amounts_and_rates_reload_exactly() {
    let h = setup();
    let inputs = [
        (1054570.4373084959, 0.010142857142857143),
        (0.1 + 0.2, 1.0 / 3.0),
        (98765.43210987654, 0.07000000000000001),
        (123456789.12345679, 0.0004999999999999999),
        (2.0_f64.sqrt() * 1000.0, std::f64::consts::PI / 100.0),
    ];

    let mut created = Vec::new();
    for (i, (amount, rate)) in inputs.into_iter().enumerate() {
        let loan = h
            .loans
            .create(NewLoanApplication::new(format!("Applicant {i}"), amount, 36, rate))
            .await
            .unwrap();
        assert_eq!(loan.amount().to_bits(), amount.to_bits());
        assert_eq!(loan.interest_rate().to_bits(), rate.to_bits());
        created.push(loan);
    }

    let listed = h.loans.list().await.unwrap();
    assert_eq!(listed, created);
    for (loan, (amount, rate)) in listed.iter().zip(inputs) {
        assert_eq!(loan.amount().to_bits(), amount.to_bits());
        assert_eq!(loan.interest_rate().to_bits(), rate.to_bits());
    }
}

#[tokio::test]
async fn test_persisted_layout_uses_camel_case_keys() {
    let h = setup();
    h.loans.create(alice()).await.unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&h.backend.raw(LOANS_KEY).unwrap()).unwrap();
    let record = &raw.as_array().unwrap()[0];
    for field in [
        "id",
        "applicantName",
        "amount",
        "termMonths",
        "interestRate",
        "status",
        "createdAt",
    ] {
        assert!(record.get(field).is_some(), "missing {field}");
    }

    let raw_audit: serde_json::Value =
        serde_json::from_str(&h.backend.raw(AUDIT_LOGS_KEY).unwrap()).unwrap();
    let entry = &raw_audit.as_array().unwrap()[0];
    assert_eq!(entry["action"], "loan_created");
    assert_eq!(entry["newStatus"], "pending");
    assert_eq!(entry["loanId"], record["id"]);
}

// ============================================================================
// End-to-end
// ============================================================================

#[tokio::test]
async fn test_end_to_end_create_then_approve() {
    let h = setup();

    let loan = h.loans.create(alice()).await.unwrap();
    let entries = h.audit.list().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action(), AuditAction::LoanCreated);
    assert_eq!(entries[0].new_status(), LoanStatus::Pending);

    h.loans
        .update_status(loan.id(), LoanStatus::Approved)
        .await
        .unwrap();

    let entries = h.audit.list().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].action(), AuditAction::StatusChanged);
    assert_eq!(entries[1].previous_status(), Some(LoanStatus::Pending));
    assert_eq!(entries[1].new_status(), LoanStatus::Approved);

    let loans = h.loans.list().await.unwrap();
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].status(), LoanStatus::Approved);
}

#[tokio::test]
async fn test_concurrent_creates_are_all_persisted() {
    let h = setup();
    let store = Arc::new(h.loans);

    let mut handles = Vec::new();
    for i in 0..10 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .create(NewLoanApplication::new(format!("P{i}"), 1000.0, 12, 0.05))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.list().await.unwrap().len(), 10);
    assert_eq!(h.audit.list().await.unwrap().len(), 10);
}

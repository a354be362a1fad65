//! Decision commands - Approve, reject or auto-decide an application
//!
//! `approve` and `reject` record a `status_changed` entry; `decide` applies
//! the configured decision rule and records an `auto_decided` entry. None of
//! them refuse an already decided loan.

use anyhow::Result;
use clap::Args;
use tredgate_core::{
    config::Config,
    domain::{LoanApplication, LoanId, LoanStatus},
};

use super::{loan_json, parse_loan_id};
use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct ApproveCommand {
    /// Loan ID
    pub id: String,
}

#[derive(Debug, Args)]
pub struct RejectCommand {
    /// Loan ID
    pub id: String,
}

#[derive(Debug, Args)]
pub struct DecideCommand {
    /// Loan ID
    pub id: String,
}

/// What to do with the loan
#[derive(Debug, Clone, Copy)]
enum Decision {
    Set(LoanStatus),
    Auto,
}

impl ApproveCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        execute(config, &self.id, Decision::Set(LoanStatus::Approved), format).await
    }
}

impl RejectCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        execute(config, &self.id, Decision::Set(LoanStatus::Rejected), format).await
    }
}

impl DecideCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        execute(config, &self.id, Decision::Auto, format).await
    }
}

async fn execute(config: &Config, id: &str, decision: Decision, format: OutputFormat) -> Result<()> {
    let loan_id = parse_loan_id(id)?;
    let ctx = AppContext::open(config).await?;
    let result = run(&ctx, &loan_id, decision, format).await;
    ctx.close().await;
    result.map(|_| ())
}

async fn run(
    ctx: &AppContext,
    loan_id: &LoanId,
    decision: Decision,
    format: OutputFormat,
) -> Result<Option<LoanApplication>> {
    let formatter = get_formatter(format);

    let updated = match decision {
        Decision::Set(status) => ctx.loans.update_status(loan_id, status).await?,
        Decision::Auto => ctx.loans.auto_decide(loan_id).await?,
    };

    let Some(loan) = updated else {
        formatter.error(&format!("Loan {} not found", loan_id));
        return Ok(None);
    };

    if format.is_json() {
        formatter.print_json(&loan_json(&loan, ctx.payment_formula)?);
        return Ok(Some(loan));
    }

    match decision {
        Decision::Set(_) => {
            formatter.success(&format!("Loan {} is now {}", loan.id(), loan.status()));
        }
        Decision::Auto => {
            formatter.success(&format!("Loan {} auto-decided: {}", loan.id(), loan.status()));
            formatter.info(
                &ctx.loans
                    .decision_rule()
                    .explain(loan.amount(), loan.term_months()),
            );
        }
    }

    Ok(Some(loan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tredgate_core::domain::{AuditAction, NewLoanApplication};
    use tredgate_storage::InMemoryKeyValueStore;

    async fn setup(amount: f64, term: i64) -> (AppContext, LoanId) {
        let ctx = AppContext::with_store(Arc::new(InMemoryKeyValueStore::new()), &Config::default());
        let loan = ctx
            .loans
            .create(NewLoanApplication::new("Alice", amount, term, 0.05))
            .await
            .unwrap();
        (ctx, *loan.id())
    }

    #[tokio::test]
    async fn test_manual_decision_records_status_change() {
        let (ctx, id) = setup(25000.0, 12).await;

        let loan = run(&ctx, &id, Decision::Set(LoanStatus::Rejected), OutputFormat::Human)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loan.status(), LoanStatus::Rejected);

        let trail = ctx.audit.list_for_loan(&id).await.unwrap();
        assert_eq!(trail[1].action(), AuditAction::StatusChanged);
    }

    #[tokio::test]
    async fn test_auto_decision_uses_rule() {
        let (ctx, id) = setup(150000.0, 72).await;

        let loan = run(&ctx, &id, Decision::Auto, OutputFormat::Json)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loan.status(), LoanStatus::Rejected);

        let trail = ctx.audit.list_for_loan(&id).await.unwrap();
        assert_eq!(trail[1].action(), AuditAction::AutoDecided);
    }

    #[tokio::test]
    async fn test_unknown_loan_is_reported_not_failed() {
        let (ctx, _) = setup(1000.0, 12).await;

        let result = run(&ctx, &LoanId::new(), Decision::Auto, OutputFormat::Human)
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(ctx.audit.list().await.unwrap().len(), 1);
    }
}

//! Show command - One loan application with its audit trail
//!
//! Provides the `tredgate show <id>` CLI command which prints the loan,
//! its monthly payment, what the auto-decision rule would do with it, and
//! every audit entry recorded for it.

use anyhow::Result;
use clap::Args;
use tredgate_core::config::Config;

use super::{entry_row, loan_json, parse_loan_id, round_cents};
use crate::context::AppContext;
use crate::output::{format_amount, format_rate, get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Loan ID
    pub id: String,
}

impl ShowCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let ctx = AppContext::open(config).await?;
        let result = self.run(&ctx, format).await;
        ctx.close().await;
        result
    }

    pub(crate) async fn run(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let loan_id = parse_loan_id(&self.id)?;

        // Audit entries outlive deleted loans, so the trail is shown either way
        let loan = ctx.loans.get(&loan_id).await?;
        let trail = ctx.audit.list_for_loan(&loan_id).await?;

        if format.is_json() {
            let loan = loan
                .as_ref()
                .map(|loan| loan_json(loan, ctx.payment_formula))
                .transpose()?;
            formatter.print_json(&serde_json::json!({
                "loanId": loan_id.to_string(),
                "loan": loan,
                "audit": trail,
            }));
            return Ok(());
        }

        match &loan {
            Some(loan) => {
                let rule = ctx.loans.decision_rule();
                formatter.success(&format!("Loan {}", loan.id()));
                formatter.info(&format!("Applicant:       {}", loan.applicant_name()));
                formatter.info(&format!("Amount:          {}", format_amount(loan.amount())));
                formatter.info(&format!("Term:            {} months", loan.term_months()));
                formatter.info(&format!("Interest rate:   {}", format_rate(loan.interest_rate())));
                formatter.info(&format!(
                    "Monthly payment: {} ({})",
                    format_amount(round_cents(loan.monthly_payment_with(ctx.payment_formula))),
                    ctx.payment_formula
                ));
                formatter.info(&format!("Status:          {}", loan.status()));
                formatter.info(&format!(
                    "Created:         {}",
                    loan.created_at().format("%Y-%m-%d %H:%M:%S UTC")
                ));
                formatter.info(&format!(
                    "Auto-decision:   {}",
                    rule.explain(loan.amount(), loan.term_months())
                ));
            }
            None if trail.is_empty() => {
                formatter.error(&format!("Loan {} not found", loan_id));
                return Ok(());
            }
            None => {
                formatter.warn(&format!(
                    "Loan {} no longer exists; showing its audit trail",
                    loan_id
                ));
            }
        }

        formatter.info("");
        formatter.info(&format!("Audit trail ({} entries)", trail.len()));
        for entry in &trail {
            formatter.info(&format!("  {}", entry_row(entry)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tredgate_core::domain::NewLoanApplication;
    use tredgate_storage::InMemoryKeyValueStore;

    #[tokio::test]
    async fn test_show_existing_deleted_and_unknown() {
        let ctx = AppContext::with_store(Arc::new(InMemoryKeyValueStore::new()), &Config::default());
        let loan = ctx
            .loans
            .create(NewLoanApplication::new("Alice", 25000.0, 12, 0.05))
            .await
            .unwrap();

        let cmd = ShowCommand {
            id: loan.id().to_string(),
        };
        cmd.run(&ctx, OutputFormat::Human).await.unwrap();

        ctx.loans.delete(loan.id()).await.unwrap();
        cmd.run(&ctx, OutputFormat::Json).await.unwrap();

        let unknown = ShowCommand {
            id: tredgate_core::domain::LoanId::new().to_string(),
        };
        unknown.run(&ctx, OutputFormat::Human).await.unwrap();
    }

    #[tokio::test]
    async fn test_show_rejects_malformed_id() {
        let ctx = AppContext::with_store(Arc::new(InMemoryKeyValueStore::new()), &Config::default());
        let cmd = ShowCommand {
            id: "12345".to_string(),
        };
        assert!(cmd.run(&ctx, OutputFormat::Human).await.is_err());
    }
}

//! Delete command - Remove a loan application
//!
//! The audit trail of the loan is kept.

use anyhow::Result;
use clap::Args;
use tredgate_core::config::Config;

use super::parse_loan_id;
use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Loan ID
    pub id: String,
}

impl DeleteCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let ctx = AppContext::open(config).await?;
        let result = self.run(&ctx, format).await;
        ctx.close().await;
        result.map(|_| ())
    }

    pub(crate) async fn run(&self, ctx: &AppContext, format: OutputFormat) -> Result<bool> {
        let formatter = get_formatter(format);
        let loan_id = parse_loan_id(&self.id)?;

        let deleted = ctx.loans.delete(&loan_id).await?;

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "loanId": loan_id.to_string(),
                "deleted": deleted,
            }));
        } else if deleted {
            formatter.success(&format!("Loan {} deleted", loan_id));
        } else {
            formatter.error(&format!("Loan {} not found", loan_id));
        }

        Ok(deleted)
    }
}

//! List command - Show loan applications

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use tredgate_core::{config::Config, domain::LoanStatus};

use super::{loan_json, loan_row};
use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show loans in this status (pending, approved, rejected)
    #[arg(long)]
    pub status: Option<String>,
}

impl ListCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let ctx = AppContext::open(config).await?;
        let result = self.run(&ctx, format).await;
        ctx.close().await;
        result
    }

    pub(crate) async fn run(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        let status = self
            .status
            .as_deref()
            .map(|s| {
                s.parse::<LoanStatus>()
                    .with_context(|| format!("Invalid --status value: '{}'", s))
            })
            .transpose()?;

        let loans = match status {
            Some(status) => ctx.loans.list_by_status(status).await?,
            None => ctx.loans.list().await?,
        };
        info!(count = loans.len(), "Retrieved loan applications");

        if format.is_json() {
            let items = loans
                .iter()
                .map(|loan| loan_json(loan, ctx.payment_formula))
                .collect::<Result<Vec<_>>>()?;
            formatter.print_json(&serde_json::json!({
                "status": status.map(|s| s.as_str()),
                "count": items.len(),
                "loans": items,
            }));
            return Ok(());
        }

        if loans.is_empty() {
            formatter.info("No loan applications found.");
            return Ok(());
        }

        formatter.success(&format!("Loan applications ({})", loans.len()));
        formatter.info("");
        for loan in &loans {
            formatter.info(&loan_row(loan));
        }

        Ok(())
    }
}

//! Summary command - Counts and totals over all applications

use anyhow::{Context, Result};
use clap::Args;
use tredgate_core::config::Config;

use crate::context::AppContext;
use crate::output::{format_amount, get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct SummaryCommand {}

impl SummaryCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let ctx = AppContext::open(config).await?;
        let result = self.run(&ctx, format).await;
        ctx.close().await;
        result
    }

    pub(crate) async fn run(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let summary = ctx.loans.summary().await?;
        let audit_entries = ctx.audit.list().await?.len();

        if format.is_json() {
            let mut json =
                serde_json::to_value(&summary).context("Failed to serialize summary")?;
            if let Some(map) = json.as_object_mut() {
                map.insert("approvalRate".into(), serde_json::json!(summary.approval_rate()));
                map.insert("auditEntries".into(), serde_json::json!(audit_entries));
            }
            formatter.print_json(&json);
            return Ok(());
        }

        formatter.success(&format!("{} loan applications", summary.total));
        formatter.info(&format!("Pending:         {}", summary.pending));
        formatter.info(&format!("Approved:        {}", summary.approved));
        formatter.info(&format!("Rejected:        {}", summary.rejected));
        formatter.info(&format!("Total requested: {}", format_amount(summary.total_amount)));
        formatter.info(&format!("Total approved:  {}", format_amount(summary.approved_amount)));
        match summary.approval_rate() {
            Some(rate) => formatter.info(&format!("Approval rate:   {:.1}%", rate * 100.0)),
            None => formatter.info("Approval rate:   n/a"),
        }
        formatter.info(&format!("Audit entries:   {}", audit_entries));

        Ok(())
    }
}

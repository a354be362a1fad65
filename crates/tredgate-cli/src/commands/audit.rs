//! Audit command - View audit log entries
//!
//! Provides the `tredgate audit` CLI command which:
//! 1. Lists audit entries, optionally filtered by loan, action and time
//! 2. Formats entries in a table with timestamp, action, transition, and details
//! 3. Supports relative and absolute time parsing for the --since flag
//! 4. Clears the whole log with --clear

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::Args;
use tracing::info;
use tredgate_core::{
    config::Config,
    domain::{AuditAction, AuditEntry},
};

use super::{entry_row, parse_loan_id};
use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct AuditCommand {
    /// Only entries for this loan ID
    #[arg(long)]
    pub loan: Option<String>,

    /// Filter by action (loan_created, status_changed, auto_decided)
    #[arg(long)]
    pub action: Option<String>,

    /// Show entries since this time (e.g., "1h", "2d", "2024-01-01")
    #[arg(long)]
    pub since: Option<String>,

    /// Maximum number of entries to show (most recent)
    #[arg(long, default_value = "50")]
    pub limit: usize,

    /// Delete every audit entry
    #[arg(long, conflicts_with_all = ["loan", "action", "since"])]
    pub clear: bool,
}

impl AuditCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let ctx = AppContext::open(config).await?;
        let result = self.run(&ctx, format).await;
        ctx.close().await;
        result
    }

    pub(crate) async fn run(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        if self.clear {
            ctx.audit.clear().await?;
            formatter.success("Audit log cleared");
            return Ok(());
        }

        let Selection {
            action,
            since,
            total,
            entries,
        } = self.select(ctx).await?;

        info!(count = entries.len(), total, "Retrieved audit entries");

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "loanId": self.loan,
                "action": action.map(|a| a.as_str()),
                "since": since.map(|s| s.to_rfc3339()),
                "limit": self.limit,
                "total": total,
                "count": entries.len(),
                "entries": entries,
            }));
            return Ok(());
        }

        if entries.is_empty() {
            formatter.info("No audit entries found for the specified criteria.");
            return Ok(());
        }

        formatter.success(&format!("Audit Log ({} entries)", entries.len()));
        formatter.info("");
        formatter.info("  Timestamp           Action         Status               Details");
        formatter.info("  ------------------- -------------- -------------------- -------");

        for entry in &entries {
            formatter.info(&format!(
                "  {}  [{}]",
                truncate_string(&entry_row(entry), 110),
                entry.loan_id()
            ));
        }

        if total > entries.len() {
            formatter.info("");
            formatter.info(&format!(
                "Showing the last {} of {} entries. Use --limit to show more.",
                entries.len(),
                total
            ));
        }

        Ok(())
    }
}

/// Entries picked by the filter flags
struct Selection {
    action: Option<AuditAction>,
    since: Option<DateTime<Utc>>,
    /// Matching entries before `--limit` was applied
    total: usize,
    entries: Vec<AuditEntry>,
}

impl AuditCommand {
    /// Applies `--loan`, `--action`, `--since` and then `--limit`, keeping
    /// the most recent entries in log order
    async fn select(&self, ctx: &AppContext) -> Result<Selection> {
        let action = self
            .action
            .as_deref()
            .map(|a| {
                a.parse::<AuditAction>()
                    .with_context(|| format!("Invalid --action value: '{}'", a))
            })
            .transpose()?;

        let since = match &self.since {
            Some(since_str) => {
                let parsed = parse_since(since_str)
                    .context(format!("Invalid --since value: '{}'. Expected formats: '1h', '30m', '2d', '1w', '2024-01-01', '2024-01-01T12:00:00'", since_str))?;
                info!(since = %parsed, "Filtering audit entries since");
                Some(parsed)
            }
            None => None,
        };

        let mut entries = match &self.loan {
            Some(loan) => ctx.audit.list_for_loan(&parse_loan_id(loan)?).await?,
            None => ctx.audit.list().await?,
        };
        entries.retain(|entry| {
            action.map_or(true, |a| entry.action() == a)
                && since.map_or(true, |s| entry.timestamp() >= s)
        });

        let total = entries.len();
        if total > self.limit {
            entries.drain(..total - self.limit);
        }

        Ok(Selection {
            action,
            since,
            total,
            entries,
        })
    }
}

/// Parse the --since argument into a DateTime<Utc>
///
/// Supports:
/// - Relative: "1h" (1 hour ago), "30m" (30 minutes), "2d" (2 days), "1w" (1 week)
/// - Absolute date: "2024-01-01"
/// - Absolute datetime: "2024-01-01T12:00:00"
fn parse_since(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Some(duration) = parse_relative_duration(input) {
        return Utc::now()
            .checked_sub_signed(duration)
            .with_context(|| format!("'{}' reaches too far into the past", input));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let datetime = date
            .and_hms_opt(0, 0, 0)
            .context("Failed to create datetime from date")?;
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(datetime, Utc));
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(datetime, Utc));
    }

    anyhow::bail!(
        "Could not parse '{}' as a time. Use relative (1h, 30m, 2d, 1w) or absolute (2024-01-01) format.",
        input
    )
}

/// Parse relative duration strings like "1h", "30m", "2d", "1w"
///
/// Returns `None` for unknown units and for counts chrono cannot represent.
fn parse_relative_duration(input: &str) -> Option<chrono::Duration> {
    let (unit_start, unit) = input.char_indices().last()?;
    let num: i64 = input[..unit_start].parse().ok()?;

    match unit {
        'm' => chrono::Duration::try_minutes(num),
        'h' => chrono::Duration::try_hours(num),
        'd' => chrono::Duration::try_days(num),
        'w' => chrono::Duration::try_weeks(num),
        _ => None,
    }
}

/// Truncate a string to at most `max_len` characters
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

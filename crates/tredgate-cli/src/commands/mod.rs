pub mod audit;
pub mod config;
pub mod create;
pub mod decide;
pub mod delete;
pub mod list;
pub mod payment;
pub mod show;
pub mod summary;

use anyhow::{Context, Result};
use tredgate_core::domain::{AuditEntry, LoanApplication, LoanId, PaymentFormula};

use crate::output::{format_amount, format_rate};

/// Parses a loan ID argument
pub(crate) fn parse_loan_id(input: &str) -> Result<LoanId> {
    input
        .trim()
        .parse()
        .with_context(|| format!("Invalid loan ID: '{}'", input))
}

/// JSON view of a loan, with its monthly payment under `formula`
pub(crate) fn loan_json(loan: &LoanApplication, formula: PaymentFormula) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(loan).context("Failed to serialize loan")?;
    if let Some(map) = value.as_object_mut() {
        map.insert(
            "monthlyPayment".to_string(),
            serde_json::json!(round_cents(loan.monthly_payment_with(formula))),
        );
    }
    Ok(value)
}

/// One table line per loan: id, status, amount, term, rate, applicant
pub(crate) fn loan_row(loan: &LoanApplication) -> String {
    format!(
        "{}  {:<8} {:>14} {:>4}m {:>7}  {}",
        loan.id(),
        loan.status().as_str(),
        format_amount(loan.amount()),
        loan.term_months(),
        format_rate(loan.interest_rate()),
        loan.applicant_name()
    )
}

/// One table line per audit entry
pub(crate) fn entry_row(entry: &AuditEntry) -> String {
    let transition = match entry.previous_status() {
        Some(previous) => format!("{} -> {}", previous, entry.new_status()),
        None => entry.new_status().to_string(),
    };
    format!(
        "{} {:<14} {:<20} {}",
        entry.timestamp().format("%Y-%m-%d %H:%M:%S"),
        entry.action().as_str(),
        transition,
        entry.details().unwrap_or_default()
    )
}

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

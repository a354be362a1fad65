//! Payment command - Monthly payment calculator
//!
//! Computes the payment for an amount, term and rate without touching
//! storage. The formula defaults to `payment.formula` from configuration.

use anyhow::{Context, Result};
use clap::Args;
use tredgate_core::{
    config::Config,
    domain::{DomainError, PaymentFormula},
};

use super::round_cents;
use crate::output::{format_amount, format_rate, get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct PaymentCommand {
    /// Loan amount
    #[arg(long, allow_negative_numbers = true)]
    pub amount: f64,

    /// Term in months
    #[arg(long, allow_negative_numbers = true)]
    pub term: i64,

    /// Annual interest rate as a fraction (0.05 = 5%)
    #[arg(long, allow_negative_numbers = true)]
    pub rate: f64,

    /// Formula: amortized or flat
    #[arg(long)]
    pub formula: Option<String>,
}

impl PaymentCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        let formula = match &self.formula {
            Some(name) => name
                .parse::<PaymentFormula>()
                .with_context(|| format!("Invalid --formula value: '{}'", name))?,
            None => config.payment.formula,
        };

        let payment = match self.calculate(formula) {
            Ok(payment) => payment,
            Err(e) => {
                formatter.error(&e.to_string());
                return Ok(());
            }
        };

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "amount": self.amount,
                "termMonths": self.term,
                "interestRate": self.rate,
                "formula": formula,
                "monthlyPayment": payment,
                "totalPaid": round_cents(payment * self.term as f64),
            }));
            return Ok(());
        }

        formatter.success(&format!("Monthly payment: {}", format_amount(payment)));
        formatter.info(&format!(
            "{} over {} months at {} ({})",
            format_amount(self.amount),
            self.term,
            format_rate(self.rate),
            formula
        ));
        formatter.info(&format!(
            "Total paid: {}",
            format_amount(round_cents(payment * self.term as f64))
        ));

        Ok(())
    }

    /// Payment rounded to cents, after the same input checks as a new loan
    fn calculate(&self, formula: PaymentFormula) -> Result<f64, DomainError> {
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(DomainError::InvalidAmount);
        }
        let term = u32::try_from(self.term)
            .ok()
            .filter(|&t| t > 0)
            .ok_or(DomainError::InvalidTerm)?;
        if !(self.rate.is_finite() && self.rate >= 0.0) {
            return Err(DomainError::InvalidInterestRate);
        }

        Ok(round_cents(formula.monthly_payment(self.amount, term, self.rate)))
    }
}

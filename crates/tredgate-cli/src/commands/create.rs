//! Create command - Submit a new loan application
//!
//! Provides the `tredgate create` CLI command which:
//! 1. Validates and stores the application as pending
//! 2. Optionally applies the auto-decision rule right away (`--decide`)
//! 3. Prints the stored loan with its monthly payment

use anyhow::Result;
use clap::Args;
use tredgate_core::{config::Config, domain::NewLoanApplication};
use tredgate_loans::LoanStoreError;

use super::{loan_json, round_cents};
use crate::context::AppContext;
use crate::output::{format_amount, format_rate, get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Applicant's full name
    #[arg(long)]
    pub name: String,

    /// Requested amount
    #[arg(long, allow_negative_numbers = true)]
    pub amount: f64,

    /// Term in months
    #[arg(long, allow_negative_numbers = true)]
    pub term: i64,

    /// Annual interest rate as a fraction (0.05 = 5%)
    #[arg(long, allow_negative_numbers = true)]
    pub rate: Option<f64>,

    /// Apply the auto-decision rule after creating
    #[arg(long)]
    pub decide: bool,
}

impl CreateCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let ctx = AppContext::open(config).await?;
        let result = self.run(&ctx, format).await;
        ctx.close().await;
        result
    }

    pub(crate) async fn run(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        let input = NewLoanApplication {
            applicant_name: self.name.clone(),
            amount: self.amount,
            term_months: self.term,
            interest_rate: self.rate,
        };

        let mut loan = match ctx.loans.create(input).await {
            Ok(loan) => loan,
            Err(LoanStoreError::Validation(e)) => {
                formatter.error(&e.to_string());
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if self.decide {
            if let Some(decided) = ctx.loans.auto_decide(loan.id()).await? {
                loan = decided;
            }
        }

        if format.is_json() {
            formatter.print_json(&loan_json(&loan, ctx.payment_formula)?);
            return Ok(());
        }

        formatter.success(&format!("Loan application {} created", loan.id()));
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

        Ok(())
    }
}

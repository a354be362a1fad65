//! Monthly payment calculation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// How the monthly payment is derived from amount, term and annual rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFormula {
    /// Standard annuity: `P·r·(1+r)^n / ((1+r)^n − 1)` with `r = rate / 12`
    #[default]
    Amortized,
    /// Annual rate applied once to the principal, spread evenly: `P·(1+rate) / n`
    Flat,
}

impl PaymentFormula {
    /// Monthly payment under this formula
    ///
    /// A zero rate always yields `amount / term_months` exactly.
    pub fn monthly_payment(&self, amount: f64, term_months: u32, interest_rate: f64) -> f64 {
        let n = f64::from(term_months);
        if interest_rate == 0.0 {
            return amount / n;
        }

        match self {
            PaymentFormula::Amortized => {
                let monthly_rate = interest_rate / 12.0;
                let growth = (1.0 + monthly_rate).powf(n);
                amount * monthly_rate * growth / (growth - 1.0)
            }
            PaymentFormula::Flat => amount * (1.0 + interest_rate) / n,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFormula::Amortized => "amortized",
            PaymentFormula::Flat => "flat",
        }
    }
}

impl fmt::Display for PaymentFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFormula {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amortized" => Ok(PaymentFormula::Amortized),
            "flat" => Ok(PaymentFormula::Flat),
            other => Err(DomainError::ValidationFailed(format!(
                "unknown payment formula '{other}'"
            ))),
        }
    }
}

/// Amortized monthly payment
///
/// Pure function. With a zero rate the principal is divided evenly across
/// the term; otherwise the standard amortization formula is applied with a
/// monthly rate of `interest_rate / 12`.
///
/// This is not the flat-interest figure. For 50,000 over 24 months at 8%
/// it returns about 2261.36, while the flat schedule quoted elsewhere
/// (2250.00, 1766.67, 2270.83) comes from [`PaymentFormula::Flat`]. The CLI
/// picks between the two with the `payment.formula` setting.
///
/// # Example
///
/// ```
/// use tredgate_core::domain::{calculate_monthly_payment, PaymentFormula};
///
/// assert_eq!(calculate_monthly_payment(1200.0, 12, 0.0), 100.0);
///
/// let amortized = calculate_monthly_payment(50_000.0, 24, 0.08);
/// let flat = PaymentFormula::Flat.monthly_payment(50_000.0, 24, 0.08);
/// assert!((amortized - 2261.36).abs() < 0.01);
/// assert!((flat - 2250.0).abs() < 0.01);
/// ```
pub fn calculate_monthly_payment(amount: f64, term_months: u32, interest_rate: f64) -> f64 {
    PaymentFormula::Amortized.monthly_payment(amount, term_months, interest_rate)
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calendar::YearMonth;
use crate::error::EmiError;
use crate::types::{Money, Rate};
use crate::EmiResult;

/// Percent-per-annum to decimal-per-month divisor (12 months * 100).
const ANNUAL_PCT_TO_MONTHLY: Decimal = dec!(1200);

/// Longest supported loan life, moratorium included (100 years).
pub const MAX_LOAN_MONTHS: u32 = 1200;

/// The base terms of a loan, fixed for one calculation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed.
    pub principal: Money,
    /// Nominal annual interest rate in percent (8.5 = 8.5%).
    pub annual_rate_pct: Decimal,
    /// Number of amortizing months after any moratorium.
    pub tenure_months: u32,
    /// Interest-only (capitalizing) months before amortization starts.
    #[serde(default)]
    pub moratorium_months: u32,
    /// Disbursement date; the schedule starts in this calendar month.
    pub start_date: NaiveDate,
}

impl LoanTerms {
    pub fn validate(&self) -> EmiResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(EmiError::InvalidInput {
                field: "principal".into(),
                reason: "Principal must be positive".into(),
            });
        }
        if self.annual_rate_pct < Decimal::ZERO {
            return Err(EmiError::InvalidInput {
                field: "annual_rate_pct".into(),
                reason: "Interest rate cannot be negative".into(),
            });
        }
        if self.tenure_months == 0 {
            return Err(EmiError::InvalidInput {
                field: "tenure_months".into(),
                reason: "Tenure must be at least one month".into(),
            });
        }
        let within_cap = self
            .moratorium_months
            .checked_add(self.tenure_months)
            .is_some_and(|total| total <= MAX_LOAN_MONTHS);
        if !within_cap {
            return Err(EmiError::InvalidInput {
                field: "tenure_months".into(),
                reason: format!(
                    "Moratorium plus tenure must not exceed {MAX_LOAN_MONTHS} months"
                ),
            });
        }
        Ok(())
    }

    pub fn monthly_rate(&self) -> Rate {
        monthly_rate_from_pct(self.annual_rate_pct)
    }

    /// Moratorium plus amortizing months; the baseline schedule length.
    pub fn total_months(&self) -> u32 {
        self.moratorium_months.saturating_add(self.tenure_months)
    }

    pub fn start_period(&self) -> YearMonth {
        YearMonth::from_date(self.start_date)
    }
}

/// Monthly rate for an annual percentage rate.
pub fn monthly_rate_from_pct(annual_rate_pct: Decimal) -> Rate {
    annual_rate_pct / ANNUAL_PCT_TO_MONTHLY
}

use serde::{Deserialize, Serialize};

use super::inflation::inflation_adjusted_loss;
use crate::amortization::{LoanTerms, Schedule};
use crate::config::CalculatorConfig;
use crate::types::Money;

/// Headline figures for one schedule, kept together with the schedule they
/// were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub principal: Money,
    pub emi: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub inflation_adjusted_loss: Money,
    pub schedule: Schedule,
}

impl MetricsSnapshot {
    /// Snapshot of an unmodified loan. The inflation comparison runs over
    /// the full contractual tenure.
    pub fn baseline(terms: &LoanTerms, schedule: Schedule, config: &CalculatorConfig) -> Self {
        Self::build(terms, schedule, terms.tenure_months, config)
    }

    /// Snapshot of a prepayment-adjusted loan. The inflation comparison
    /// runs over the months actually paid.
    pub fn current(terms: &LoanTerms, schedule: Schedule, config: &CalculatorConfig) -> Self {
        let months_paid = schedule.months_paid();
        Self::build(terms, schedule, months_paid, config)
    }

    fn build(
        terms: &LoanTerms,
        schedule: Schedule,
        inflation_term_months: u32,
        config: &CalculatorConfig,
    ) -> Self {
        Self {
            principal: terms.principal,
            emi: schedule.emi(),
            total_interest: schedule.total_interest(),
            total_payment: schedule.total_payment(),
            inflation_adjusted_loss: inflation_adjusted_loss(
                terms.principal,
                terms.annual_rate_pct,
                inflation_term_months,
                config.inflation_rate_pct,
            ),
            schedule,
        }
    }
}

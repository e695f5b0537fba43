//! Expansion of prepayment plans into a [`PrepaymentMap`].

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{PrepaymentMap, PrepaymentPlan, PrepaymentSpec, PrepaymentTemplate};
use crate::calendar::YearMonth;
use crate::error::{EmiError, PrepaymentRowError};
use crate::types::Money;
use crate::EmiResult;

/// Month interval of the 16-EMI discipline: every third month.
const SIXTEEN_EMI_INTERVAL: u32 = 3;

/// Check every row and report all failures together.
pub fn validate_specs(specs: &[PrepaymentSpec]) -> EmiResult<()> {
    let mut failures = Vec::new();

    for (row, spec) in specs.iter().enumerate() {
        if spec.amount <= Decimal::ZERO {
            failures.push(PrepaymentRowError {
                row,
                field: "amount".into(),
                reason: "Prepayment amount must be positive".into(),
            });
        }
        if spec.end_date < spec.start_date {
            failures.push(PrepaymentRowError {
                row,
                field: "end_date".into(),
                reason: format!(
                    "End date {} is before start date {}",
                    spec.end_date, spec.start_date
                ),
            });
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(EmiError::InvalidPrepaymentRows(failures))
    }
}

/// Resolve explicit rows over the loan's months. Overlapping rows add up.
pub fn resolve_specs(
    specs: &[PrepaymentSpec],
    loan_start: NaiveDate,
    total_months: u32,
) -> EmiResult<PrepaymentMap> {
    validate_specs(specs)?;

    let first = YearMonth::from_date(loan_start);
    let mut map = PrepaymentMap::new();
    for step in 0..total_months {
        let period = first.add_months(step);
        for spec in specs {
            if period.first_day_within(spec.start_date, spec.end_date) {
                map.add(period, spec.amount);
            }
        }
    }

    tracing::debug!(
        rows = specs.len(),
        months = map.len(),
        total = %map.total(),
        "explicit prepayments resolved"
    );
    Ok(map)
}

/// Resolve a named template. `emi` is the loan's scheduled installment.
pub fn resolve_template(
    template: PrepaymentTemplate,
    loan_start: NaiveDate,
    total_months: u32,
    emi: Money,
) -> PrepaymentMap {
    let first = YearMonth::from_date(loan_start);
    let map: PrepaymentMap = match template {
        PrepaymentTemplate::SixteenEmi => (0..total_months)
            .filter(|step| (step + 1) % SIXTEEN_EMI_INTERVAL == 0)
            .map(|step| (first.add_months(step), emi))
            .collect(),
    };

    tracing::debug!(%template, months = map.len(), "template prepayments resolved");
    map
}

pub fn resolve_prepayments(
    plan: &PrepaymentPlan,
    loan_start: NaiveDate,
    total_months: u32,
    emi: Money,
) -> EmiResult<PrepaymentMap> {
    match plan {
        PrepaymentPlan::Explicit(specs) => resolve_specs(specs, loan_start, total_months),
        PrepaymentPlan::Template(template) => {
            Ok(resolve_template(*template, loan_start, total_months, emi))
        }
    }
}

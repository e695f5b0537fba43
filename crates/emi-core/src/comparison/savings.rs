//! Before/after comparison of a baseline loan and its prepayment-adjusted
//! replay.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::snapshot::MetricsSnapshot;
use crate::error::EmiError;
use crate::types::{pct_of, with_metadata, ComputationOutput, Money};
use crate::EmiResult;

/// Whole years plus remaining months. Both parts carry the sign of the
/// total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenureReduction {
    pub years: i64,
    pub months: i64,
}

impl TenureReduction {
    pub fn from_months(total: i64) -> Self {
        Self {
            years: total / 12,
            months: total % 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsReport {
    pub interest_saved: Money,
    pub interest_saved_pct: Decimal,
    pub total_saved: Money,
    pub total_saved_pct: Decimal,
    pub inflation_loss_saved: Money,
    pub inflation_loss_saved_pct: Decimal,
    /// Baseline active months minus current active months. Negative means
    /// the adjusted loan runs longer than the baseline.
    pub tenure_reduction_months: i64,
    pub tenure_reduction: TenureReduction,
}

/// Compare a baseline snapshot against a current one.
pub fn compare(
    baseline: &MetricsSnapshot,
    current: &MetricsSnapshot,
) -> EmiResult<ComputationOutput<SavingsReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if baseline.principal != current.principal {
        return Err(EmiError::StructuralMismatch(format!(
            "cannot compare loans of principal {} and {}",
            baseline.principal, current.principal
        )));
    }

    let interest_saved = baseline.total_interest - current.total_interest;
    let total_saved = baseline.total_payment - current.total_payment;
    let inflation_loss_saved = baseline.inflation_adjusted_loss - current.inflation_adjusted_loss;

    let tenure_reduction_months = i64::from(baseline.schedule.active_months())
        - i64::from(current.schedule.active_months());
    if tenure_reduction_months < 0 {
        tracing::warn!(
            baseline_months = baseline.schedule.active_months(),
            current_months = current.schedule.active_months(),
            "adjusted schedule runs longer than baseline"
        );
        warnings.push(format!(
            "Adjusted schedule is {} months longer than the baseline",
            -tenure_reduction_months
        ));
    }
    if interest_saved < Decimal::ZERO {
        warnings.push("Adjusted schedule pays more interest than the baseline".into());
    }

    let report = SavingsReport {
        interest_saved,
        interest_saved_pct: pct_of(interest_saved, baseline.total_interest),
        total_saved,
        total_saved_pct: pct_of(total_saved, baseline.total_payment),
        inflation_loss_saved,
        inflation_loss_saved_pct: pct_of(inflation_loss_saved, baseline.inflation_adjusted_loss),
        tenure_reduction_months,
        tenure_reduction: TenureReduction::from_months(tenure_reduction_months),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Baseline vs prepayment-adjusted schedule comparison",
        &serde_json::json!({
            "baseline_months": baseline.schedule.active_months(),
            "current_months": current.schedule.active_months(),
        }),
        warnings,
        elapsed,
        report,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::{build_baseline, LoanTerms};
    use crate::calendar::{date_from_dmy, YearMonth};
    use crate::config::CalculatorConfig;
    use crate::prepayment::{apply_prepayments, PrepaymentMap};
    use rust_decimal_macros::dec;

    fn terms() -> LoanTerms {
        LoanTerms {
            principal: dec!(1_000_000),
            annual_rate_pct: dec!(8.5),
            tenure_months: 240,
            moratorium_months: 0,
            start_date: date_from_dmy(1, 4, 2025).unwrap(),
        }
    }

    fn snapshots(map: &PrepaymentMap) -> (MetricsSnapshot, MetricsSnapshot) {
        let t = terms();
        let config = CalculatorConfig::default();
        let schedule = build_baseline(&t).unwrap();
        let adjusted = apply_prepayments(&schedule, map, &t).unwrap();
        (
            MetricsSnapshot::baseline(&t, schedule, &config),
            MetricsSnapshot::current(&t, adjusted, &config),
        )
    }

    #[test]
    fn test_no_prepayment_saves_nothing() {
        let (base, cur) = snapshots(&PrepaymentMap::new());
        let out = compare(&base, &cur).unwrap();
        let r = &out.result;
        assert!(r.interest_saved.abs() < dec!(0.01));
        assert_eq!(r.tenure_reduction_months, 0);
        assert_eq!(r.tenure_reduction, TenureReduction { years: 0, months: 0 });
    }

    #[test]
    fn test_prepayment_savings_positive() {
        let mut map = PrepaymentMap::new();
        map.add(YearMonth::new(2026, 4).unwrap(), dec!(300_000));
        let (base, cur) = snapshots(&map);
        let r = compare(&base, &cur).unwrap().result;
        assert!(r.interest_saved > Decimal::ZERO);
        assert!(r.interest_saved_pct > Decimal::ZERO && r.interest_saved_pct < dec!(100));
        assert!(r.tenure_reduction_months > 0);
        assert!(r.inflation_loss_saved > Decimal::ZERO);
        assert_eq!(
            r.tenure_reduction.years * 12 + r.tenure_reduction.months,
            r.tenure_reduction_months
        );
    }

    #[test]
    fn test_zero_interest_baseline_has_zero_pct() {
        let mut t = terms();
        t.annual_rate_pct = Decimal::ZERO;
        let config = CalculatorConfig::default();
        let schedule = build_baseline(&t).unwrap();
        let base = MetricsSnapshot::baseline(&t, schedule.clone(), &config);
        let cur = MetricsSnapshot::current(&t, schedule, &config);
        let r = compare(&base, &cur).unwrap().result;
        assert_eq!(r.interest_saved_pct, Decimal::ZERO);
        assert_eq!(r.inflation_loss_saved_pct, Decimal::ZERO);
    }

    #[test]
    fn test_longer_current_schedule_surfaces_warning() {
        let mut map = PrepaymentMap::new();
        map.add(YearMonth::new(2026, 4).unwrap(), dec!(300_000));
        let (base, cur) = snapshots(&map);
        // Swap roles: the "current" loan is now the longer one.
        let out = compare(&cur, &base).unwrap();
        assert!(out.result.tenure_reduction_months < 0);
        assert!(out.warnings.iter().any(|w| w.contains("longer")));
    }

    #[test]
    fn test_principal_mismatch_rejected() {
        let (base, mut cur) = snapshots(&PrepaymentMap::new());
        cur.principal = dec!(1);
        assert!(matches!(
            compare(&base, &cur),
            Err(EmiError::StructuralMismatch(_))
        ));
    }

    #[test]
    fn test_tenure_reduction_split() {
        assert_eq!(
            TenureReduction::from_months(105),
            TenureReduction { years: 8, months: 9 }
        );
    }
}

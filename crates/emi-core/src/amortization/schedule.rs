//! Baseline month-by-month amortization schedule.
//!
//! Interest accrues on the opening balance of each month (reducing-balance
//! convention). Moratorium months capitalize that interest; amortizing months
//! pay the fixed EMI, of which everything above the interest reduces
//! principal.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::emi::compute_loan_emi;
use super::terms::{LoanTerms, MAX_LOAN_MONTHS};
use crate::calendar::YearMonth;
use crate::error::EmiError;
use crate::types::{Money, Rate};
use crate::EmiResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Balance below which the loan is considered fully repaid.
pub const BALANCE_EPSILON: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One calendar month of a loan's life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub period: YearMonth,
    /// Full English month name of `period`, for display.
    pub month_label: String,
    /// True while interest is being capitalized instead of paid.
    pub is_moratorium: bool,
    pub opening_balance: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    /// Scheduled EMI for the month, zero during the moratorium.
    pub installment_amount: Money,
    pub prepayment_amount: Money,
    /// `installment_amount + prepayment_amount`.
    pub total_payment_amount: Money,
    /// Balance after this month, clamped to zero once repaid.
    pub closing_balance: Money,
}

impl ScheduleEntry {
    pub(crate) fn new(period: YearMonth, is_moratorium: bool, opening_balance: Money) -> Self {
        Self {
            period,
            month_label: period.label().to_string(),
            is_moratorium,
            opening_balance,
            principal_component: Decimal::ZERO,
            interest_component: Decimal::ZERO,
            installment_amount: Decimal::ZERO,
            prepayment_amount: Decimal::ZERO,
            total_payment_amount: Decimal::ZERO,
            closing_balance: Decimal::ZERO,
        }
    }

    pub fn year(&self) -> i32 {
        self.period.year()
    }

    /// A month still counts toward the loan's life while money is owed or
    /// an installment falls due in it.
    pub fn is_active(&self) -> bool {
        self.closing_balance > Decimal::ZERO || self.installment_amount > Decimal::ZERO
    }
}

/// An ordered, immutable run of [`ScheduleEntry`] values, one per month
/// starting at the loan's first month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScheduleRecord")]
pub struct Schedule {
    emi: Money,
    moratorium_months: u32,
    active_months: u32,
    entries: Vec<ScheduleEntry>,
}

/// Wire form of a [`Schedule`]. Any serialized `active_months` is ignored
/// and recounted from the entries.
#[derive(Deserialize)]
struct ScheduleRecord {
    emi: Money,
    moratorium_months: u32,
    entries: Vec<ScheduleEntry>,
}

impl From<ScheduleRecord> for Schedule {
    fn from(record: ScheduleRecord) -> Self {
        Schedule::from_entries(record.emi, record.moratorium_months, record.entries)
    }
}

impl Schedule {
    pub(crate) fn from_entries(
        emi: Money,
        moratorium_months: u32,
        entries: Vec<ScheduleEntry>,
    ) -> Self {
        let active_months = entries.iter().filter(|e| e.is_active()).count() as u32;
        Self {
            emi,
            moratorium_months,
            active_months,
            entries,
        }
    }

    /// The scheduled installment for amortizing months.
    pub fn emi(&self) -> Money {
        self.emi
    }

    pub fn moratorium_months(&self) -> u32 {
        self.moratorium_months
    }

    /// Months that are active in the sense of [`ScheduleEntry::is_active`].
    pub fn active_months(&self) -> u32 {
        self.active_months
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first_period(&self) -> Option<YearMonth> {
        self.entries.first().map(|e| e.period)
    }

    pub fn last(&self) -> Option<&ScheduleEntry> {
        self.entries.last()
    }

    /// Amortizing months in which something was actually paid.
    pub fn months_paid(&self) -> u32 {
        self.entries
            .iter()
            .filter(|e| !e.is_moratorium && e.total_payment_amount > Decimal::ZERO)
            .count() as u32
    }

    pub fn total_interest(&self) -> Money {
        self.entries.iter().map(|e| e.interest_component).sum()
    }

    pub fn total_principal(&self) -> Money {
        self.entries.iter().map(|e| e.principal_component).sum()
    }

    pub fn total_prepayment(&self) -> Money {
        self.entries.iter().map(|e| e.prepayment_amount).sum()
    }

    pub fn total_payment(&self) -> Money {
        self.entries.iter().map(|e| e.total_payment_amount).sum()
    }

    /// First month whose closing balance is zero.
    pub fn payoff_period(&self) -> Option<YearMonth> {
        self.entries
            .iter()
            .find(|e| e.closing_balance.is_zero())
            .map(|e| e.period)
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate the baseline schedule: `moratorium_months + tenure_months`
/// entries starting at `start`.
pub fn generate_schedule(
    principal: Money,
    emi: Money,
    periodic_rate: Rate,
    tenure_months: u32,
    moratorium_months: u32,
    start: YearMonth,
) -> EmiResult<Schedule> {
    if principal <= Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if tenure_months == 0 {
        return Err(EmiError::InvalidInput {
            field: "tenure_months".into(),
            reason: "Tenure must be at least one month".into(),
        });
    }
    if periodic_rate < Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "periodic_rate".into(),
            reason: "Periodic rate cannot be negative".into(),
        });
    }

    let total_months = moratorium_months
        .checked_add(tenure_months)
        .filter(|total| *total <= MAX_LOAN_MONTHS)
        .ok_or_else(|| EmiError::InvalidInput {
            field: "tenure_months".into(),
            reason: format!("Moratorium plus tenure must not exceed {MAX_LOAN_MONTHS} months"),
        })?;

    let mut balance = principal;
    let mut entries = Vec::with_capacity(total_months as usize);

    for step in 0..total_months {
        let in_moratorium = step < moratorium_months;
        let mut entry = ScheduleEntry::new(start.add_months(step), in_moratorium, balance);
        let interest = balance * periodic_rate;
        entry.interest_component = interest;

        if in_moratorium {
            balance += interest;
        } else {
            let principal_component = emi - interest;
            balance -= principal_component;
            entry.principal_component = principal_component;
            entry.installment_amount = emi;
            entry.total_payment_amount = emi;
        }

        entry.closing_balance = clamp_balance(balance);
        entries.push(entry);
    }

    tracing::debug!(
        months = total_months,
        moratorium_months,
        %emi,
        "baseline schedule generated"
    );

    Ok(Schedule::from_entries(emi, moratorium_months, entries))
}

/// EMI plus baseline schedule for a set of loan terms.
pub fn build_baseline(terms: &LoanTerms) -> EmiResult<Schedule> {
    terms.validate()?;
    let emi = compute_loan_emi(terms)?;
    generate_schedule(
        terms.principal,
        emi,
        terms.monthly_rate(),
        terms.tenure_months,
        terms.moratorium_months,
        terms.start_period(),
    )
}

/// Display clamp: drift residue and negative balances read as zero.
pub(crate) fn clamp_balance(balance: Money) -> Money {
    if balance < BALANCE_EPSILON {
        Decimal::ZERO
    } else {
        balance
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::emi::compute_emi;
    use crate::calendar::date_from_dmy;

    const TOL: Decimal = dec!(0.01);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn home_loan() -> LoanTerms {
        LoanTerms {
            principal: dec!(1_000_000),
            annual_rate_pct: dec!(8.5),
            tenure_months: 240,
            moratorium_months: 0,
            start_date: date_from_dmy(17, 3, 2025).unwrap(),
        }
    }

    #[test]
    fn test_schedule_length_and_calendar() {
        let schedule = build_baseline(&home_loan()).unwrap();
        assert_eq!(schedule.len(), 240);
        let first = &schedule.entries()[0];
        assert_eq!(first.period, YearMonth::new(2025, 3).unwrap());
        assert_eq!(first.month_label, "March");
        let tenth = &schedule.entries()[10];
        assert_eq!(tenth.period, YearMonth::new(2026, 1).unwrap());
        assert_eq!(tenth.year(), 2026);
        let last = schedule.last().unwrap();
        assert_eq!(last.period, YearMonth::new(2045, 2).unwrap());
    }

    #[test]
    fn test_first_month_split() {
        let schedule = build_baseline(&home_loan()).unwrap();
        let first = &schedule.entries()[0];
        // 1,000,000 * 8.5% / 12 = 7,083.33
        assert_close(first.interest_component, dec!(7083.3333), TOL, "month 1 interest");
        assert_close(
            first.principal_component,
            dec!(8678.2323) - dec!(7083.3333),
            TOL,
            "month 1 principal",
        );
        assert_eq!(first.installment_amount, schedule.emi());
        assert_eq!(first.prepayment_amount, Decimal::ZERO);
    }

    #[test]
    fn test_full_amortization() {
        let schedule = build_baseline(&home_loan()).unwrap();
        assert_close(schedule.total_principal(), dec!(1_000_000), dec!(1), "principal repaid");
        assert_eq!(schedule.last().unwrap().closing_balance, Decimal::ZERO);
        assert_close(
            schedule.total_interest(),
            dec!(1_082_775.76),
            dec!(1),
            "lifetime interest",
        );
    }

    #[test]
    fn test_balance_monotonically_decreasing() {
        let schedule = build_baseline(&home_loan()).unwrap();
        for pair in schedule.entries().windows(2) {
            assert!(pair[1].closing_balance <= pair[0].closing_balance);
        }
    }

    #[test]
    fn test_moratorium_capitalizes_interest() {
        let mut terms = home_loan();
        terms.moratorium_months = 12;
        let schedule = build_baseline(&terms).unwrap();
        assert_eq!(schedule.len(), 252);

        let r = terms.monthly_rate();
        let expected = crate::amortization::emi::capitalize(terms.principal, r, 12).unwrap();
        let month_12 = &schedule.entries()[11];
        assert_close(month_12.closing_balance, expected, TOL, "balance after moratorium");

        for entry in &schedule.entries()[..12] {
            assert!(entry.is_moratorium);
            assert_eq!(entry.principal_component, Decimal::ZERO);
            assert_eq!(entry.installment_amount, Decimal::ZERO);
        }
        assert!(!schedule.entries()[12].is_moratorium);
        assert_eq!(schedule.last().unwrap().closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_schedule() {
        let mut terms = home_loan();
        terms.annual_rate_pct = Decimal::ZERO;
        terms.tenure_months = 10;
        terms.principal = dec!(50_000);
        let schedule = build_baseline(&terms).unwrap();
        for entry in schedule.entries() {
            assert_eq!(entry.interest_component, Decimal::ZERO);
            assert_eq!(entry.principal_component, dec!(5000));
        }
        assert_eq!(schedule.last().unwrap().closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_active_months_counts_whole_baseline() {
        let mut terms = home_loan();
        terms.moratorium_months = 6;
        let schedule = build_baseline(&terms).unwrap();
        assert_eq!(schedule.active_months(), 246);
        assert_eq!(schedule.months_paid(), 240);
    }

    #[test]
    fn test_huge_zero_rate_tenure_rejected_before_allocation() {
        let mut terms = home_loan();
        terms.annual_rate_pct = Decimal::ZERO;
        terms.principal = dec!(100_000);
        terms.tenure_months = u32::MAX - 1;
        assert!(matches!(
            build_baseline(&terms),
            Err(EmiError::InvalidInput { .. })
        ));

        let start = YearMonth::new(2025, 1).unwrap();
        let direct =
            generate_schedule(dec!(100_000), dec!(1), Decimal::ZERO, u32::MAX - 1, 0, start);
        assert!(matches!(direct, Err(EmiError::InvalidInput { .. })));
    }

    #[test]
    fn test_deserialized_schedule_recounts_active_months() {
        let schedule = build_baseline(&home_loan()).unwrap();
        let mut json = serde_json::to_value(&schedule).unwrap();
        assert_eq!(json["active_months"], 240);
        json["active_months"] = serde_json::json!(7);

        let restored: Schedule = serde_json::from_value(json).unwrap();
        assert_eq!(restored.active_months(), 240);
        assert_eq!(restored, schedule);
    }

    #[test]
    fn test_generate_schedule_rejects_zero_tenure() {
        let emi = compute_emi(dec!(1000), dec!(0.01), 12).unwrap();
        let start = YearMonth::new(2025, 1).unwrap();
        assert!(generate_schedule(dec!(1000), emi, dec!(0.01), 0, 0, start).is_err());
    }
}

use emi_core::amortization::{build_baseline, compute_loan_emi, LoanTerms};
use emi_core::calendar::{date_from_dmy, YearMonth};
use emi_core::prepayment::{
    apply_prepayments, resolve_prepayments, resolve_specs, resolve_template, PrepaymentMap,
    PrepaymentPlan, PrepaymentSpec, PrepaymentTemplate,
};
use emi_core::EmiError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn car_loan() -> LoanTerms {
    LoanTerms {
        principal: dec!(300_000),
        annual_rate_pct: dec!(9),
        tenure_months: 36,
        moratorium_months: 0,
        start_date: date_from_dmy(1, 1, 2025).unwrap(),
    }
}

fn spec(start: NaiveDmy, end: NaiveDmy, amount: Decimal) -> PrepaymentSpec {
    PrepaymentSpec {
        start_date: date_from_dmy(start.0, start.1, start.2).unwrap(),
        end_date: date_from_dmy(end.0, end.1, end.2).unwrap(),
        amount,
    }
}

type NaiveDmy = (u32, u32, i32);

// ===========================================================================
// Resolver
// ===========================================================================

#[test]
fn test_disjoint_specs_resolve_to_union() {
    let loan = car_loan();
    let a = spec((1, 2, 2025), (30, 4, 2025), dec!(5_000));
    let b = spec((1, 9, 2025), (31, 10, 2025), dec!(7_500));

    let map_a = resolve_specs(&[a.clone()], loan.start_date, 36).unwrap();
    let map_b = resolve_specs(&[b.clone()], loan.start_date, 36).unwrap();
    let both = resolve_specs(&[a, b], loan.start_date, 36).unwrap();

    assert_eq!(both, map_a.merged(&map_b));
    assert_eq!(both.len(), 5);
}

#[test]
fn test_overlapping_specs_sum_on_shared_month() {
    let loan = car_loan();
    let specs = vec![
        spec((1, 3, 2025), (1, 3, 2025), dec!(1_000)),
        spec((1, 3, 2025), (31, 3, 2025), dec!(2_000)),
    ];
    let map = resolve_specs(&specs, loan.start_date, 36).unwrap();
    assert_eq!(map.amount_for(YearMonth::new(2025, 3).unwrap()), dec!(3_000));
}

#[test]
fn test_sixteen_emi_rule_on_36_month_loan() {
    let loan = car_loan();
    let emi = build_baseline(&loan).unwrap().emi();
    let map = resolve_template(PrepaymentTemplate::SixteenEmi, loan.start_date, 36, emi);

    let hits: Vec<u32> = (0..36u32)
        .filter(|step| !map.amount_for(loan.start_period().add_months(*step)).is_zero())
        .map(|step| step + 1)
        .collect();
    assert_eq!(hits, vec![3, 6, 9, 12, 15, 18, 21, 24, 27, 30, 33, 36]);
    assert!(map.iter().all(|(_, amount)| *amount == emi));
}

#[test]
fn test_invalid_rows_block_whole_plan() {
    let loan = car_loan();
    let plan = PrepaymentPlan::Explicit(vec![
        spec((1, 2, 2025), (30, 4, 2025), dec!(5_000)),
        spec((1, 5, 2025), (30, 4, 2025), dec!(5_000)),
    ]);
    let err = resolve_prepayments(&plan, loan.start_date, 36, dec!(1)).unwrap_err();
    match err {
        EmiError::InvalidPrepaymentRows(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].row, 1);
        }
        other => panic!("Expected InvalidPrepaymentRows, got {other:?}"),
    }
}

#[test]
fn test_template_for_invalid_terms_fails_before_resolution() {
    let mut loan = car_loan();
    loan.principal = dec!(-100_000);
    let err = compute_loan_emi(&loan)
        .and_then(|emi| {
            resolve_prepayments(
                &PrepaymentPlan::Template(PrepaymentTemplate::SixteenEmi),
                loan.start_date,
                loan.total_months(),
                emi,
            )
        })
        .unwrap_err();
    assert!(matches!(err, EmiError::InvalidInput { .. }));
}

// ===========================================================================
// Recalculation engine
// ===========================================================================

#[test]
fn test_early_payoff_truncates_at_month_k() {
    let loan = car_loan();
    let baseline = build_baseline(&loan).unwrap();
    for k in [1u32, 7, 20, 35] {
        let mut map = PrepaymentMap::new();
        map.add(loan.start_period().add_months(k - 1), dec!(1_000_000));
        let adjusted = apply_prepayments(&baseline, &map, &loan).unwrap();

        assert_eq!(adjusted.len(), k as usize, "payoff month {k}");
        let last = adjusted.last().unwrap();
        assert_eq!(last.closing_balance, Decimal::ZERO);
        let owed = last.opening_balance + last.interest_component;
        assert!(
            (last.total_payment_amount - owed).abs() < dec!(0.000001),
            "month {k}: paid {} but owed {}",
            last.total_payment_amount,
            owed
        );
    }
}

#[test]
fn test_sixteen_emi_plan_end_to_end() {
    let loan = LoanTerms {
        principal: dec!(1_000_000),
        annual_rate_pct: dec!(8.5),
        tenure_months: 240,
        moratorium_months: 0,
        start_date: date_from_dmy(1, 1, 2025).unwrap(),
    };
    let baseline = build_baseline(&loan).unwrap();
    let plan = PrepaymentPlan::Template(PrepaymentTemplate::SixteenEmi);
    let map = resolve_prepayments(&plan, loan.start_date, loan.total_months(), baseline.emi())
        .unwrap();
    let adjusted = apply_prepayments(&baseline, &map, &loan).unwrap();

    assert_eq!(adjusted.len(), 135);
    assert!((adjusted.total_interest() - dec!(557_319.59)).abs() < dec!(1));
    for entry in adjusted.entries() {
        assert_eq!(
            entry.total_payment_amount,
            entry.installment_amount + entry.prepayment_amount
        );
    }
}

#[test]
fn test_adjusted_balances_never_increase_after_moratorium() {
    let mut loan = car_loan();
    loan.moratorium_months = 3;
    let baseline = build_baseline(&loan).unwrap();
    let plan = PrepaymentPlan::Explicit(vec![spec((1, 1, 2025), (31, 12, 2026), dec!(4_000))]);
    let map = resolve_prepayments(&plan, loan.start_date, loan.total_months(), baseline.emi())
        .unwrap();
    let adjusted = apply_prepayments(&baseline, &map, &loan).unwrap();

    let amortizing = &adjusted.entries()[3..];
    for pair in amortizing.windows(2) {
        assert!(pair[1].closing_balance <= pair[0].closing_balance);
    }
    assert_eq!(adjusted.last().unwrap().closing_balance, Decimal::ZERO);
    assert!(adjusted.entries()[..3]
        .iter()
        .all(|e| e.prepayment_amount.is_zero()));
}

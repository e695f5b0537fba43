//! Replays a loan month by month with prepayments injected.
//!
//! The running balance is re-derived from the loan principal rather than
//! read from the baseline's closing balances, so the adjusted schedule does
//! not inherit the baseline's rounding. Once the balance reaches zero every
//! later month is a zeroed placeholder; [`apply_prepayments`] drops those.

use rust_decimal::Decimal;

use super::PrepaymentMap;
use crate::amortization::schedule::{clamp_balance, BALANCE_EPSILON};
use crate::amortization::{LoanTerms, Schedule, ScheduleEntry};
use crate::error::EmiError;
use crate::EmiResult;

/// Replay the loan over the baseline's full length with `prepayments`
/// applied, keeping zeroed placeholder months after payoff.
pub fn replay_with_prepayments(
    baseline: &Schedule,
    prepayments: &PrepaymentMap,
    terms: &LoanTerms,
) -> EmiResult<Schedule> {
    terms.validate()?;
    check_structure(baseline, terms)?;

    let rate = terms.monthly_rate();
    let emi = baseline.emi();
    let moratorium = terms.moratorium_months;
    let start = terms.start_period();

    let mut balance = terms.principal;
    let mut closed = false;
    let mut entries = Vec::with_capacity(baseline.len());

    for step in 0..terms.total_months() {
        let period = start.add_months(step);
        let in_moratorium = step < moratorium;
        let mut entry = ScheduleEntry::new(period, in_moratorium, balance);

        if closed {
            entries.push(entry);
            continue;
        }

        let interest = balance * rate;
        entry.interest_component = interest;

        if in_moratorium {
            balance += interest;
            entry.closing_balance = balance;
            if !prepayments.amount_for(period).is_zero() {
                tracing::debug!(%period, "prepayment during moratorium ignored");
            }
            entries.push(entry);
            continue;
        }

        let principal_from_emi = (emi - interest).max(Decimal::ZERO);
        let prepayment = prepayments.amount_for(period);
        let total_reduction = principal_from_emi + prepayment;

        if total_reduction >= balance {
            // Settle exactly the outstanding balance, EMI principal first.
            let principal_part = principal_from_emi.min(balance);
            let prepayment_part = balance - principal_part;
            entry.principal_component = principal_part;
            entry.prepayment_amount = prepayment_part;
            entry.installment_amount = principal_part + interest;
            balance = Decimal::ZERO;
            closed = true;
        } else {
            balance -= total_reduction;
            entry.principal_component = principal_from_emi;
            entry.prepayment_amount = prepayment;
            entry.installment_amount = emi;
            if balance < BALANCE_EPSILON {
                entry.principal_component += balance;
                balance = Decimal::ZERO;
                closed = true;
            }
        }

        entry.total_payment_amount = entry.installment_amount + entry.prepayment_amount;
        entry.closing_balance = clamp_balance(balance);
        entries.push(entry);
    }

    Ok(Schedule::from_entries(emi, moratorium, entries))
}

/// Drop every month after the first one that closes at a zero balance.
pub fn truncate_at_payoff(schedule: &Schedule) -> Schedule {
    let entries = schedule.entries();
    let keep = entries
        .iter()
        .position(|e| e.closing_balance.is_zero())
        .map_or(entries.len(), |idx| idx + 1);
    Schedule::from_entries(
        schedule.emi(),
        schedule.moratorium_months(),
        entries[..keep].to_vec(),
    )
}

/// Replay with prepayments and cut the schedule at payoff.
pub fn apply_prepayments(
    baseline: &Schedule,
    prepayments: &PrepaymentMap,
    terms: &LoanTerms,
) -> EmiResult<Schedule> {
    let replayed = replay_with_prepayments(baseline, prepayments, terms)?;
    let adjusted = truncate_at_payoff(&replayed);

    tracing::debug!(
        baseline_months = baseline.len(),
        adjusted_months = adjusted.len(),
        prepaid = %adjusted.total_prepayment(),
        "prepayments applied"
    );
    Ok(adjusted)
}

fn check_structure(baseline: &Schedule, terms: &LoanTerms) -> EmiResult<()> {
    if baseline.len() != terms.total_months() as usize {
        return Err(EmiError::StructuralMismatch(format!(
            "baseline has {} months but terms describe {}",
            baseline.len(),
            terms.total_months()
        )));
    }
    if baseline.moratorium_months() != terms.moratorium_months {
        return Err(EmiError::StructuralMismatch(format!(
            "baseline moratorium is {} months but terms say {}",
            baseline.moratorium_months(),
            terms.moratorium_months
        )));
    }
    if baseline.first_period() != Some(terms.start_period()) {
        return Err(EmiError::StructuralMismatch(format!(
            "baseline does not start in the loan's first month {}",
            terms.start_period()
        )));
    }
    if baseline.emi() <= Decimal::ZERO {
        return Err(EmiError::StructuralMismatch(
            "baseline EMI must be positive".into(),
        ));
    }
    Ok(())
}

//! Calendar-year roll-up of a schedule.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schedule::Schedule;
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: i32,
    pub months: u32,
    pub principal: Money,
    pub interest: Money,
    pub prepayment: Money,
    pub total_payment: Money,
    /// Closing balance of the year's last month in the schedule.
    pub closing_balance: Money,
}

/// One row per calendar year present in `schedule`, in schedule order.
pub fn summarize_by_year(schedule: &Schedule) -> Vec<YearSummary> {
    let mut years: Vec<YearSummary> = Vec::new();

    for entry in schedule.entries() {
        let needs_row = years.last().map_or(true, |y| y.year != entry.year());
        if needs_row {
            years.push(YearSummary {
                year: entry.year(),
                months: 0,
                principal: Decimal::ZERO,
                interest: Decimal::ZERO,
                prepayment: Decimal::ZERO,
                total_payment: Decimal::ZERO,
                closing_balance: Decimal::ZERO,
            });
        }
        if let Some(row) = years.last_mut() {
            row.months += 1;
            row.principal += entry.principal_component;
            row.interest += entry.interest_component;
            row.prepayment += entry.prepayment_amount;
            row.total_payment += entry.total_payment_amount;
            row.closing_balance = entry.closing_balance;
        }
    }

    years
}

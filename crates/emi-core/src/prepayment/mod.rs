//! Prepayment plans, their month-keyed resolution, and schedule replay.

pub mod recalculation;
pub mod rules;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::calendar::YearMonth;
use crate::error::EmiError;
use crate::types::Money;

pub use recalculation::{apply_prepayments, replay_with_prepayments, truncate_at_payoff};
pub use rules::{resolve_prepayments, resolve_specs, resolve_template, validate_specs};

/// `amount` paid in every calendar month whose first day lies in
/// `[start_date, end_date]`. The amount repeats each month; it is not
/// spread across the range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentSpec {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub amount: Money,
}

/// Named prepayment disciplines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrepaymentTemplate {
    /// One extra EMI every third month, i.e. 16 installments a year.
    #[serde(rename = "16-emi")]
    SixteenEmi,
}

impl fmt::Display for PrepaymentTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrepaymentTemplate::SixteenEmi => write!(f, "16-emi"),
        }
    }
}

impl FromStr for PrepaymentTemplate {
    type Err = EmiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "16-emi" | "16emi" | "sixteen-emi" => Ok(PrepaymentTemplate::SixteenEmi),
            other => Err(EmiError::InvalidInput {
                field: "template".into(),
                reason: format!("unknown prepayment template '{other}'"),
            }),
        }
    }
}

/// Either explicit date-range rows or a named template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepaymentPlan {
    Explicit(Vec<PrepaymentSpec>),
    Template(PrepaymentTemplate),
}

/// Cumulative prepayment per calendar month. Months absent from the map
/// carry no prepayment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrepaymentMap(BTreeMap<YearMonth, Money>);

impl PrepaymentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` on top of whatever `period` already holds.
    pub fn add(&mut self, period: YearMonth, amount: Money) {
        *self.0.entry(period).or_insert(Decimal::ZERO) += amount;
    }

    pub fn amount_for(&self, period: YearMonth) -> Money {
        self.0.get(&period).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&YearMonth, &Money)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> Money {
        self.0.values().copied().sum()
    }

    /// Month-wise sum of two maps.
    pub fn merged(&self, other: &PrepaymentMap) -> PrepaymentMap {
        let mut out = self.clone();
        for (period, amount) in other.iter() {
            out.add(*period, *amount);
        }
        out
    }
}

impl FromIterator<(YearMonth, Money)> for PrepaymentMap {
    fn from_iter<I: IntoIterator<Item = (YearMonth, Money)>>(iter: I) -> Self {
        let mut map = PrepaymentMap::new();
        for (period, amount) in iter {
            map.add(period, amount);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_map_add_accumulates() {
        let period = YearMonth::new(2025, 6).unwrap();
        let mut map = PrepaymentMap::new();
        map.add(period, dec!(10_000));
        map.add(period, dec!(5_000));
        assert_eq!(map.amount_for(period), dec!(15_000));
        assert_eq!(map.amount_for(period.next()), Decimal::ZERO);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_map_serializes_with_year_month_keys() {
        let map: PrepaymentMap = [(YearMonth::new(2025, 6).unwrap(), dec!(100))]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, serde_json::json!({ "2025-06": "100" }));
    }

    #[test]
    fn test_template_parse_and_display() {
        let t: PrepaymentTemplate = "16-EMI".parse().unwrap();
        assert_eq!(t, PrepaymentTemplate::SixteenEmi);
        assert_eq!(t.to_string(), "16-emi");
        assert!("quarterly".parse::<PrepaymentTemplate>().is_err());
    }

    #[test]
    fn test_plan_json_shape() {
        let plan: PrepaymentPlan = serde_json::from_str(r#"{"template":"16-emi"}"#).unwrap();
        assert_eq!(plan, PrepaymentPlan::Template(PrepaymentTemplate::SixteenEmi));

        let plan: PrepaymentPlan = serde_json::from_str(
            r#"{"explicit":[{"start_date":"2025-04-01","end_date":"2025-06-30","amount":"25000"}]}"#,
        )
        .unwrap();
        match plan {
            PrepaymentPlan::Explicit(specs) => assert_eq!(specs[0].amount, dec!(25000)),
            other => panic!("Expected explicit plan, got {other:?}"),
        }
    }
}

//! Calendar months as structured `(year, month)` values.
//!
//! Schedules, prepayment maps and comparisons all key on [`YearMonth`]
//! rather than on month names, so no string round-tripping happens inside
//! the engine. Month names only appear as presentation labels.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EmiError;
use crate::EmiResult;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month. Serialized as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> EmiResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EmiError::DateError(format!(
                "month {month} is outside 1-12"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1 = January.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn label(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    pub fn add_months(&self, months: u32) -> Self {
        let zero_based = i64::from(self.month - 1) + i64::from(months);
        Self {
            year: self.year + (zero_based / 12) as i32,
            month: (zero_based % 12) as u32 + 1,
        }
    }

    pub fn next(&self) -> Self {
        self.add_months(1)
    }

    /// Signed number of months from `earlier` to `self`.
    pub fn months_since(&self, earlier: YearMonth) -> i64 {
        (i64::from(self.year) - i64::from(earlier.year)) * 12 + i64::from(self.month)
            - i64::from(earlier.month)
    }

    /// Whether the first day of this month lies inside `[start, end]`.
    pub fn first_day_within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        let first_covered = if start.day() == 1 {
            YearMonth::from_date(start)
        } else {
            YearMonth::from_date(start).next()
        };
        *self >= first_covered && *self <= YearMonth::from_date(end)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = EmiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .rsplit_once('-')
            .ok_or_else(|| EmiError::DateError(format!("'{s}' is not in YYYY-MM form")))?;
        let year: i32 = year
            .parse()
            .map_err(|_| EmiError::DateError(format!("invalid year in '{s}'")))?;
        let month: u32 = month
            .parse()
            .map_err(|_| EmiError::DateError(format!("invalid month in '{s}'")))?;
        YearMonth::new(year, month)
    }
}

impl From<YearMonth> for String {
    fn from(ym: YearMonth) -> Self {
        ym.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = EmiError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Build a calendar date from discrete day, month and year components.
pub fn date_from_dmy(day: u32, month: u32, year: i32) -> EmiResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        EmiError::DateError(format!("{day:02}-{month:02}-{year:04} is not a calendar date"))
    })
}

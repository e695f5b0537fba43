//! Calculator-wide settings that are not part of a loan's own terms.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::EmiError;
use crate::EmiResult;

/// Reference annual inflation rate, in percent.
pub const DEFAULT_INFLATION_RATE_PCT: Decimal = dec!(5.85);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Annual inflation used to derive the real rate for the
    /// inflation-adjusted loss (5.85 = 5.85%).
    pub inflation_rate_pct: Decimal,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            inflation_rate_pct: DEFAULT_INFLATION_RATE_PCT,
        }
    }
}

impl CalculatorConfig {
    pub fn with_inflation_rate_pct(inflation_rate_pct: Decimal) -> EmiResult<Self> {
        let config = Self { inflation_rate_pct };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EmiResult<()> {
        if self.inflation_rate_pct < Decimal::ZERO {
            return Err(EmiError::InvalidInput {
                field: "inflation_rate_pct".into(),
                reason: "Inflation rate cannot be negative".into(),
            });
        }
        Ok(())
    }
}

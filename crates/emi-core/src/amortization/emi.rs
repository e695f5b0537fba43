//! Equated monthly installment (EMI) formula.
//!
//! Level-payment annuity math with the zero-rate and moratorium cases made
//! explicit. Overflow anywhere in the power or product is reported as
//! [`EmiError::NumericDegeneracy`] instead of leaking a meaningless figure.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use super::terms::LoanTerms;
use crate::error::EmiError;
use crate::types::{Money, Rate};
use crate::EmiResult;

/// Fixed installment repaying `principal` over `term_count` periods at
/// `periodic_rate`: `P * r * (1+r)^n / ((1+r)^n - 1)`, or `P / n` when
/// the rate is zero.
pub fn compute_emi(principal: Money, periodic_rate: Rate, term_count: u32) -> EmiResult<Money> {
    if principal <= Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if term_count == 0 {
        return Err(EmiError::InvalidInput {
            field: "term_count".into(),
            reason: "Number of installments must be > 0".into(),
        });
    }
    if periodic_rate < Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "periodic_rate".into(),
            reason: "Periodic rate cannot be negative".into(),
        });
    }

    let n = Decimal::from(term_count);
    if periodic_rate.is_zero() {
        return Ok(principal / n);
    }

    let factor = growth_factor(periodic_rate, term_count, "EMI growth factor")?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(EmiError::NumericDegeneracy {
            context: "EMI annuity denominator".into(),
        });
    }

    principal
        .checked_mul(periodic_rate)
        .and_then(|p| p.checked_mul(factor))
        .and_then(|p| p.checked_div(denominator))
        .ok_or_else(|| EmiError::NumericDegeneracy {
            context: "EMI annuity product".into(),
        })
}

/// Balance after `months` of capitalized interest: `P * (1+r)^m`.
pub fn capitalize(principal: Money, periodic_rate: Rate, months: u32) -> EmiResult<Money> {
    if months == 0 || periodic_rate.is_zero() {
        return Ok(principal);
    }
    let factor = growth_factor(periodic_rate, months, "moratorium capitalization")?;
    principal
        .checked_mul(factor)
        .ok_or_else(|| EmiError::NumericDegeneracy {
            context: "moratorium capitalization".into(),
        })
}

/// EMI for a loan, amortizing the moratorium-capitalized principal over
/// the tenure. The terms are validated first.
pub fn compute_loan_emi(terms: &LoanTerms) -> EmiResult<Money> {
    terms.validate()?;
    let rate = terms.monthly_rate();
    let effective_principal = capitalize(terms.principal, rate, terms.moratorium_months)?;
    compute_emi(effective_principal, rate, terms.tenure_months)
}

fn growth_factor(periodic_rate: Rate, periods: u32, context: &str) -> EmiResult<Decimal> {
    (Decimal::ONE + periodic_rate)
        .checked_powu(u64::from(periods))
        .ok_or_else(|| EmiError::NumericDegeneracy {
            context: context.to_string(),
        })
}

//! Inflation-adjusted loss: what the loan would cost at a real
//! (inflation-discounted) rate instead of the nominal one.

use rust_decimal::Decimal;

use crate::amortization::emi::compute_emi;
use crate::amortization::terms::monthly_rate_from_pct;
use crate::types::Money;

/// `hypothetical_emi * term_months - principal` at
/// `max(0, annual_rate_pct - inflation_rate_pct)`, floored at zero.
///
/// A zero real rate means no loss. A degenerate EMI at the real rate is
/// logged and read as zero rather than surfaced.
pub fn inflation_adjusted_loss(
    principal: Money,
    annual_rate_pct: Decimal,
    term_months: u32,
    inflation_rate_pct: Decimal,
) -> Money {
    let real_rate_pct = (annual_rate_pct - inflation_rate_pct).max(Decimal::ZERO);
    if real_rate_pct.is_zero() || term_months == 0 {
        return Decimal::ZERO;
    }

    let real_monthly = monthly_rate_from_pct(real_rate_pct);
    match compute_emi(principal, real_monthly, term_months) {
        Ok(emi) => emi
            .checked_mul(Decimal::from(term_months))
            .map(|paid| (paid - principal).max(Decimal::ZERO))
            .unwrap_or_else(|| {
                tracing::warn!(term_months, "inflation loss overflowed; reporting zero");
                Decimal::ZERO
            }),
        Err(e) => {
            tracing::warn!(error = %e, "inflation loss not computable; reporting zero");
            Decimal::ZERO
        }
    }
}

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::deal::RepaymentPolicy;
use crate::types::{Money, Rate};

/// Annual annuity factor `r / (1 - (1 + r)^-n)`.
///
/// A zero rate spreads the loan evenly (`1 / n`). If `(1 + r)^n` overflows the
/// factor is indistinguishable from the perpetuity limit `r`. Zero for `n == 0`.
pub fn annuity_factor(rate: Rate, term_years: u32) -> Decimal {
    if term_years == 0 {
        return Decimal::ZERO;
    }
    let rate = rate.max(Decimal::ZERO);
    if rate.is_zero() {
        return Decimal::ONE / Decimal::from(term_years);
    }
    match (Decimal::ONE + rate).checked_powi(i64::from(term_years)) {
        Some(compound) if compound > Decimal::ONE => rate * compound / (compound - Decimal::ONE),
        _ => rate,
    }
}

/// Monthly instalment of the approximate annuity:
/// `principal * (rate + initial_amortization) / 12`, never negative.
pub fn approximate_monthly_payment(
    principal: Money,
    annual_rate: Rate,
    initial_amortization_rate: Rate,
) -> Money {
    (principal * (annual_rate.max(Decimal::ZERO) + initial_amortization_rate) / dec!(12))
        .max(Decimal::ZERO)
}

/// First-year debt service per unit of loan under `policy`.
///
/// `None` when the policy services nothing (rate plus amortization not
/// positive, or a zero term), which is exactly when a break-even price or
/// rent has no meaning.
pub fn annual_debt_service_factor(annual_rate: Rate, policy: &RepaymentPolicy) -> Option<Decimal> {
    let factor = match policy {
        RepaymentPolicy::ApproximateAnnuity {
            initial_amortization_rate,
        } => annual_rate + *initial_amortization_rate,
        RepaymentPolicy::ExactAnnuity { term_years } => annuity_factor(annual_rate, *term_years),
    };
    (factor > Decimal::ZERO).then_some(factor)
}

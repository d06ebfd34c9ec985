use rust_decimal::{Decimal, MathematicalOps};

use crate::deal::{DepreciationMethod, DepreciationPolicy};
use crate::numeric::{clamp01, pro_rata_factor};
use crate::types::Money;

/// Depreciation of a single strand in its own year `year` (1-based).
///
/// Zero outside `1..=useful_life_years` and for any non-positive base, life or
/// (where used) rate. `auto_switch_to_linear` is not applied: no switch-over
/// rule is defined for the declining-balance strand.
pub fn strand_amount(base: Money, policy: &DepreciationPolicy, year: u32) -> Money {
    let life = policy.useful_life_years;
    if base <= Decimal::ZERO || life == 0 || year == 0 || year > life {
        return Decimal::ZERO;
    }

    let raw = match policy.method {
        DepreciationMethod::Linear => base / Decimal::from(life),
        DepreciationMethod::DecliningBalance => declining(base, policy, year),
        DepreciationMethod::Combined => combined(base, policy, year),
    };

    let factor = if year == 1 {
        pro_rata_factor(policy.pro_rata, policy.start_month)
    } else {
        Decimal::ONE
    };
    (raw * factor).max(Decimal::ZERO)
}

/// Linear share of a special allowance in its own year `year`.
pub fn allowance_amount(
    amount: Money,
    years: u32,
    pro_rata: bool,
    start_month: Option<u32>,
    year: u32,
) -> Money {
    if amount <= Decimal::ZERO || years == 0 || year == 0 || year > years {
        return Decimal::ZERO;
    }
    let yearly = amount / Decimal::from(years);
    if year == 1 {
        yearly * pro_rata_factor(pro_rata, start_month)
    } else {
        yearly
    }
}

fn declining(base: Money, policy: &DepreciationPolicy, year: u32) -> Money {
    let rate = clamp01(policy.declining_rate);
    if rate.is_zero() {
        return Decimal::ZERO;
    }
    base * rate * (Decimal::ONE - rate).powi(i64::from(year) - 1)
}

fn combined(base: Money, policy: &DepreciationPolicy, year: u32) -> Money {
    let life = policy.useful_life_years;
    let linear_years = policy.linear_years.min(life);
    let linear = base / Decimal::from(life);

    if year <= linear_years {
        return linear;
    }

    let residual = (base - linear * Decimal::from(linear_years)).max(Decimal::ZERO);
    let rate = clamp01(policy.declining_rate);
    if rate.is_zero() {
        return Decimal::ZERO;
    }
    let phase_year = year - linear_years;
    residual * rate * (Decimal::ONE - rate).powi(i64::from(phase_year) - 1)
}

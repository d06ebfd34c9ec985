use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Currency, Money, Rate};

/// Locale used for display formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberLocale {
    /// `1.234,56 €`, `5,80 %`
    #[default]
    De,
    /// `€1,234.56`, `5.80%`
    En,
}

pub fn clamp(value: Decimal, min: Decimal, max: Decimal) -> Decimal {
    value.max(min).min(max)
}

pub fn clamp01(value: Decimal) -> Decimal {
    clamp(value, Decimal::ZERO, Decimal::ONE)
}

/// Round half away from zero to `dp` decimal places.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_currency(value: Money) -> Money {
    round_to(value, 2)
}

/// `numerator / denominator`, or zero when the denominator is zero.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Share of the first year held when acquiring in `start_month`:
/// `(13 - month) / 12`. Disabled or missing month gives a full year.
pub fn pro_rata_factor(enabled: bool, start_month: Option<u32>) -> Decimal {
    match (enabled, start_month) {
        (true, Some(month)) => {
            let month = month.clamp(1, 12);
            Decimal::from(13 - month) / dec!(12)
        }
        _ => Decimal::ONE,
    }
}

/// Convert a float from an untyped caller, replacing NaN and infinities.
pub fn from_f64_or(value: f64, fallback: Decimal) -> Decimal {
    if !value.is_finite() {
        return fallback;
    }
    Decimal::from_f64(value).unwrap_or(fallback)
}

pub fn format_currency(value: Money, currency: Currency, locale: NumberLocale) -> String {
    let rounded = round_currency(value);
    let body = group_digits(rounded.abs(), 2, locale);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match locale {
        NumberLocale::De => format!("{sign}{body} {}", currency.symbol()),
        NumberLocale::En => match currency {
            Currency::CHF => format!("{sign}CHF {body}"),
            _ => format!("{sign}{}{body}", currency.symbol()),
        },
    }
}

pub fn format_percent(rate: Rate, decimals: u32, locale: NumberLocale) -> String {
    let pct = round_to(rate * dec!(100), decimals);
    let sign = if pct.is_sign_negative() && !pct.is_zero() {
        "-"
    } else {
        ""
    };
    let body = group_digits(pct.abs(), decimals, locale);
    match locale {
        NumberLocale::De => format!("{sign}{body} %"),
        NumberLocale::En => format!("{sign}{body}%"),
    }
}

fn group_digits(value: Decimal, decimals: u32, locale: NumberLocale) -> String {
    let (group_sep, decimal_sep) = match locale {
        NumberLocale::De => ('.', ','),
        NumberLocale::En => (',', '.'),
    };
    let fixed = format!("{:.*}", decimals as usize, value);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (fixed, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) if decimals > 0 => format!("{grouped}{decimal_sep}{frac}"),
        _ => grouped,
    }
}

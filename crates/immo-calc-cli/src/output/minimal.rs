use serde_json::Value;

use super::format_scalar;

/// Headline fields in order of priority; dotted paths reach into nested
/// results (e.g. the verdict of a full analysis).
const PRIORITY_PATHS: [&str; 12] = [
    "valuation.score.verdict",
    "deltas.monthly_cash_flow",
    "verdict",
    "break_even_price",
    "monthly_cash_flow",
    "all_in_price",
    "annual_gross_rent",
    "periodic_payment",
    "total_depreciation",
    "modeled_value",
    "totals.cash_flow",
    "score.score",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for path in PRIORITY_PATHS {
        if let Some(val) = lookup(result, path) {
            if !val.is_null() {
                println!("{}", format_scalar(val));
                return;
            }
        }
    }

    if let Some((key, val)) = result.as_object().and_then(|m| m.iter().next()) {
        println!("{}: {}", key, format_scalar(val));
        return;
    }

    println!("{}", format_scalar(result));
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

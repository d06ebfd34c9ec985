pub mod amortization;
pub mod analysis;
pub mod depreciation;
pub mod projection;
pub mod purchase_costs;
pub mod rent_roll;
pub mod valuation;

use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use immo_calc_core::types::with_metadata;

/// Wrap a plain engine result in the standard output envelope.
pub(crate) fn envelope<I: Serialize, T: Serialize>(
    methodology: &str,
    input: &I,
    warnings: Vec<String>,
    started: Instant,
    result: T,
) -> Result<Value, Box<dyn std::error::Error>> {
    let elapsed = started.elapsed().as_micros() as u64;
    Ok(serde_json::to_value(with_metadata(
        methodology,
        input,
        warnings,
        elapsed,
        result,
    ))?)
}

use clap::Args;
use serde_json::Value;
use std::time::Instant;

use immo_calc_core::deal::PropertyDeal;
use immo_calc_core::depreciation::{compute_depreciation_schedule, is_effective};

use super::envelope;
use crate::input;

/// Arguments for a depreciation (AfA) schedule
#[derive(Args)]
pub struct DepreciateArgs {
    /// Path to a JSON or YAML deal snapshot
    #[arg(long)]
    pub input: Option<String>,

    /// Years to schedule (defaults to the deal's horizon)
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_depreciate(args: DepreciateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let started = Instant::now();
    let deal: PropertyDeal = input::read_snapshot(args.input.as_deref(), "depreciate")?
        .ok_or("--input <deal.json|deal.yaml> or stdin required for depreciation")?;

    let mut warnings = Vec::new();
    if deal.land_value > deal.purchase_price {
        warnings.push("Land value exceeds purchase price; building base is zero".into());
    }
    if !is_effective(&deal.depreciation) {
        warnings.push("Building depreciation policy produces no depreciation".into());
    }

    let horizon = args.years.unwrap_or(deal.horizon_years);
    let schedule = compute_depreciation_schedule(&deal, horizon);
    envelope(
        "Depreciation (AfA): linear, declining balance and combined strands",
        &deal,
        warnings,
        started,
        schedule,
    )
}

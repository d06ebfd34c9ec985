use clap::Args;
use serde_json::Value;
use std::time::Instant;

use immo_calc_core::rent_roll::{summarize_rent_roll, RentRollUnit};

use super::envelope;
use crate::input;

/// Arguments for the rent-roll summary
#[derive(Args)]
pub struct RentRollArgs {
    /// Path to a JSON or YAML list of units
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_rent_roll(args: RentRollArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let started = Instant::now();
    let units: Vec<RentRollUnit> = input::read_snapshot(args.input.as_deref(), "rent-roll")?
        .ok_or("--input <units.json|units.yaml> or stdin required for rent roll")?;

    let mut warnings = Vec::new();
    if units.is_empty() {
        warnings.push("Rent roll has no units".into());
    }

    let summary = summarize_rent_roll(&units);
    envelope(
        "Rent roll: let and vacant area, contract and potential rent",
        &units,
        warnings,
        started,
        summary,
    )
}

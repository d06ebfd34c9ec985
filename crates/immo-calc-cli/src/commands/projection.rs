use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use immo_calc_core::deal::PropertyDeal;
use immo_calc_core::projection::build_projection;
use immo_calc_core::types::MAX_HORIZON_YEARS;

use super::envelope;
use crate::input;

/// Arguments for a multi-year projection
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ProjectArgs {
    /// Path to a JSON or YAML deal snapshot
    #[arg(long)]
    pub input: Option<String>,

    /// Yearly rent growth as a fraction
    #[arg(long, default_value = "0")]
    pub rent_growth: Decimal,

    /// Yearly cost growth as a fraction
    #[arg(long, default_value = "0")]
    pub cost_growth: Decimal,

    /// Years to project (defaults to the deal's horizon)
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let started = Instant::now();
    let deal: PropertyDeal = input::read_snapshot(args.input.as_deref(), "project")?
        .ok_or("--input <deal.json|deal.yaml> or stdin required for projection")?;

    let horizon = args.years.unwrap_or(deal.horizon_years);
    let mut warnings = Vec::new();
    if horizon > MAX_HORIZON_YEARS {
        warnings.push(format!("Horizon clamped to {MAX_HORIZON_YEARS} years"));
    }

    let projection = build_projection(&deal, horizon, args.rent_growth, args.cost_growth);
    envelope(
        "Yearly projection: NOI, debt service, depreciation, tax effect and equity build-up",
        &deal,
        warnings,
        started,
        projection,
    )
}

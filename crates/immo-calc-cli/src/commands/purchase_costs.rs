use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use immo_calc_core::purchase_costs::{calculate_purchase_costs, FederalState, PurchaseCostInput};

use super::envelope;
use crate::input;

/// Arguments for the incidental purchase-cost calculator
#[derive(Args)]
pub struct PurchaseCostArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Federal state for the transfer-tax rate (e.g. bayern, nordrhein_westfalen)
    #[arg(long)]
    pub state: Option<String>,

    /// Transfer-tax rate when no state is given
    #[arg(long, default_value = "0")]
    pub transfer_tax_rate: Decimal,

    /// Notary fee rate
    #[arg(long, default_value = "0.015")]
    pub notary_rate: Decimal,

    /// Land-registry fee rate
    #[arg(long, default_value = "0.005")]
    pub land_registry_rate: Decimal,

    /// Buyer's broker commission rate
    #[arg(long, default_value = "0")]
    pub broker_rate: Decimal,

    /// Fixed extra costs
    #[arg(long, default_value = "0")]
    pub other_costs: Decimal,
}

pub fn run_purchase_costs(args: PurchaseCostArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let started = Instant::now();
    let snapshot = input::read_snapshot(args.input.as_deref(), "purchase-costs")?;
    let cost_input: PurchaseCostInput = match snapshot {
        Some(parsed) => parsed,
        None => PurchaseCostInput {
            purchase_price: args.price.ok_or("--price is required (or provide --input)")?,
            state: args.state.as_deref().map(parse_state).transpose()?,
            transfer_tax_rate: args.transfer_tax_rate,
            notary_rate: args.notary_rate,
            land_registry_rate: args.land_registry_rate,
            broker_rate: args.broker_rate,
            other_costs: args.other_costs,
        },
    };

    let mut warnings = Vec::new();
    if cost_input.state.is_none() && cost_input.transfer_tax_rate.is_zero() {
        warnings.push("No federal state or transfer-tax rate given; transfer tax is zero".into());
    }

    let breakdown = calculate_purchase_costs(&cost_input);
    envelope(
        "Incidental purchase costs (Grunderwerbsteuer, notary, land registry, broker)",
        &cost_input,
        warnings,
        started,
        breakdown,
    )
}

fn parse_state(name: &str) -> Result<FederalState, String> {
    let normalised = name.trim().to_lowercase().replace('-', "_");
    serde_json::from_value(Value::String(normalised))
        .map_err(|_| format!("Unknown federal state '{name}'"))
}

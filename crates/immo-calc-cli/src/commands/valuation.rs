use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use immo_calc_core::deal::PropertyDeal;
use immo_calc_core::types::Money;
use immo_calc_core::valuation::{
    compute_valuation, compute_year_one_metrics, solve_break_even_price, solve_break_even_rent,
    ScorePreset, ScoreProfile, ValuationInput, ValuationResult, YearOneMetrics,
};

use super::envelope;
use crate::input;

/// Arguments for income valuation and scoring
#[derive(Args)]
pub struct ValuationArgs {
    /// Path to a JSON or YAML deal snapshot
    #[arg(long)]
    pub input: Option<String>,

    /// Score preset: residential-condo, multi-family or commercial
    #[arg(long, value_enum, default_value = "residential-condo")]
    pub profile: ProfileArg,
}

/// Arguments for the break-even solver
#[derive(Args)]
pub struct BreakEvenArgs {
    /// Path to a JSON or YAML deal snapshot
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ProfileArg {
    ResidentialCondo,
    MultiFamily,
    Commercial,
}

impl From<ProfileArg> for ScorePreset {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::ResidentialCondo => ScorePreset::ResidentialCondo,
            ProfileArg::MultiFamily => ScorePreset::MultiFamily,
            ProfileArg::Commercial => ScorePreset::Commercial,
        }
    }
}

#[derive(Serialize)]
struct ValuationReport {
    year_one: YearOneMetrics,
    #[serde(flatten)]
    valuation: ValuationResult,
}

#[derive(Serialize)]
struct BreakEvenReport {
    purchase_price: Money,
    break_even_price: Option<Money>,
    /// Monthly rent per m²
    break_even_rent_per_sqm: Option<Money>,
}

pub fn run_valuation(args: ValuationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let started = Instant::now();
    let deal: PropertyDeal = input::read_snapshot(args.input.as_deref(), "valuation")?
        .ok_or("--input <deal.json|deal.yaml> or stdin required for valuation")?;

    let profile = ScoreProfile::preset(args.profile.into());
    let valuation = compute_valuation(&ValuationInput::from_deal(&deal), &profile);

    let mut warnings = Vec::new();
    if valuation.noi < Decimal::ZERO {
        warnings.push("NOI is negative; operating costs exceed income".into());
    }

    let report = ValuationReport {
        year_one: compute_year_one_metrics(&deal),
        valuation,
    };
    envelope(
        "Income Capitalisation (NOI / cap rate) with weighted deal score",
        &deal,
        warnings,
        started,
        report,
    )
}

pub fn run_break_even(args: BreakEvenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let started = Instant::now();
    let deal: PropertyDeal = input::read_snapshot(args.input.as_deref(), "break-even")?
        .ok_or("--input <deal.json|deal.yaml> or stdin required for break-even")?;

    let report = BreakEvenReport {
        purchase_price: deal.purchase_price,
        break_even_price: solve_break_even_price(&deal),
        break_even_rent_per_sqm: solve_break_even_rent(&deal),
    };

    let mut warnings = Vec::new();
    if deal.financing.is_none() {
        warnings.push("Break-even requires financing; deal is all-cash".into());
    } else if report.break_even_price.is_none() {
        warnings.push("No price with zero cash flow could be bracketed".into());
    }

    envelope(
        "Break-even by bracket expansion and bisection on monthly cash flow",
        &deal,
        warnings,
        started,
        report,
    )
}

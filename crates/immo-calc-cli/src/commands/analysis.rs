use clap::Args;
use serde_json::Value;

use immo_calc_core::analysis::{self, DealAnalysisInput};

use crate::input;

/// Arguments for a full deal analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JSON or YAML deal snapshot
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a base/adjusted comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Snapshot of the saved (base) parameters
    #[arg(long)]
    pub base: String,

    /// Snapshot of the adjusted (what-if) parameters
    #[arg(long)]
    pub adjusted: String,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal_input: DealAnalysisInput = input::read_snapshot(args.input.as_deref(), "analyze")?
        .ok_or("--input <deal.json|deal.yaml> or stdin required for deal analysis")?;
    let result = analysis::analyze_deal(&deal_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let base: DealAnalysisInput = input::file::read_snapshot_file(&args.base)?;
    let adjusted: DealAnalysisInput = input::file::read_snapshot_file(&args.adjusted)?;
    let result = analysis::compare_deals(&base, &adjusted)?;
    Ok(serde_json::to_value(result)?)
}

mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortization::AmortizeArgs;
use commands::analysis::{AnalyzeArgs, CompareArgs};
use commands::depreciation::DepreciateArgs;
use commands::projection::ProjectArgs;
use commands::purchase_costs::PurchaseCostArgs;
use commands::rent_roll::RentRollArgs;
use commands::valuation::{BreakEvenArgs, ValuationArgs};

/// Real-estate deal calculations
#[derive(Parser)]
#[command(
    name = "immo",
    version,
    about = "Real-estate deal calculations",
    long_about = "Amortization, depreciation (AfA), income valuation, break-even and \
                  multi-year projections for buy-to-let property, with decimal precision. \
                  Inputs are JSON or YAML parameter snapshots, piped JSON, or flags."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Full deal analysis: financing, depreciation, valuation, break-even, projection
    Analyze(AnalyzeArgs),
    /// Compare a base snapshot with an adjusted one
    Compare(CompareArgs),
    /// Year-by-year loan amortization
    Amortize(AmortizeArgs),
    /// Depreciation (AfA) schedule for building, improvements and allowances
    Depreciate(DepreciateArgs),
    /// Income-capitalisation value, DSCR and deal score
    Valuation(ValuationArgs),
    /// Break-even purchase price and rent
    BreakEven(BreakEvenArgs),
    /// Multi-year cash-flow and wealth projection
    Project(ProjectArgs),
    /// Incidental purchase costs (transfer tax, notary, registry, broker)
    PurchaseCosts(PurchaseCostArgs),
    /// Summarise a rent roll
    RentRoll(RentRollArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analysis::run_analyze(args),
        Commands::Compare(args) => commands::analysis::run_compare(args),
        Commands::Amortize(args) => commands::amortization::run_amortize(args),
        Commands::Depreciate(args) => commands::depreciation::run_depreciate(args),
        Commands::Valuation(args) => commands::valuation::run_valuation(args),
        Commands::BreakEven(args) => commands::valuation::run_break_even(args),
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::PurchaseCosts(args) => commands::purchase_costs::run_purchase_costs(args),
        Commands::RentRoll(args) => commands::rent_roll::run_rent_roll(args),
        Commands::Version => {
            println!("immo {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

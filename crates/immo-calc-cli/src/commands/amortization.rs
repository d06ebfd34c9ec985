use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::time::Instant;

use immo_calc_core::amortization::{compute_amortization_schedule, LoanTerms};
use immo_calc_core::deal::RepaymentPolicy;

use super::envelope;
use crate::input;

/// Arguments for a loan amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to a JSON or YAML loan snapshot (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual interest rate as a fraction (0.038 = 3.8%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Initial amortization rate for the approximate annuity
    #[arg(long, default_value = "0.02")]
    pub initial_amortization: Decimal,

    /// Use an exact annuity over this many years instead
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Calendar year of the first loan year
    #[arg(long, default_value_t = 1)]
    pub start_year: i32,

    /// Number of years to schedule
    #[arg(long, default_value_t = 30)]
    pub years: u32,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let started = Instant::now();
    let terms: LoanTerms = match input::read_snapshot(args.input.as_deref(), "amortize")? {
        Some(terms) => terms,
        None => LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            policy: match args.term_years {
                Some(term_years) => RepaymentPolicy::ExactAnnuity { term_years },
                None => RepaymentPolicy::ApproximateAnnuity {
                    initial_amortization_rate: args.initial_amortization,
                },
            },
            special_repayments: None,
            start_year: args.start_year,
        },
    };

    let mut warnings = Vec::new();
    if terms.annual_rate > dec!(0.15) {
        warnings.push(format!(
            "Interest rate {} looks like a percentage; rates are fractions (0.038 = 3.8%)",
            terms.annual_rate
        ));
    }
    if terms.principal <= Decimal::ZERO {
        warnings.push("Principal is zero; schedule is empty".into());
    }

    let schedule = compute_amortization_schedule(&terms, args.years);
    envelope(
        "Annuity Loan Amortization",
        &terms,
        warnings,
        started,
        schedule,
    )
}

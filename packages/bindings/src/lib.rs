use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use immo_calc_core::amortization::{compute_amortization_schedule, LoanTerms};
use immo_calc_core::analysis::{self, DealAnalysisInput};
use immo_calc_core::deal::{PropertyDeal, RepaymentPolicy};
use immo_calc_core::numeric::{self, NumberLocale};
use immo_calc_core::types::{Currency, Money, Rate};
use immo_calc_core::valuation::{
    compute_valuation, solve_break_even_price, solve_break_even_rent, ScoreProfileChoice,
    ValuationInput,
};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<T: for<'de> Deserialize<'de>>(json: &str) -> NapiResult<T> {
    serde_json::from_str(json).map_err(to_napi_error)
}

fn render(value: &impl Serialize) -> NapiResult<String> {
    serde_json::to_string(value).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Deal analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_deal(input_json: String) -> NapiResult<String> {
    let input: DealAnalysisInput = parse(&input_json)?;
    let output = analysis::analyze_deal(&input).map_err(to_napi_error)?;
    render(&output)
}

/// "View vs. base": both snapshots are passed explicitly.
#[napi]
pub fn compare_deals(base_json: String, adjusted_json: String) -> NapiResult<String> {
    let base: DealAnalysisInput = parse(&base_json)?;
    let adjusted: DealAnalysisInput = parse(&adjusted_json)?;
    let output = analysis::compare_deals(&base, &adjusted).map_err(to_napi_error)?;
    render(&output)
}

// ---------------------------------------------------------------------------
// Individual engines
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct AmortizationRequest {
    #[serde(flatten)]
    terms: LoanTerms,
    #[serde(default = "default_loan_years")]
    horizon_years: u32,
}

fn default_loan_years() -> u32 {
    30
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let request: AmortizationRequest = parse(&input_json)?;
    render(&compute_amortization_schedule(&request.terms, request.horizon_years))
}

#[napi]
pub fn depreciation_schedule(deal_json: String) -> NapiResult<String> {
    let deal: PropertyDeal = parse(&deal_json)?;
    render(&immo_calc_core::depreciation::compute_depreciation_schedule(
        &deal,
        deal.horizon_years,
    ))
}

#[derive(Deserialize)]
struct ValuationRequest {
    deal: PropertyDeal,
    #[serde(default)]
    score_profile: ScoreProfileChoice,
}

#[napi]
pub fn valuation(input_json: String) -> NapiResult<String> {
    let request: ValuationRequest = parse(&input_json)?;
    let profile = request.score_profile.resolve();
    profile.validate().map_err(to_napi_error)?;
    render(&compute_valuation(&ValuationInput::from_deal(&request.deal), &profile))
}

#[derive(Serialize)]
struct BreakEven {
    break_even_price: Option<Money>,
    break_even_rent_per_sqm: Option<Money>,
}

#[napi]
pub fn break_even(deal_json: String) -> NapiResult<String> {
    let deal: PropertyDeal = parse(&deal_json)?;
    render(&BreakEven {
        break_even_price: solve_break_even_price(&deal),
        break_even_rent_per_sqm: solve_break_even_rent(&deal),
    })
}

#[derive(Deserialize)]
struct ProjectionRequest {
    deal: PropertyDeal,
    #[serde(default)]
    rent_growth: Rate,
    #[serde(default)]
    cost_growth: Rate,
}

#[napi]
pub fn projection(input_json: String) -> NapiResult<String> {
    let request: ProjectionRequest = parse(&input_json)?;
    render(&immo_calc_core::projection::build_projection(
        &request.deal,
        request.deal.horizon_years,
        request.rent_growth,
        request.cost_growth,
    ))
}

#[napi]
pub fn purchase_costs(input_json: String) -> NapiResult<String> {
    let input: immo_calc_core::purchase_costs::PurchaseCostInput = parse(&input_json)?;
    render(&immo_calc_core::purchase_costs::calculate_purchase_costs(&input))
}

#[napi]
pub fn rent_roll(units_json: String) -> NapiResult<String> {
    let units: Vec<immo_calc_core::rent_roll::RentRollUnit> = parse(&units_json)?;
    render(&immo_calc_core::rent_roll::summarize_rent_roll(&units))
}

// ---------------------------------------------------------------------------
// Number-typed helpers for live form feedback
// ---------------------------------------------------------------------------

/// Monthly instalment of the approximate annuity from raw form values.
/// Non-finite inputs count as zero.
#[napi]
pub fn monthly_payment(principal: f64, annual_rate: f64, initial_amortization_rate: f64) -> f64 {
    let terms = LoanTerms {
        principal: numeric::from_f64_or(principal, Decimal::ZERO),
        annual_rate: numeric::from_f64_or(annual_rate, Decimal::ZERO),
        policy: RepaymentPolicy::ApproximateAnnuity {
            initial_amortization_rate: numeric::from_f64_or(
                initial_amortization_rate,
                Decimal::ZERO,
            ),
        },
        special_repayments: None,
        start_year: 1,
    };
    numeric::round_currency(terms.stepper().periodic_payment())
        .to_f64()
        .unwrap_or_default()
}

/// Format an amount for display, e.g. `1.234,56 €` (de) or `€1,234.56` (en).
#[napi]
pub fn format_money(value: f64, locale: String) -> String {
    numeric::format_currency(
        numeric::from_f64_or(value, Decimal::ZERO),
        Currency::EUR,
        parse_locale(&locale),
    )
}

/// Format a fraction as a percentage, e.g. `3,80 %` for 0.038.
#[napi]
pub fn format_rate(rate: f64, decimals: u32, locale: String) -> String {
    numeric::format_percent(
        numeric::from_f64_or(rate, Decimal::ZERO),
        decimals,
        parse_locale(&locale),
    )
}

fn parse_locale(locale: &str) -> NumberLocale {
    if locale.to_ascii_lowercase().starts_with("en") {
        NumberLocale::En
    } else {
        NumberLocale::De
    }
}

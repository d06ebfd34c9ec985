use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{compute_amortization_schedule, AmortizationSchedule, LoanTerms};
use crate::deal::PropertyDeal;
use crate::numeric::safe_div;
use crate::depreciation::{compute_depreciation_schedule, is_effective, DepreciationSchedule};
use crate::projection::{build_projection, Projection};
use crate::purchase_costs::{calculate_purchase_costs, PurchaseCostBreakdown, PurchaseCostInput};
use crate::rent_roll::{summarize_rent_roll, RentRollSummary, RentRollUnit};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, MAX_HORIZON_YEARS};
use crate::valuation::{
    compute_valuation, compute_year_one_metrics, solve_break_even_price, solve_break_even_rent,
    ScoreProfileChoice, ValuationInput, ValuationResult, YearOneMetrics,
};
use crate::ImmoCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Complete parameter snapshot for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealAnalysisInput {
    pub deal: PropertyDeal,
    #[serde(default)]
    pub score_profile: ScoreProfileChoice,
    /// Yearly rent growth for the projection
    #[serde(default)]
    pub rent_growth: Rate,
    /// Yearly cost growth for the projection
    #[serde(default)]
    pub cost_growth: Rate,
    /// Itemised incidental costs; replaces `deal.acquisition_cost_rate`.
    /// The price is always taken from the deal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_costs: Option<PurchaseCostInput>,
    /// Unit-level rents; replaces `deal.income.gross_annual_rent` and, when
    /// the deal has none, its living area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent_roll: Option<Vec<RentRollUnit>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealAnalysisOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_costs: Option<PurchaseCostBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_roll: Option<RentRollSummary>,
    pub acquisition_costs: Money,
    pub loan_amount: Money,
    pub equity_invested: Money,
    pub year_one: YearOneMetrics,
    pub valuation: ValuationResult,
    pub break_even_price: Option<Money>,
    /// Monthly rent per m² at which cash flow is zero
    pub break_even_rent_per_sqm: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amortization: Option<AmortizationSchedule>,
    pub depreciation: DepreciationSchedule,
    pub projection: Projection,
}

/// Headline differences, adjusted minus base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDeltas {
    pub monthly_cash_flow: Money,
    pub noi: Money,
    pub noi_yield: Rate,
    pub value_gap: Money,
    pub score: Decimal,
    pub projected_cash_flow: Money,
    pub projected_equity_gain: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealComparison {
    pub base: DealAnalysisOutput,
    pub adjusted: DealAnalysisOutput,
    pub deltas: MetricDeltas,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run every engine on one deal: amortization, depreciation, valuation and
/// score, both break-even solves, and the projection.
///
/// The only error is a misconfigured score profile; questionable data is
/// reported in `warnings`.
pub fn analyze_deal(
    input: &DealAnalysisInput,
) -> ImmoCalcResult<ComputationOutput<DealAnalysisOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = run_analysis(input, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Real Estate Deal Analysis (Annuity Amortization, AfA, Income Capitalisation)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Analyse two explicit snapshots of the same deal (e.g. the saved inputs and
/// a what-if adjustment) and report the headline deltas.
pub fn compare_deals(
    base: &DealAnalysisInput,
    adjusted: &DealAnalysisInput,
) -> ImmoCalcResult<ComputationOutput<DealComparison>> {
    let start = Instant::now();

    let mut base_warnings = Vec::new();
    let base_out = run_analysis(base, &mut base_warnings)?;
    let mut adjusted_warnings = Vec::new();
    let adjusted_out = run_analysis(adjusted, &mut adjusted_warnings)?;

    let warnings = base_warnings
        .into_iter()
        .map(|w| format!("base: {w}"))
        .chain(adjusted_warnings.into_iter().map(|w| format!("adjusted: {w}")))
        .collect();

    let deltas = MetricDeltas {
        monthly_cash_flow: adjusted_out.valuation.monthly_cash_flow
            - base_out.valuation.monthly_cash_flow,
        noi: adjusted_out.valuation.noi - base_out.valuation.noi,
        noi_yield: adjusted_out.valuation.noi_yield - base_out.valuation.noi_yield,
        value_gap: adjusted_out.valuation.value_gap - base_out.valuation.value_gap,
        score: adjusted_out.valuation.score.score - base_out.valuation.score.score,
        projected_cash_flow: adjusted_out.projection.totals.cash_flow
            - base_out.projection.totals.cash_flow,
        projected_equity_gain: adjusted_out.projection.totals.equity_gain
            - base_out.projection.totals.equity_gain,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Real Estate Deal Comparison (base vs. adjusted)",
        &(base, adjusted),
        warnings,
        elapsed,
        DealComparison {
            base: base_out,
            adjusted: adjusted_out,
            deltas,
        },
    ))
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn run_analysis(
    input: &DealAnalysisInput,
    warnings: &mut Vec<String>,
) -> ImmoCalcResult<DealAnalysisOutput> {
    let profile = input.score_profile.resolve();
    profile.validate()?;

    let mut deal = input.deal.clone();

    let purchase_costs = input.purchase_costs.as_ref().map(|pc| {
        let breakdown = calculate_purchase_costs(&PurchaseCostInput {
            purchase_price: deal.purchase_price,
            ..pc.clone()
        });
        deal.acquisition_cost_rate = breakdown.total_rate;
        breakdown
    });

    let rent_roll = input.rent_roll.as_deref().map(|units| {
        let summary = summarize_rent_roll(units);
        apply_rent_roll(&mut deal, &summary, warnings);
        summary
    });

    check_deal(&deal, warnings);

    let horizon = deal.horizon_years.min(MAX_HORIZON_YEARS);
    let loan = LoanTerms::from_deal(&deal);
    let amortization = loan
        .as_ref()
        .map(|terms| compute_amortization_schedule(terms, horizon));
    let depreciation = compute_depreciation_schedule(&deal, horizon);
    let projection = build_projection(&deal, horizon, input.rent_growth, input.cost_growth);

    let year_one = compute_year_one_metrics(&deal);
    let valuation = compute_valuation(&ValuationInput::from_deal(&deal), &profile);

    let break_even_price = solve_break_even_price(&deal);
    let break_even_rent_per_sqm = solve_break_even_rent(&deal);

    check_results(&deal, &year_one, &valuation, break_even_price, warnings);

    Ok(DealAnalysisOutput {
        purchase_costs,
        rent_roll,
        acquisition_costs: deal.acquisition_costs(),
        loan_amount: deal.loan_amount(),
        equity_invested: deal.equity_invested(),
        year_one,
        valuation,
        break_even_price,
        break_even_rent_per_sqm,
        amortization,
        depreciation,
        projection,
    })
}

/// Gross rent becomes the roll's full-occupancy rent. Vacancy is deducted once,
/// at the larger of the deal's assumed rate and the roll's current rent loss.
fn apply_rent_roll(
    deal: &mut PropertyDeal,
    summary: &RentRollSummary,
    warnings: &mut Vec<String>,
) {
    let potential = summary.annual_potential_rent;
    let roll_vacancy = safe_div(potential - summary.annual_gross_rent, potential);

    deal.income.gross_annual_rent = potential;
    if roll_vacancy > deal.income.vacancy_rate {
        warnings.push(format!(
            "Rent roll vacancy of {:.1}% replaces the assumed {:.1}%",
            roll_vacancy * dec!(100),
            deal.income.vacancy_rate * dec!(100)
        ));
        deal.income.vacancy_rate = roll_vacancy;
    }
    if deal.living_area_sqm <= Decimal::ZERO {
        deal.living_area_sqm = summary.total_area_sqm;
    }
}

fn check_deal(deal: &PropertyDeal, warnings: &mut Vec<String>) {
    if deal.land_value > deal.purchase_price {
        warnings.push(format!(
            "Land value {} exceeds purchase price {}; depreciable base is zero",
            deal.land_value, deal.purchase_price
        ));
    }

    if deal.horizon_years > MAX_HORIZON_YEARS {
        warnings.push(format!(
            "Horizon of {} years clamped to {MAX_HORIZON_YEARS}",
            deal.horizon_years
        ));
    }

    let auto_switch = deal.depreciation.auto_switch_to_linear
        || deal
            .improvements
            .iter()
            .any(|i| i.policy.auto_switch_to_linear);
    if auto_switch {
        warnings.push(
            "Automatic switch from declining-balance to linear is not modelled; flag ignored"
                .into(),
        );
    }

    if deal.depreciable_base() > Decimal::ZERO && !is_effective(&deal.depreciation) {
        warnings.push(
            "Building depreciation policy has no useful life or rate; no depreciation applied"
                .into(),
        );
    }

    if deal.income.vacancy_rate > dec!(0.15) {
        warnings.push(format!(
            "Vacancy rate {:.1}% exceeds 15%; above typical market norms",
            deal.income.vacancy_rate * dec!(100)
        ));
    }
}

fn check_results(
    deal: &PropertyDeal,
    year_one: &YearOneMetrics,
    valuation: &ValuationResult,
    break_even_price: Option<Money>,
    warnings: &mut Vec<String>,
) {
    if valuation.noi < Decimal::ZERO {
        warnings.push(format!(
            "NOI of {:.2} is negative; operating costs exceed income",
            valuation.noi
        ));
    }

    if year_one.loan_to_value > Decimal::ONE {
        warnings.push(format!(
            "LTV of {:.1}% exceeds 100%; incidental costs are debt-financed",
            year_one.loan_to_value * dec!(100)
        ));
    }

    if let Some(dscr) = valuation.dscr {
        if dscr < Decimal::ONE {
            warnings.push(format!(
                "DSCR of {dscr:.2} is below 1.00x; NOI does not cover debt service"
            ));
        }
    }

    if deal.financing.is_some() && break_even_price.is_none() {
        warnings.push("Break-even price could not be determined for this financing".into());
    }
}

#![cfg(feature = "valuation")]

use immo_calc_core::deal::{Financing, IncomeAssumptions, PropertyDeal, RepaymentPolicy};
use immo_calc_core::valuation::{
    compute_valuation, compute_year_one_metrics, monthly_cash_flow, monthly_cash_flow_at_price,
    monthly_cash_flow_at_rent, score_deal, solve_break_even_price, solve_break_even_rent,
    ScoreMetrics, ScoreProfile, ValuationInput, Verdict,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn financed_flat() -> PropertyDeal {
    PropertyDeal {
        name: "3-room flat".into(),
        purchase_price: dec!(320000),
        land_value: dec!(64000),
        acquisition_cost_rate: dec!(0.1),
        living_area_sqm: dec!(80),
        income: IncomeAssumptions {
            gross_annual_rent: dec!(14400),
            vacancy_rate: dec!(0.03),
            operating_costs: dec!(1500),
            capex_reserve: dec!(800),
            ..IncomeAssumptions::default()
        },
        financing: Some(Financing {
            equity: dec!(80000),
            interest_rate: dec!(0.036),
            policy: RepaymentPolicy::ApproximateAnnuity {
                initial_amortization_rate: dec!(0.02),
            },
            special_repayments: None,
        }),
        cap_rate: dec!(0.04),
        ..PropertyDeal::default()
    }
}

fn assert_near(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "Expected {expected} ± {tolerance}, got {actual}"
    );
}

// ===========================================================================
// Income capitalisation
// ===========================================================================

#[test]
fn test_valuation_of_financed_flat() {
    let deal = financed_flat();
    let profile = ScoreProfile::residential_condo();
    let result = compute_valuation(&ValuationInput::from_deal(&deal), &profile);

    // 14,400 * 0.97 - 1,500 - 800 = 11,668
    assert_eq!(result.noi, dec!(11668));
    assert_near(result.noi_yield, dec!(0.0364625), dec!(0.0000001));
    assert_eq!(result.modeled_value, dec!(291700));
    assert_eq!(result.value_gap, dec!(-28300));

    // Loan 272,000, debt service 272,000 * 5.6% = 15,232
    let dscr = result.dscr.unwrap();
    assert_near(dscr, dec!(11668) / dec!(15232), dec!(0.0001));
    assert_near(result.monthly_cash_flow, dec!(-297), dec!(0.01));
    assert!(result.score.score >= Decimal::ZERO && result.score.score <= Decimal::ONE);
}

#[test]
fn test_year_one_metrics() {
    let metrics = compute_year_one_metrics(&financed_flat());
    assert_eq!(metrics.loan_amount, dec!(272000));
    assert_near(metrics.annual_debt_service, dec!(15232), dec!(0.01));
    assert_eq!(metrics.gross_yield, dec!(0.045));
    assert_eq!(metrics.rent_per_sqm, dec!(15));
    assert_eq!(metrics.loan_to_value, dec!(0.85));
    assert_near(metrics.monthly_cash_flow, monthly_cash_flow(&financed_flat()), dec!(0.0001));
}

#[test]
fn test_all_cash_deal_has_no_dscr() {
    let mut deal = financed_flat();
    deal.financing = None;
    let profile = ScoreProfile::residential_condo();
    let result = compute_valuation(&ValuationInput::from_deal(&deal), &profile);
    assert!(result.dscr.is_none());
    assert!(result.score.components.dscr.is_none());
    assert_near(result.monthly_cash_flow, dec!(11668) / dec!(12), dec!(0.0001));
}

#[test]
fn test_score_is_bounded_for_extreme_inputs() {
    let profile = ScoreProfile::multi_family();
    let extremes = [
        (dec!(-0.5), Some(dec!(-3)), dec!(-10000), dec!(1)),
        (dec!(0.5), Some(dec!(50)), dec!(100000), Decimal::ZERO),
        (Decimal::ZERO, None, Decimal::ZERO, dec!(0.5)),
    ];
    for (noi_yield, dscr, monthly_cash_flow, vacancy_rate) in extremes {
        let score = score_deal(
            &ScoreMetrics {
                noi_yield,
                dscr,
                monthly_cash_flow,
                vacancy_rate,
            },
            &profile,
        );
        assert!(score.score >= Decimal::ZERO && score.score <= Decimal::ONE);
    }
}

#[test]
fn test_strong_deal_gets_buy_verdict() {
    let score = score_deal(
        &ScoreMetrics {
            noi_yield: dec!(0.08),
            dscr: Some(dec!(1.6)),
            monthly_cash_flow: dec!(400),
            vacancy_rate: dec!(0.02),
        },
        &ScoreProfile::residential_condo(),
    );
    assert_eq!(score.score, Decimal::ONE);
    assert_eq!(score.verdict, Verdict::Buy);
}

// ===========================================================================
// Break-even
// ===========================================================================

#[test]
fn test_break_even_price_zeroes_cash_flow() {
    let deal = financed_flat();
    let price = solve_break_even_price(&deal).unwrap();

    assert!(price > Decimal::ZERO && price < deal.purchase_price);
    assert_near(monthly_cash_flow_at_price(&deal, price), Decimal::ZERO, dec!(0.01));
}

#[test]
fn test_break_even_price_is_idempotent() {
    let deal = financed_flat();
    let first = solve_break_even_price(&deal).unwrap();

    let mut at_break_even = deal.clone();
    at_break_even.purchase_price = first;
    let second = solve_break_even_price(&at_break_even).unwrap();

    assert_near(second, first, dec!(1));
}

#[test]
fn test_break_even_rent_zeroes_cash_flow() {
    let deal = financed_flat();
    let rent = solve_break_even_rent(&deal).unwrap();

    // Current rent is 15/m² and cash flow is negative, so break-even is higher
    assert!(rent > dec!(15));
    assert_near(monthly_cash_flow_at_rent(&deal, rent), Decimal::ZERO, dec!(0.01));
}

#[test]
fn test_break_even_requires_financing() {
    let mut deal = financed_flat();
    deal.financing = None;
    assert!(solve_break_even_price(&deal).is_none());
    assert!(solve_break_even_rent(&deal).is_none());
}

#[test]
fn test_break_even_rent_requires_living_area() {
    let mut deal = financed_flat();
    deal.living_area_sqm = Decimal::ZERO;
    assert!(solve_break_even_rent(&deal).is_none());
    assert!(solve_break_even_price(&deal).is_some());
}

#[test]
fn test_break_even_price_none_when_noi_negative() {
    let mut deal = financed_flat();
    deal.income.operating_costs = dec!(40000);
    assert!(solve_break_even_price(&deal).is_none());
}

#[test]
fn test_score_band_boundaries_hold_for_every_preset() {
    for profile in [
        ScoreProfile::residential_condo(),
        ScoreProfile::multi_family(),
        ScoreProfile::commercial(),
    ] {
        // At the high bounds even the worst vacancy still buys
        let strong = score_deal(
            &ScoreMetrics {
                noi_yield: profile.noi_yield.high,
                dscr: Some(profile.dscr.high),
                monthly_cash_flow: profile.monthly_cash_flow.high,
                vacancy_rate: profile.vacancy.high,
            },
            &profile,
        );
        assert!(strong.score >= dec!(0.70), "{}: {}", profile.name, strong.score);
        assert_eq!(strong.verdict, Verdict::Buy);

        // At the low bounds even perfect occupancy is a no
        let weak = score_deal(
            &ScoreMetrics {
                noi_yield: profile.noi_yield.low,
                dscr: Some(profile.dscr.low),
                monthly_cash_flow: profile.monthly_cash_flow.low,
                vacancy_rate: profile.vacancy.low,
            },
            &profile,
        );
        assert!(weak.score < dec!(0.50), "{}: {}", profile.name, weak.score);
        assert_eq!(weak.verdict, Verdict::No);
    }
}

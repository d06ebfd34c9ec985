#![cfg(feature = "projection")]

use immo_calc_core::deal::{
    Financing, IncomeAssumptions, PropertyDeal, RepaymentPolicy, TaxSettings,
};
use immo_calc_core::projection::build_projection;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn deal() -> PropertyDeal {
    PropertyDeal {
        name: "Duplex".into(),
        start_year: 2025,
        purchase_price: dec!(400000),
        land_value: dec!(100000),
        acquisition_cost_rate: dec!(0.1),
        living_area_sqm: dec!(120),
        income: IncomeAssumptions {
            gross_annual_rent: dec!(19200),
            other_income: dec!(600),
            vacancy_rate: dec!(0.02),
            operating_costs: dec!(2000),
            capex_reserve: dec!(1200),
            ..IncomeAssumptions::default()
        },
        financing: Some(Financing {
            equity: dec!(100000),
            interest_rate: dec!(0.04),
            policy: RepaymentPolicy::ApproximateAnnuity {
                initial_amortization_rate: dec!(0.02),
            },
            special_repayments: None,
        }),
        tax: TaxSettings {
            enabled: true,
            marginal_rate: dec!(0.35),
        },
        appreciation_rate: dec!(0.015),
        horizon_years: 20,
        ..PropertyDeal::default()
    }
}

#[test]
fn test_projection_row_count_and_years() {
    let projection = build_projection(&deal(), 20, dec!(0.02), dec!(0.02));
    assert_eq!(projection.rows.len(), 20);
    assert_eq!(projection.rows[0].calendar_year, 2025);
    assert_eq!(projection.rows[19].calendar_year, 2044);
}

#[test]
fn test_rent_compounds_from_year_one() {
    let projection = build_projection(&deal(), 3, dec!(0.02), Decimal::ZERO);
    assert_eq!(projection.rows[0].gross_income, dec!(19200));
    assert_eq!(projection.rows[1].gross_income, dec!(19584));
    assert_eq!(projection.rows[2].gross_income, dec!(19975.68));
    // Costs held flat
    assert_eq!(projection.rows[2].operating_costs, dec!(2000));
}

#[test]
fn test_cumulative_columns_are_running_sums() {
    let projection = build_projection(&deal(), 15, dec!(0.015), dec!(0.02));
    let mut cash = Decimal::ZERO;
    let mut equity = Decimal::ZERO;
    for row in &projection.rows {
        cash += row.cash_flow;
        equity += row.equity_gain;
        assert_eq!(row.cumulative_cash_flow, cash);
        assert_eq!(row.cumulative_equity_gain, equity);
    }
    assert_eq!(projection.totals.cash_flow, cash);
    assert_eq!(projection.totals.equity_gain, equity);
}

#[test]
fn test_tax_effect_uses_interest_and_depreciation() {
    let projection = build_projection(&deal(), 2, Decimal::ZERO, Decimal::ZERO);
    let row = &projection.rows[0];

    // Building base 300,000 / 50 years
    assert_eq!(row.depreciation, dec!(6000));
    assert_eq!(row.taxable_income, row.noi - row.interest - row.depreciation);
    assert_eq!(row.tax_effect, row.taxable_income * dec!(0.35));
    assert_eq!(row.cash_flow_after_tax, row.cash_flow - row.tax_effect);
}

#[test]
fn test_free_rent_and_upfront_costs_hit_year_one_only() {
    let mut d = deal();
    d.income.free_rent_months = 3;
    d.upfront_costs = dec!(5000);
    let projection = build_projection(&d, 2, Decimal::ZERO, Decimal::ZERO);

    assert_eq!(projection.rows[0].gross_income, dec!(14400));
    assert_eq!(projection.rows[0].upfront_costs, dec!(5000));
    assert_eq!(projection.rows[1].gross_income, dec!(19200));
    assert!(projection.rows[1].upfront_costs.is_zero());
}

#[test]
fn test_pro_rata_first_year_from_april() {
    let mut d = deal();
    d.start_month = 4;
    d.income.pro_rata_first_year = true;
    let projection = build_projection(&d, 2, Decimal::ZERO, Decimal::ZERO);

    // Nine months held
    assert_eq!(projection.rows[0].gross_income, dec!(14400));
    assert_eq!(projection.rows[0].operating_costs, dec!(1500));
}

#[test]
fn test_growth_is_clamped() {
    let wild = build_projection(&deal(), 3, dec!(5), dec!(-5));
    let capped = build_projection(&deal(), 3, dec!(0.5), dec!(-0.5));
    assert_eq!(wild.rows, capped.rows);
}

#[test]
fn test_all_cash_projection_has_no_debt() {
    let mut d = deal();
    d.financing = None;
    let projection = build_projection(&d, 5, Decimal::ZERO, Decimal::ZERO);
    for row in &projection.rows {
        assert!(row.debt_service.is_zero());
        assert!(row.outstanding.is_zero());
        assert_eq!(row.cash_flow, row.noi);
        assert_eq!(row.equity_gain, dec!(6000));
    }
}

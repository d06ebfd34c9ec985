use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{AnnualRow, LoanTerms};
use crate::deal::PropertyDeal;
use crate::depreciation::compute_depreciation_schedule;
use crate::numeric::{clamp, pro_rata_factor};
use crate::types::{Money, Rate, MAX_HORIZON_YEARS};

const MIN_GROWTH: Decimal = dec!(-0.5);
const MAX_GROWTH: Decimal = dec!(0.5);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjectionRow {
    pub year_index: u32,
    pub calendar_year: i32,
    /// Contract rent actually due this year (free months and partial first
    /// year removed)
    pub gross_income: Money,
    pub vacancy_loss: Money,
    pub other_income: Money,
    pub operating_costs: Money,
    pub capex_reserve: Money,
    pub noi: Money,
    pub interest: Money,
    pub principal: Money,
    pub special_repayment: Money,
    pub debt_service: Money,
    pub outstanding: Money,
    /// One-time costs, year 1 only
    pub upfront_costs: Money,
    /// NOI minus debt service minus upfront costs
    pub cash_flow: Money,
    pub depreciation: Money,
    /// NOI minus interest minus depreciation
    pub taxable_income: Money,
    /// Tax payable on `taxable_income`; negative values are savings
    pub tax_effect: Money,
    pub cash_flow_after_tax: Money,
    /// Principal repaid plus price times the appreciation rate
    pub equity_gain: Money,
    pub cumulative_equity_gain: Money,
    pub cumulative_cash_flow: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTotals {
    pub cash_flow: Money,
    pub cash_flow_after_tax: Money,
    pub interest: Money,
    pub depreciation: Money,
    pub equity_gain: Money,
    pub final_outstanding: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub rows: Vec<YearlyProjectionRow>,
    pub totals: ProjectionTotals,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project `deal` over `horizon_years` with yearly `rent_growth` and
/// `cost_growth` (fractions, clamped to ±50%).
pub fn build_projection(
    deal: &PropertyDeal,
    horizon_years: u32,
    rent_growth: Rate,
    cost_growth: Rate,
) -> Projection {
    let horizon = horizon_years.min(MAX_HORIZON_YEARS);
    let rent_growth = clamp(rent_growth, MIN_GROWTH, MAX_GROWTH);
    let cost_growth = clamp(cost_growth, MIN_GROWTH, MAX_GROWTH);

    let income = &deal.income;
    let first_year_share = pro_rata_factor(income.pro_rata_first_year, Some(deal.start_month));
    let held_months = (first_year_share * dec!(12)).round_dp(8);
    let paying_months = (held_months - Decimal::from(income.free_rent_months)).max(Decimal::ZERO);

    let loan = LoanTerms::from_deal(deal);
    let mut stepper = loan.as_ref().map(|t| t.stepper());
    let depreciation = compute_depreciation_schedule(deal, horizon);
    let marginal_rate = if deal.tax.enabled {
        deal.tax.marginal_rate.max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };
    let yearly_appreciation = deal.purchase_price.max(Decimal::ZERO) * deal.appreciation_rate;

    let mut rows = Vec::with_capacity(horizon as usize);
    let mut cumulative_equity_gain = Decimal::ZERO;
    let mut cumulative_cash_flow = Decimal::ZERO;

    for idx in 0..horizon {
        let year_index = idx + 1;
        let rent_index = (Decimal::ONE + rent_growth).powi(i64::from(idx));
        let cost_index = (Decimal::ONE + cost_growth).powi(i64::from(idx));

        let (rent_months, cost_share) = if year_index == 1 {
            (paying_months, first_year_share)
        } else {
            (dec!(12), Decimal::ONE)
        };

        let gross_income = income.gross_annual_rent * rent_index * rent_months / dec!(12);
        let vacancy_loss = gross_income * income.vacancy_rate;
        let other_income = income.other_income * rent_index * cost_share;
        let operating_costs = income.operating_costs * cost_index * cost_share;
        let capex_reserve = income.capex_reserve * cost_index * cost_share;
        let noi = gross_income - vacancy_loss + other_income - operating_costs - capex_reserve;

        let loan_year = match stepper.as_mut() {
            Some(s) => s.next_year(),
            None => empty_loan_year(year_index, deal.start_year),
        };

        let upfront_costs = if year_index == 1 {
            deal.upfront_costs.max(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };
        let cash_flow = noi - loan_year.debt_service - upfront_costs;

        let year_depreciation = depreciation.rows[idx as usize].total;
        let taxable_income = noi - loan_year.interest - year_depreciation;
        let tax_effect = taxable_income * marginal_rate;
        let cash_flow_after_tax = cash_flow - tax_effect;

        let equity_gain =
            loan_year.scheduled_principal + loan_year.special_repayment + yearly_appreciation;
        cumulative_equity_gain += equity_gain;
        cumulative_cash_flow += cash_flow;

        rows.push(YearlyProjectionRow {
            year_index,
            calendar_year: deal.start_year.saturating_add(idx as i32),
            gross_income,
            vacancy_loss,
            other_income,
            operating_costs,
            capex_reserve,
            noi,
            interest: loan_year.interest,
            principal: loan_year.scheduled_principal,
            special_repayment: loan_year.special_repayment,
            debt_service: loan_year.debt_service,
            outstanding: loan_year.outstanding,
            upfront_costs,
            cash_flow,
            depreciation: year_depreciation,
            taxable_income,
            tax_effect,
            cash_flow_after_tax,
            equity_gain,
            cumulative_equity_gain,
            cumulative_cash_flow,
        });
    }

    let totals = ProjectionTotals {
        cash_flow: cumulative_cash_flow,
        cash_flow_after_tax: rows.iter().map(|r| r.cash_flow_after_tax).sum(),
        interest: rows.iter().map(|r| r.interest).sum(),
        depreciation: rows.iter().map(|r| r.depreciation).sum(),
        equity_gain: cumulative_equity_gain,
        final_outstanding: rows
            .last()
            .map(|r| r.outstanding)
            .unwrap_or_else(|| deal.loan_amount()),
    };

    Projection { rows, totals }
}

fn empty_loan_year(year_index: u32, start_year: i32) -> AnnualRow {
    AnnualRow {
        year_index,
        calendar_year: start_year.saturating_add(year_index as i32 - 1),
        interest: Decimal::ZERO,
        scheduled_principal: Decimal::ZERO,
        special_repayment: Decimal::ZERO,
        scheduled_debt_service: Decimal::ZERO,
        debt_service: Decimal::ZERO,
        outstanding: Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{
        DepreciationMethod, DepreciationPolicy, Financing, IncomeAssumptions, RepaymentPolicy,
        TaxSettings,
    };

    fn cash_deal() -> PropertyDeal {
        PropertyDeal {
            start_year: 2025,
            start_month: 1,
            purchase_price: dec!(400000),
            land_value: dec!(100000),
            income: IncomeAssumptions {
                gross_annual_rent: dec!(24000),
                vacancy_rate: dec!(0.05),
                operating_costs: dec!(2000),
                capex_reserve: dec!(1000),
                ..IncomeAssumptions::default()
            },
            depreciation: DepreciationPolicy {
                method: DepreciationMethod::Linear,
                useful_life_years: 50,
                ..DepreciationPolicy::default()
            },
            appreciation_rate: dec!(0.02),
            ..PropertyDeal::default()
        }
    }

    #[test]
    fn test_growth_compounds_from_year_one() {
        let projection = build_projection(&cash_deal(), 3, dec!(0.02), dec!(0.03));
        let rows = &projection.rows;
        assert_eq!(rows[0].gross_income, dec!(24000));
        assert_eq!(rows[1].gross_income, dec!(24480));
        assert_eq!(rows[2].gross_income, dec!(24969.6));
        assert_eq!(rows[2].operating_costs, dec!(2121.8));
        assert_eq!(rows[0].noi, dec!(24000) * dec!(0.95) - dec!(3000));
    }

    #[test]
    fn test_unfinanced_cash_flow_equals_noi() {
        let projection = build_projection(&cash_deal(), 5, Decimal::ZERO, Decimal::ZERO);
        for row in &projection.rows {
            assert_eq!(row.cash_flow, row.noi);
            assert_eq!(row.debt_service, Decimal::ZERO);
            assert_eq!(row.depreciation, dec!(6000));
        }
        assert_eq!(projection.totals.final_outstanding, Decimal::ZERO);
    }

    #[test]
    fn test_equity_gain_is_additive() {
        let projection = build_projection(&cash_deal(), 4, Decimal::ZERO, Decimal::ZERO);
        // no loan: 2% of 400k per year, not compounded
        for row in &projection.rows {
            assert_eq!(row.equity_gain, dec!(8000));
        }
        assert_eq!(projection.rows[3].cumulative_equity_gain, dec!(32000));
    }

    #[test]
    fn test_first_year_free_rent_and_upfront_costs() {
        let mut deal = cash_deal();
        deal.income.free_rent_months = 3;
        deal.upfront_costs = dec!(5000);
        let projection = build_projection(&deal, 2, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(projection.rows[0].gross_income, dec!(18000));
        assert_eq!(projection.rows[0].upfront_costs, dec!(5000));
        assert_eq!(projection.rows[1].gross_income, dec!(24000));
        assert_eq!(projection.rows[1].upfront_costs, Decimal::ZERO);
        assert_eq!(
            projection.rows[0].cash_flow,
            projection.rows[0].noi - dec!(5000)
        );
    }

    #[test]
    fn test_pro_rata_first_year() {
        let mut deal = cash_deal();
        deal.start_month = 7;
        deal.income.pro_rata_first_year = true;
        deal.income.free_rent_months = 2;
        let projection = build_projection(&deal, 2, Decimal::ZERO, Decimal::ZERO);
        // six months held, two rent-free
        assert_eq!(projection.rows[0].gross_income, dec!(8000));
        assert_eq!(projection.rows[0].operating_costs, dec!(1000));
        assert_eq!(projection.rows[1].gross_income, dec!(24000));
    }

    #[test]
    fn test_financed_projection_tracks_loan() {
        let mut deal = cash_deal();
        deal.financing = Some(Financing {
            equity: dec!(100000),
            interest_rate: dec!(0.04),
            policy: RepaymentPolicy::ApproximateAnnuity {
                initial_amortization_rate: dec!(0.02),
            },
            special_repayments: None,
        });
        deal.tax = TaxSettings {
            enabled: true,
            marginal_rate: dec!(0.40),
        };
        let projection = build_projection(&deal, 10, dec!(0.02), dec!(0.02));
        let rows = &projection.rows;

        assert!((rows[0].debt_service - dec!(18000)).abs() < dec!(0.000001));
        for pair in rows.windows(2) {
            assert!(pair[1].outstanding <= pair[0].outstanding);
            assert!(pair[1].interest < pair[0].interest);
        }
        let first = &rows[0];
        assert_eq!(first.taxable_income, first.noi - first.interest - first.depreciation);
        assert_eq!(first.tax_effect, first.taxable_income * dec!(0.40));
        assert_eq!(first.cash_flow_after_tax, first.cash_flow - first.tax_effect);
        assert_eq!(first.equity_gain, first.principal + dec!(8000));
        assert_eq!(projection.totals.final_outstanding, rows[9].outstanding);
    }

    #[test]
    fn test_growth_is_clamped() {
        let wild = build_projection(&cash_deal(), 3, dec!(7), dec!(-3));
        let capped = build_projection(&cash_deal(), 3, dec!(0.5), dec!(-0.5));
        assert_eq!(wild, capped);
    }
}

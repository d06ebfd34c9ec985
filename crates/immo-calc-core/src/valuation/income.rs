use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::cash_flow::annual_debt_service_at;
use super::score::{score_deal, DealScore, ScoreMetrics, ScoreProfile};
use crate::deal::PropertyDeal;
use crate::types::{Money, Rate};

/// Cap rates are floored here to keep `NOI / cap_rate` finite.
const MIN_CAP_RATE: Decimal = dec!(0.0001);

/// Annual figures a valuation is computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInput {
    pub purchase_price: Money,
    /// Rent after vacancy loss
    pub effective_income: Money,
    #[serde(default)]
    pub other_income: Money,
    /// Owner-borne operating costs
    pub operating_costs: Money,
    pub capex_reserve: Money,
    /// `None` without financing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_debt_service: Option<Money>,
    pub cap_rate: Rate,
    /// Only feeds the score
    #[serde(default)]
    pub vacancy_rate: Rate,
}

impl ValuationInput {
    /// Stabilised year-1 figures of `deal`, with debt service taken from the
    /// first loan year.
    pub fn from_deal(deal: &PropertyDeal) -> Self {
        let income = &deal.income;
        Self {
            purchase_price: deal.purchase_price,
            effective_income: income.gross_annual_rent * (Decimal::ONE - income.vacancy_rate),
            other_income: income.other_income,
            operating_costs: income.operating_costs,
            capex_reserve: income.capex_reserve,
            annual_debt_service: deal
                .financing
                .as_ref()
                .map(|_| annual_debt_service_at(deal, deal.purchase_price)),
            cap_rate: deal.cap_rate,
            vacancy_rate: income.vacancy_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub noi: Money,
    /// NOI / price
    pub noi_yield: Rate,
    /// NOI / debt service; `None` without financing or debt service
    pub dscr: Option<Decimal>,
    /// NOI / cap rate
    pub modeled_value: Money,
    /// Modeled value minus price
    pub value_gap: Money,
    /// Value gap as a fraction of price
    pub value_gap_pct: Rate,
    pub monthly_cash_flow: Money,
    pub score: DealScore,
}

/// Income-capitalisation value, coverage and the composite score.
///
/// NOI is not floored: a negative NOI yields a negative modeled value and
/// zero sub-scores.
pub fn compute_valuation(input: &ValuationInput, profile: &ScoreProfile) -> ValuationResult {
    let noi = input.effective_income + input.other_income
        - input.operating_costs
        - input.capex_reserve;

    let price = input.purchase_price;
    let noi_yield = if price > Decimal::ZERO {
        noi / price
    } else {
        Decimal::ZERO
    };

    let modeled_value = noi / input.cap_rate.max(MIN_CAP_RATE);
    let value_gap = modeled_value - price;
    let value_gap_pct = if price > Decimal::ZERO {
        value_gap / price
    } else {
        Decimal::ZERO
    };

    let debt_service = input.annual_debt_service.unwrap_or(Decimal::ZERO);
    let dscr = match input.annual_debt_service {
        Some(ds) if ds > Decimal::ZERO => Some(noi / ds),
        _ => None,
    };
    let monthly_cash_flow = (noi - debt_service) / dec!(12);

    let score = score_deal(
        &ScoreMetrics {
            noi_yield,
            dscr,
            monthly_cash_flow,
            vacancy_rate: input.vacancy_rate,
        },
        profile,
    );

    ValuationResult {
        noi,
        noi_yield,
        dscr,
        modeled_value,
        value_gap,
        value_gap_pct,
        monthly_cash_flow,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{Financing, IncomeAssumptions, RepaymentPolicy};
    use crate::valuation::score::Verdict;

    fn input() -> ValuationInput {
        ValuationInput {
            purchase_price: dec!(1000000),
            effective_income: dec!(114000),
            other_income: dec!(6000),
            operating_costs: dec!(48000),
            capex_reserve: dec!(6000),
            annual_debt_service: Some(dec!(50000)),
            cap_rate: dec!(0.06),
            vacancy_rate: dec!(0.05),
        }
    }

    #[test]
    fn test_noi_and_direct_cap() {
        let out = compute_valuation(&input(), &ScoreProfile::multi_family());
        assert_eq!(out.noi, dec!(66000));
        assert_eq!(out.noi_yield, dec!(0.066));
        assert_eq!(out.modeled_value, dec!(1100000));
        assert_eq!(out.value_gap, dec!(100000));
        assert_eq!(out.value_gap_pct, dec!(0.1));
        assert_eq!(out.dscr, Some(dec!(1.32)));
        assert_eq!(out.monthly_cash_flow, dec!(16000) / dec!(12));
    }

    #[test]
    fn test_dscr_absent_without_debt_service() {
        let mut i = input();
        i.annual_debt_service = None;
        assert_eq!(compute_valuation(&i, &ScoreProfile::multi_family()).dscr, None);
        i.annual_debt_service = Some(Decimal::ZERO);
        assert_eq!(compute_valuation(&i, &ScoreProfile::multi_family()).dscr, None);
    }

    #[test]
    fn test_cap_rate_floor() {
        let mut i = input();
        i.cap_rate = Decimal::ZERO;
        let out = compute_valuation(&i, &ScoreProfile::multi_family());
        assert_eq!(out.modeled_value, dec!(660000000));
    }

    #[test]
    fn test_zero_price_gives_zero_yield() {
        let mut i = input();
        i.purchase_price = Decimal::ZERO;
        let out = compute_valuation(&i, &ScoreProfile::multi_family());
        assert_eq!(out.noi_yield, Decimal::ZERO);
        assert_eq!(out.value_gap_pct, Decimal::ZERO);
    }

    #[test]
    fn test_negative_noi_is_not_floored() {
        let mut i = input();
        i.operating_costs = dec!(200000);
        let out = compute_valuation(&i, &ScoreProfile::multi_family());
        assert_eq!(out.noi, dec!(-86000));
        assert!(out.modeled_value < Decimal::ZERO);
        assert_eq!(out.score.verdict, Verdict::No);
    }

    #[test]
    fn test_from_deal_unfinanced() {
        let deal = PropertyDeal {
            purchase_price: dec!(200000),
            income: IncomeAssumptions {
                gross_annual_rent: dec!(10000),
                vacancy_rate: dec!(0.1),
                ..IncomeAssumptions::default()
            },
            ..PropertyDeal::default()
        };
        let i = ValuationInput::from_deal(&deal);
        assert_eq!(i.effective_income, dec!(9000));
        assert_eq!(i.annual_debt_service, None);
    }

    #[test]
    fn test_from_deal_financed_takes_first_loan_year() {
        let deal = PropertyDeal {
            purchase_price: dec!(200000),
            financing: Some(Financing {
                equity: Decimal::ZERO,
                interest_rate: dec!(0.05),
                policy: RepaymentPolicy::ExactAnnuity { term_years: 10 },
                special_repayments: None,
            }),
            ..PropertyDeal::default()
        };
        let ds = ValuationInput::from_deal(&deal).annual_debt_service.unwrap();
        assert!((ds - dec!(25900.91)).abs() < dec!(0.01));
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::cash_flow::{monthly_cash_flow_at_price, monthly_cash_flow_at_rent};
use crate::amortization::annual_debt_service_factor;
use crate::deal::PropertyDeal;
use crate::types::Money;

/// Maximum doublings of the upper bracket bound.
const MAX_EXPANSIONS: u32 = 40;

/// Fixed number of bisection steps.
const BISECTION_ITERATIONS: u32 = 40;

/// Purchase price at which monthly cash flow is zero.
///
/// `None` without financing or when rate plus amortization is not positive,
/// and when no sign change can be bracketed (e.g. NOI already negative at a
/// price of zero).
pub fn solve_break_even_price(deal: &PropertyDeal) -> Option<Money> {
    if !has_debt_service_sensitivity(deal) {
        return None;
    }
    bracket_and_bisect(
        |price| monthly_cash_flow_at_price(deal, price),
        deal.purchase_price,
    )
}

/// Monthly rent per m² of living area at which cash flow is zero.
///
/// Same absence rules as the price solver; additionally `None` without a
/// positive living area.
pub fn solve_break_even_rent(deal: &PropertyDeal) -> Option<Money> {
    if !has_debt_service_sensitivity(deal) || deal.living_area_sqm <= Decimal::ZERO {
        return None;
    }
    let current = deal.income.gross_annual_rent / (deal.living_area_sqm * dec!(12));
    bracket_and_bisect(|rent| monthly_cash_flow_at_rent(deal, rent), current)
}

fn has_debt_service_sensitivity(deal: &PropertyDeal) -> bool {
    deal.financing
        .as_ref()
        .and_then(|f| annual_debt_service_factor(f.interest_rate, &f.policy))
        .is_some()
}

/// Find a root of `f` on `[0, upper]`, doubling `upper` until `f` changes
/// sign relative to `f(0)`, then bisecting.
fn bracket_and_bisect(f: impl Fn(Decimal) -> Decimal, upper: Decimal) -> Option<Decimal> {
    let f_lo = f(Decimal::ZERO);
    if f_lo.is_zero() {
        return Some(Decimal::ZERO);
    }
    let lo_positive = f_lo > Decimal::ZERO;

    let mut hi = upper.max(Decimal::ONE);
    let mut expansions = 0;
    while (f(hi) > Decimal::ZERO) == lo_positive {
        if expansions == MAX_EXPANSIONS {
            log::debug!("break-even not bracketed after {MAX_EXPANSIONS} expansions (upper {hi})");
            return None;
        }
        hi *= dec!(2);
        expansions += 1;
    }

    let mut lo = Decimal::ZERO;
    for _ in 0..BISECTION_ITERATIONS {
        let mid = (lo + hi) / dec!(2);
        let f_mid = f(mid);
        if f_mid.is_zero() {
            return Some(mid);
        }
        if (f_mid > Decimal::ZERO) == lo_positive {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let root = (lo + hi) / dec!(2);
    log::debug!("break-even bracket [{lo}, {hi}] after {expansions} expansions");
    Some(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{Financing, IncomeAssumptions, RepaymentPolicy};

    fn deal() -> PropertyDeal {
        PropertyDeal {
            purchase_price: dec!(300000),
            acquisition_cost_rate: dec!(0.10),
            living_area_sqm: dec!(80),
            income: IncomeAssumptions {
                gross_annual_rent: dec!(14400),
                vacancy_rate: dec!(0.03),
                operating_costs: dec!(1500),
                capex_reserve: dec!(800),
                ..IncomeAssumptions::default()
            },
            financing: Some(Financing {
                equity: dec!(60000),
                interest_rate: dec!(0.035),
                policy: RepaymentPolicy::ApproximateAnnuity {
                    initial_amortization_rate: dec!(0.02),
                },
                special_repayments: None,
            }),
            ..PropertyDeal::default()
        }
    }

    #[test]
    fn test_break_even_price_zeroes_cash_flow() {
        let d = deal();
        let price = solve_break_even_price(&d).unwrap();
        assert!(price > Decimal::ZERO);
        assert!(monthly_cash_flow_at_price(&d, price).abs() < Decimal::ONE);
        // currently cash-flow negative, so break-even lies below the price
        assert!(price < d.purchase_price);
    }

    #[test]
    fn test_break_even_price_above_current_needs_expansion() {
        let mut d = deal();
        d.purchase_price = dec!(50000);
        let price = solve_break_even_price(&d).unwrap();
        assert!(price > dec!(50000));
        assert!(monthly_cash_flow_at_price(&d, price).abs() < Decimal::ONE);
    }

    #[test]
    fn test_break_even_rent_zeroes_cash_flow() {
        let d = deal();
        let rent = solve_break_even_rent(&d).unwrap();
        assert!(rent > dec!(15));
        assert!(monthly_cash_flow_at_rent(&d, rent).abs() < Decimal::ONE);
    }

    #[test]
    fn test_no_break_even_without_financing() {
        let mut d = deal();
        d.financing = None;
        assert_eq!(solve_break_even_price(&d), None);
        assert_eq!(solve_break_even_rent(&d), None);
    }

    #[test]
    fn test_no_break_even_when_rate_sum_not_positive() {
        let mut d = deal();
        d.financing = Some(Financing {
            equity: dec!(60000),
            interest_rate: dec!(0.01),
            policy: RepaymentPolicy::ApproximateAnnuity {
                initial_amortization_rate: dec!(-0.01),
            },
            special_repayments: None,
        });
        assert_eq!(solve_break_even_price(&d), None);
    }

    #[test]
    fn test_no_break_even_when_noi_negative() {
        let mut d = deal();
        d.income.operating_costs = dec!(50000);
        assert_eq!(solve_break_even_price(&d), None);
    }

    #[test]
    fn test_no_break_even_rent_without_area() {
        let mut d = deal();
        d.living_area_sqm = Decimal::ZERO;
        assert_eq!(solve_break_even_rent(&d), None);
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::LoanStepper;
use crate::deal::PropertyDeal;
use crate::numeric::safe_div;
use crate::types::{Money, Rate};

/// Stabilised first-year figures of a deal (full year, no free rent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearOneMetrics {
    pub gross_rent: Money,
    pub vacancy_loss: Money,
    pub effective_income: Money,
    pub noi: Money,
    pub loan_amount: Money,
    /// Scheduled interest plus principal of loan year 1
    pub annual_debt_service: Money,
    pub monthly_cash_flow: Money,
    /// Gross rent / price
    pub gross_yield: Rate,
    /// Price / gross rent
    pub rent_multiplier: Decimal,
    /// Loan / price
    pub loan_to_value: Rate,
    /// Annual cash flow / equity invested
    pub cash_on_cash: Rate,
    /// Gross rent per m² of living area and month
    pub rent_per_sqm: Money,
}

pub fn compute_year_one_metrics(deal: &PropertyDeal) -> YearOneMetrics {
    let income = &deal.income;
    let gross_rent = income.gross_annual_rent;
    let vacancy_loss = gross_rent * income.vacancy_rate;
    let effective_income = gross_rent - vacancy_loss;
    let noi = noi_for_rent(deal, gross_rent);
    let loan_amount = deal.loan_amount();
    let annual_debt_service = annual_debt_service_at(deal, deal.purchase_price);
    let annual_cash_flow = noi - annual_debt_service;

    YearOneMetrics {
        gross_rent,
        vacancy_loss,
        effective_income,
        noi,
        loan_amount,
        annual_debt_service,
        monthly_cash_flow: annual_cash_flow / dec!(12),
        gross_yield: positive_div(gross_rent, deal.purchase_price),
        rent_multiplier: positive_div(deal.purchase_price, gross_rent),
        loan_to_value: positive_div(loan_amount, deal.purchase_price),
        cash_on_cash: positive_div(annual_cash_flow, deal.equity_invested()),
        rent_per_sqm: positive_div(gross_rent, deal.living_area_sqm * dec!(12)),
    }
}

/// Stabilised monthly cash flow after scheduled debt service.
pub fn monthly_cash_flow(deal: &PropertyDeal) -> Money {
    monthly_cash_flow_at_price(deal, deal.purchase_price)
}

/// Monthly cash flow if the same property were bought at `price`, with the
/// loan resized to cover it.
pub fn monthly_cash_flow_at_price(deal: &PropertyDeal, price: Money) -> Money {
    let noi = noi_for_rent(deal, deal.income.gross_annual_rent);
    (noi - annual_debt_service_at(deal, price)) / dec!(12)
}

/// Monthly cash flow if the rent were `rent_per_sqm` per m² and month.
pub fn monthly_cash_flow_at_rent(deal: &PropertyDeal, rent_per_sqm: Money) -> Money {
    let gross = rent_per_sqm * deal.living_area_sqm * dec!(12);
    let noi = noi_for_rent(deal, gross);
    (noi - annual_debt_service_at(deal, deal.purchase_price)) / dec!(12)
}

pub(crate) fn noi_for_rent(deal: &PropertyDeal, gross_annual_rent: Money) -> Money {
    let income = &deal.income;
    gross_annual_rent * (Decimal::ONE - income.vacancy_rate) + income.other_income
        - income.operating_costs
        - income.capex_reserve
}

/// First-year scheduled debt service, run through the amortization engine.
pub(crate) fn annual_debt_service_at(deal: &PropertyDeal, price: Money) -> Money {
    match &deal.financing {
        Some(f) => LoanStepper::new(
            deal.loan_amount_at(price),
            f.interest_rate,
            &f.policy,
            None,
            deal.start_year,
        )
        .next_year()
        .scheduled_debt_service,
        None => Decimal::ZERO,
    }
}

fn positive_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        safe_div(numerator, denominator)
    }
}

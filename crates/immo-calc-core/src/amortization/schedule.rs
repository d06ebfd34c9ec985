use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::stepper::{AnnualRow, LoanStepper, PaymentFrequency};
use crate::deal::{PropertyDeal, RepaymentPolicy, SpecialRepaymentPlan};
use crate::types::{Money, Rate, MAX_HORIZON_YEARS};

/// Everything needed to amortize one loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Nominal annual interest rate
    pub annual_rate: Rate,
    pub policy: RepaymentPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_repayments: Option<SpecialRepaymentPlan>,
    /// Calendar year of the first loan year
    #[serde(default = "default_start_year")]
    pub start_year: i32,
}

impl LoanTerms {
    /// Loan implied by a financed deal; `None` for an all-cash purchase.
    pub fn from_deal(deal: &PropertyDeal) -> Option<Self> {
        let financing = deal.financing.as_ref()?;
        Some(Self {
            principal: deal.loan_amount(),
            annual_rate: financing.interest_rate,
            policy: financing.policy.clone(),
            special_repayments: financing.special_repayments.clone(),
            start_year: deal.start_year,
        })
    }

    pub fn stepper(&self) -> LoanStepper<'_> {
        LoanStepper::new(
            self.principal,
            self.annual_rate,
            &self.policy,
            self.special_repayments.as_ref(),
            self.start_year,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub rows: Vec<AnnualRow>,
    /// Monthly instalment or annual annuity
    pub periodic_payment: Money,
    pub payment_frequency: PaymentFrequency,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_special: Money,
    /// Loan year in which the balance reached zero, if within the horizon
    pub payoff_year: Option<u32>,
    /// Balance left at the end of the horizon
    pub remaining_balance: Money,
}

/// Year-by-year amortization of `terms` over `horizon_years` (clamped to
/// `MAX_HORIZON_YEARS`).
///
/// The outstanding balance never increases and, once it reaches zero, every
/// later row is zero-filled.
pub fn compute_amortization_schedule(
    terms: &LoanTerms,
    horizon_years: u32,
) -> AmortizationSchedule {
    let horizon = horizon_years.min(MAX_HORIZON_YEARS);
    let mut stepper = terms.stepper();

    let mut rows = Vec::with_capacity(horizon as usize);
    let mut payoff_year = None;
    for _ in 0..horizon {
        let row = stepper.next_year();
        if payoff_year.is_none() && row.outstanding.is_zero() && !row.debt_service.is_zero() {
            payoff_year = Some(row.year_index);
        }
        rows.push(row);
    }

    if let Some(year) = payoff_year {
        log::debug!("loan of {} repaid in year {year}", terms.principal);
    }

    AmortizationSchedule {
        total_interest: rows.iter().map(|r| r.interest).sum(),
        total_principal: rows.iter().map(|r| r.scheduled_principal).sum(),
        total_special: rows.iter().map(|r| r.special_repayment).sum(),
        periodic_payment: stepper.periodic_payment(),
        payment_frequency: stepper.frequency(),
        payoff_year,
        remaining_balance: if rows.is_empty() {
            terms.principal.max(Decimal::ZERO)
        } else {
            stepper.balance()
        },
        rows,
    }
}

fn default_start_year() -> i32 {
    1
}

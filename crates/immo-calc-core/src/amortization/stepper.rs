use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::payment::{annuity_factor, approximate_monthly_payment};
use crate::deal::{RepaymentPolicy, SpecialRepaymentAmount, SpecialRepaymentPlan};
use crate::types::{Money, Rate};

/// Balances below this are treated as repaid.
const BALANCE_EPSILON: Decimal = dec!(0.01);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Monthly,
    Annual,
}

/// One loan year, aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualRow {
    pub year_index: u32,
    pub calendar_year: i32,
    pub interest: Money,
    pub scheduled_principal: Money,
    pub special_repayment: Money,
    /// Interest plus scheduled principal
    pub scheduled_debt_service: Money,
    /// Scheduled debt service plus the special repayment
    pub debt_service: Money,
    /// Balance after the year's payments, never negative
    pub outstanding: Money,
}

/// Advances a loan one year at a time.
///
/// The stepper owns only the running balance; terms are fixed at
/// construction. Once the balance reaches zero every further year is a
/// zero row.
#[derive(Debug, Clone)]
pub struct LoanStepper<'a> {
    original_principal: Money,
    balance: Money,
    annual_rate: Rate,
    frequency: PaymentFrequency,
    /// Monthly instalment or annual annuity, depending on `frequency`
    payment: Money,
    special: Option<&'a SpecialRepaymentPlan>,
    start_year: i32,
    year: u32,
}

impl<'a> LoanStepper<'a> {
    pub fn new(
        principal: Money,
        annual_rate: Rate,
        policy: &RepaymentPolicy,
        special: Option<&'a SpecialRepaymentPlan>,
        start_year: i32,
    ) -> Self {
        let principal = principal.max(Decimal::ZERO);
        let annual_rate = annual_rate.max(Decimal::ZERO);
        let (frequency, payment) = match policy {
            RepaymentPolicy::ApproximateAnnuity {
                initial_amortization_rate,
            } => (
                PaymentFrequency::Monthly,
                approximate_monthly_payment(principal, annual_rate, *initial_amortization_rate),
            ),
            RepaymentPolicy::ExactAnnuity { term_years } => (
                PaymentFrequency::Annual,
                principal * annuity_factor(annual_rate, *term_years),
            ),
        };

        Self {
            original_principal: principal,
            balance: principal,
            annual_rate,
            frequency,
            payment,
            special,
            start_year,
            year: 0,
        }
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn periodic_payment(&self) -> Money {
        self.payment
    }

    pub fn frequency(&self) -> PaymentFrequency {
        self.frequency
    }

    pub fn is_repaid(&self) -> bool {
        self.balance.is_zero()
    }

    /// Run the next loan year and return its aggregate.
    pub fn next_year(&mut self) -> AnnualRow {
        self.year += 1;
        let calendar_year = self.start_year.saturating_add(self.year as i32 - 1);

        if self.is_repaid() {
            return AnnualRow {
                year_index: self.year,
                calendar_year,
                interest: Decimal::ZERO,
                scheduled_principal: Decimal::ZERO,
                special_repayment: Decimal::ZERO,
                scheduled_debt_service: Decimal::ZERO,
                debt_service: Decimal::ZERO,
                outstanding: Decimal::ZERO,
            };
        }

        let (interest, scheduled_principal) = match self.frequency {
            PaymentFrequency::Monthly => self.step_months(),
            PaymentFrequency::Annual => self.step_year(),
        };
        let special_repayment = self.apply_special();

        let scheduled_debt_service = interest + scheduled_principal;
        AnnualRow {
            year_index: self.year,
            calendar_year,
            interest,
            scheduled_principal,
            special_repayment,
            scheduled_debt_service,
            debt_service: scheduled_debt_service + special_repayment,
            outstanding: self.balance,
        }
    }

    fn step_months(&mut self) -> (Money, Money) {
        let monthly_rate = self.annual_rate / dec!(12);
        let mut interest = Decimal::ZERO;
        let mut principal = Decimal::ZERO;

        for _ in 0..12 {
            if self.is_repaid() {
                break;
            }
            let month_interest = self.balance * monthly_rate;
            let month_principal = (self.payment - month_interest)
                .max(Decimal::ZERO)
                .min(self.balance);
            interest += month_interest;
            principal += month_principal + self.reduce_balance(month_principal);
        }

        (interest, principal)
    }

    fn step_year(&mut self) -> (Money, Money) {
        let interest = self.balance * self.annual_rate;
        let principal = (self.payment - interest)
            .max(Decimal::ZERO)
            .min(self.balance);
        let residue = self.reduce_balance(principal);
        (interest, principal + residue)
    }

    fn apply_special(&mut self) -> Money {
        let plan = match self.special {
            Some(plan) => plan,
            None => return Decimal::ZERO,
        };
        if self.is_repaid() || self.year < plan.start_year || self.year > plan.end_year {
            return Decimal::ZERO;
        }

        let mut requested = match plan.amount {
            SpecialRepaymentAmount::Fixed(amount) => amount,
            SpecialRepaymentAmount::PercentOfPrincipal(pct) => self.original_principal * pct,
        }
        .max(Decimal::ZERO);
        if let Some(cap) = plan.lender_cap {
            requested = requested.min(self.original_principal * cap.max(Decimal::ZERO));
        }

        let amount = requested.min(self.balance);
        amount + self.reduce_balance(amount)
    }

    /// Subtract `amount` and snap a sub-cent remainder to zero. Returns the
    /// snapped remainder so callers can book it as repaid.
    fn reduce_balance(&mut self, amount: Money) -> Money {
        self.balance -= amount;
        if self.balance < BALANCE_EPSILON {
            let residue = self.balance.max(Decimal::ZERO);
            self.balance = Decimal::ZERO;
            if residue > Decimal::ZERO {
                log::debug!("loan repaid in year {} (residue {residue})", self.year);
            }
            residue
        } else {
            Decimal::ZERO
        }
    }
}

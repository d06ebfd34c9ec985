use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Depreciation policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    /// Constant `base / life` per year
    #[default]
    Linear,
    /// `base * rate * (1 - rate)^(t-1)`
    DecliningBalance,
    /// Linear for `linear_years`, then declining balance on the residual
    Combined,
}

/// How one depreciation strand is spread over the years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepreciationPolicy {
    pub method: DepreciationMethod,
    /// Duration of the strand; also the linear divisor
    pub useful_life_years: u32,
    /// Declining-balance rate as a fraction (0.05 = 5%)
    pub declining_rate: Rate,
    /// Linear phase length for the combined method
    pub linear_years: u32,
    /// Accepted for compatibility with saved inputs. Not applied.
    pub auto_switch_to_linear: bool,
    /// Scale year 1 by the share of the year held
    pub pro_rata: bool,
    /// Month placed in service (1-12)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_month: Option<u32>,
}

impl Default for DepreciationPolicy {
    fn default() -> Self {
        Self {
            method: DepreciationMethod::Linear,
            useful_life_years: 50,
            declining_rate: dec!(0.05),
            linear_years: 0,
            auto_switch_to_linear: false,
            pro_rata: false,
            start_month: None,
        }
    }
}

/// A capitalised (or expensed) improvement with its own depreciation strand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementItem {
    /// Opaque identifier, only used to attribute output back to the item
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub amount: Money,
    /// Non-capitalised items contribute nothing to depreciation
    #[serde(default = "default_true")]
    pub capitalize: bool,
    #[serde(default)]
    pub policy: DepreciationPolicy,
    /// Calendar year placed in service; defaults to the deal's start year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
}

/// A special allowance, always spread linearly over `years`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialAllowance {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub amount: Money,
    pub years: u32,
    #[serde(default)]
    pub pro_rata: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
}

// ---------------------------------------------------------------------------
// Financing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum RepaymentPolicy {
    /// Monthly stepping with a constant payment of
    /// `principal * (rate + initial_amortization_rate) / 12`.
    ApproximateAnnuity { initial_amortization_rate: Rate },
    /// Yearly stepping with the closed-form annuity over `term_years`.
    ExactAnnuity { term_years: u32 },
}

impl Default for RepaymentPolicy {
    fn default() -> Self {
        RepaymentPolicy::ApproximateAnnuity {
            initial_amortization_rate: dec!(0.02),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialRepaymentAmount {
    Fixed(Money),
    /// Fraction of the original principal, never of the current balance
    PercentOfPrincipal(Rate),
}

/// Extra repayments made at the end of each loan year in the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialRepaymentPlan {
    pub amount: SpecialRepaymentAmount,
    /// First loan year (1-based, inclusive)
    pub start_year: u32,
    /// Last loan year (inclusive)
    pub end_year: u32,
    /// Yearly cap as a fraction of the original principal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lender_cap: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Financing {
    /// Own funds; the loan covers the rest of price plus incidental costs
    pub equity: Money,
    /// Nominal annual interest rate
    pub interest_rate: Rate,
    #[serde(default)]
    pub policy: RepaymentPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_repayments: Option<SpecialRepaymentPlan>,
}

// ---------------------------------------------------------------------------
// Income, tax and the deal itself
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeAssumptions {
    /// Contract rent for a full year at full occupancy
    pub gross_annual_rent: Money,
    /// Parking, storage and similar, annual
    pub other_income: Money,
    pub vacancy_rate: Rate,
    /// Owner-borne (non-recoverable) operating costs, annual
    pub operating_costs: Money,
    pub capex_reserve: Money,
    /// Rent-free months granted in year 1
    pub free_rent_months: u32,
    /// Scale year-1 income and costs by the acquisition-month factor
    pub pro_rata_first_year: bool,
}

impl Default for IncomeAssumptions {
    fn default() -> Self {
        Self {
            gross_annual_rent: Decimal::ZERO,
            other_income: Decimal::ZERO,
            vacancy_rate: Decimal::ZERO,
            operating_costs: Decimal::ZERO,
            capex_reserve: Decimal::ZERO,
            free_rent_months: 0,
            pro_rata_first_year: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxSettings {
    pub enabled: bool,
    pub marginal_rate: Rate,
}

/// Root input of every calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDeal {
    pub name: String,
    /// Calendar year of acquisition
    pub start_year: i32,
    /// Month of acquisition (1-12)
    pub start_month: u32,
    pub purchase_price: Money,
    /// Non-depreciable land share of the price
    pub land_value: Money,
    /// Incidental purchase costs as a fraction of price
    pub acquisition_cost_rate: Rate,
    pub living_area_sqm: Decimal,
    pub income: IncomeAssumptions,
    /// `None` means an all-cash purchase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financing: Option<Financing>,
    pub depreciation: DepreciationPolicy,
    pub improvements: Vec<ImprovementItem>,
    pub allowances: Vec<SpecialAllowance>,
    /// Market cap rate for income capitalisation
    pub cap_rate: Rate,
    pub horizon_years: u32,
    pub tax: TaxSettings,
    /// Assumed yearly value appreciation, applied to the purchase price
    pub appreciation_rate: Rate,
    /// One-time costs paid in year 1 (e.g. tenant improvements)
    pub upfront_costs: Money,
}

impl Default for PropertyDeal {
    fn default() -> Self {
        Self {
            name: String::new(),
            start_year: 2025,
            start_month: 1,
            purchase_price: Decimal::ZERO,
            land_value: Decimal::ZERO,
            acquisition_cost_rate: Decimal::ZERO,
            living_area_sqm: Decimal::ZERO,
            income: IncomeAssumptions::default(),
            financing: None,
            depreciation: DepreciationPolicy::default(),
            improvements: Vec::new(),
            allowances: Vec::new(),
            cap_rate: dec!(0.05),
            horizon_years: 10,
            tax: TaxSettings::default(),
            appreciation_rate: Decimal::ZERO,
            upfront_costs: Decimal::ZERO,
        }
    }
}

impl PropertyDeal {
    /// Purchase price minus land, floored at zero.
    pub fn depreciable_base(&self) -> Money {
        (self.purchase_price - self.land_value.max(Decimal::ZERO)).max(Decimal::ZERO)
    }

    pub fn acquisition_costs(&self) -> Money {
        acquisition_costs_at(self.purchase_price, self.acquisition_cost_rate)
    }

    /// Loan needed at the deal's own price.
    pub fn loan_amount(&self) -> Money {
        self.loan_amount_at(self.purchase_price)
    }

    /// Loan needed if the property were bought at `price`: price plus
    /// incidental costs minus equity, floored at zero. Zero when unfinanced.
    pub fn loan_amount_at(&self, price: Money) -> Money {
        match &self.financing {
            Some(f) => (price + acquisition_costs_at(price, self.acquisition_cost_rate) - f.equity)
                .max(Decimal::ZERO),
            None => Decimal::ZERO,
        }
    }

    /// Cash the buyer puts in: price plus costs when unfinanced, else the
    /// equity actually needed (never more than the total outlay).
    pub fn equity_invested(&self) -> Money {
        let total = self.purchase_price + self.acquisition_costs();
        match &self.financing {
            Some(f) => f.equity.max(Decimal::ZERO).min(total),
            None => total,
        }
    }
}

fn acquisition_costs_at(price: Money, rate: Rate) -> Money {
    (price * rate).max(Decimal::ZERO)
}

fn default_true() -> bool {
    true
}

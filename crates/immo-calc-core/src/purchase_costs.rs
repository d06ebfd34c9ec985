use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// German federal states with their real-estate transfer tax rate
/// (Grunderwerbsteuer). Rates are a snapshot and carry no legal guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FederalState {
    BadenWuerttemberg,
    Bayern,
    Berlin,
    Brandenburg,
    Bremen,
    Hamburg,
    Hessen,
    MecklenburgVorpommern,
    Niedersachsen,
    NordrheinWestfalen,
    RheinlandPfalz,
    Saarland,
    Sachsen,
    SachsenAnhalt,
    SchleswigHolstein,
    Thueringen,
}

impl FederalState {
    pub fn transfer_tax_rate(&self) -> Rate {
        match self {
            FederalState::Bayern => dec!(0.035),
            FederalState::BadenWuerttemberg
            | FederalState::Niedersachsen
            | FederalState::RheinlandPfalz
            | FederalState::SachsenAnhalt
            | FederalState::Thueringen => dec!(0.05),
            FederalState::Bremen | FederalState::Hamburg | FederalState::Sachsen => dec!(0.055),
            FederalState::Berlin | FederalState::Hessen | FederalState::MecklenburgVorpommern => {
                dec!(0.06)
            }
            FederalState::Brandenburg
            | FederalState::NordrheinWestfalen
            | FederalState::Saarland
            | FederalState::SchleswigHolstein => dec!(0.065),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseCostInput {
    #[serde(default)]
    pub purchase_price: Money,
    /// Overrides `transfer_tax_rate` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<FederalState>,
    #[serde(default)]
    pub transfer_tax_rate: Rate,
    #[serde(default = "default_notary_rate")]
    pub notary_rate: Rate,
    #[serde(default = "default_land_registry_rate")]
    pub land_registry_rate: Rate,
    /// Buyer's share of the broker commission, VAT included
    #[serde(default)]
    pub broker_rate: Rate,
    /// Fixed extras (surveys, bank fees, ...)
    #[serde(default)]
    pub other_costs: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    pub name: String,
    pub rate: Rate,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseCostBreakdown {
    pub items: Vec<CostItem>,
    pub total_costs: Money,
    /// Total costs as a fraction of price
    pub total_rate: Rate,
    /// Price plus all incidental costs
    pub all_in_price: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn calculate_purchase_costs(input: &PurchaseCostInput) -> PurchaseCostBreakdown {
    let price = input.purchase_price.max(Decimal::ZERO);
    let transfer_tax_rate = input
        .state
        .map(|s| s.transfer_tax_rate())
        .unwrap_or(input.transfer_tax_rate);

    let mut items: Vec<CostItem> = [
        ("transfer_tax", transfer_tax_rate),
        ("notary", input.notary_rate),
        ("land_registry", input.land_registry_rate),
        ("broker", input.broker_rate),
    ]
    .into_iter()
    .map(|(name, rate)| {
        let rate = rate.max(Decimal::ZERO);
        CostItem {
            name: name.into(),
            rate,
            amount: price * rate,
        }
    })
    .collect();

    let other = input.other_costs.max(Decimal::ZERO);
    if !other.is_zero() {
        items.push(CostItem {
            name: "other".into(),
            rate: if price.is_zero() {
                Decimal::ZERO
            } else {
                other / price
            },
            amount: other,
        });
    }

    let total_costs: Money = items.iter().map(|i| i.amount).sum();
    let total_rate = if price.is_zero() {
        Decimal::ZERO
    } else {
        total_costs / price
    };

    PurchaseCostBreakdown {
        items,
        total_costs,
        total_rate,
        all_in_price: price + total_costs,
    }
}

fn default_notary_rate() -> Rate {
    dec!(0.015)
}

fn default_land_registry_rate() -> Rate {
    dec!(0.005)
}

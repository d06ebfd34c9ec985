use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::numeric::safe_div;
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentRollUnit {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub area_sqm: Decimal,
    /// Monthly cold rent (contract rent, or asking rent if vacant)
    pub monthly_rent: Money,
    #[serde(default)]
    pub vacant: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentRollSummary {
    pub unit_count: usize,
    pub vacant_units: usize,
    pub total_area_sqm: Decimal,
    pub let_area_sqm: Decimal,
    /// Annual rent of the let units
    pub annual_gross_rent: Money,
    /// Annual rent if every unit were let at its rent
    pub annual_potential_rent: Money,
    /// Let units' monthly rent per let m²
    pub average_rent_per_sqm: Money,
    /// Vacant area over total area
    pub physical_vacancy_rate: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn summarize_rent_roll(units: &[RentRollUnit]) -> RentRollSummary {
    let mut total_area = Decimal::ZERO;
    let mut let_area = Decimal::ZERO;
    let mut let_rent = Decimal::ZERO;
    let mut potential_rent = Decimal::ZERO;
    let mut vacant_units = 0;

    for unit in units {
        let area = unit.area_sqm.max(Decimal::ZERO);
        let rent = unit.monthly_rent.max(Decimal::ZERO);
        total_area += area;
        potential_rent += rent;
        if unit.vacant {
            vacant_units += 1;
        } else {
            let_area += area;
            let_rent += rent;
        }
    }

    RentRollSummary {
        unit_count: units.len(),
        vacant_units,
        total_area_sqm: total_area,
        let_area_sqm: let_area,
        annual_gross_rent: let_rent * dec!(12),
        annual_potential_rent: potential_rent * dec!(12),
        average_rent_per_sqm: safe_div(let_rent, let_area),
        physical_vacancy_rate: safe_div(total_area - let_area, total_area),
    }
}

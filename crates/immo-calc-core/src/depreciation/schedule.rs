use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::strand::{allowance_amount, strand_amount};
use crate::deal::{DepreciationMethod, DepreciationPolicy, PropertyDeal};
use crate::types::{Money, MAX_HORIZON_YEARS};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrandKind {
    MainAsset,
    Improvement,
    Allowance,
}

/// Depreciation of all strands in one calendar year of the deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationYearRow {
    /// 1-based year of the deal
    pub year_index: u32,
    pub calendar_year: i32,
    pub main_asset: Money,
    pub improvements: Money,
    pub allowances: Money,
    pub total: Money,
    /// `total * marginal_rate` when tax is considered, otherwise zero
    pub tax_saving: Money,
}

/// Per-strand amounts, attributed back to the item that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrandSummary {
    /// Item id; `"main"` for the building itself
    pub id: String,
    pub kind: StrandKind,
    pub base: Money,
    /// One entry per deal year, aligned with `DepreciationSchedule::rows`
    pub amounts: Vec<Money>,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    pub rows: Vec<DepreciationYearRow>,
    pub strands: Vec<StrandSummary>,
    pub total_depreciation: Money,
    pub total_tax_saving: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Year-by-year depreciation of the building plus the deal's improvements and
/// allowances over `horizon_years` (clamped to `MAX_HORIZON_YEARS`).
///
/// Every strand starts counting at its own start year, so an improvement
/// placed in service in year 4 of the deal is in its own year 1 there.
pub fn compute_depreciation_schedule(
    deal: &PropertyDeal,
    horizon_years: u32,
) -> DepreciationSchedule {
    let horizon = horizon_years.min(MAX_HORIZON_YEARS);
    let start = deal.start_year;

    let mut strands = Vec::with_capacity(1 + deal.improvements.len() + deal.allowances.len());

    let main_base = deal.depreciable_base();
    strands.push(build_strand(
        "main".into(),
        StrandKind::MainAsset,
        main_base,
        horizon,
        |year| strand_amount(main_base, &deal.depreciation, year),
    ));

    for item in &deal.improvements {
        let base = if item.capitalize {
            item.amount.max(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };
        let item_start = item.start_year.unwrap_or(start);
        strands.push(build_strand(
            item.id.clone(),
            StrandKind::Improvement,
            base,
            horizon,
            |year| {
                elapsed(start, item_start, year)
                    .map_or(Decimal::ZERO, |y| strand_amount(base, &item.policy, y))
            },
        ));
    }

    for allowance in &deal.allowances {
        let base = allowance.amount.max(Decimal::ZERO);
        let item_start = allowance.start_year.unwrap_or(start);
        strands.push(build_strand(
            allowance.id.clone(),
            StrandKind::Allowance,
            base,
            horizon,
            |year| {
                elapsed(start, item_start, year).map_or(Decimal::ZERO, |y| {
                    allowance_amount(
                        base,
                        allowance.years,
                        allowance.pro_rata,
                        allowance.start_month,
                        y,
                    )
                })
            },
        ));
    }

    let marginal_rate = if deal.tax.enabled {
        deal.tax.marginal_rate.max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    let mut rows = Vec::with_capacity(horizon as usize);
    for idx in 0..horizon as usize {
        let mut main_asset = Decimal::ZERO;
        let mut improvements = Decimal::ZERO;
        let mut allowances = Decimal::ZERO;
        for strand in &strands {
            let amount = strand.amounts[idx];
            match strand.kind {
                StrandKind::MainAsset => main_asset += amount,
                StrandKind::Improvement => improvements += amount,
                StrandKind::Allowance => allowances += amount,
            }
        }
        let total = main_asset + improvements + allowances;
        rows.push(DepreciationYearRow {
            year_index: idx as u32 + 1,
            calendar_year: start.saturating_add(idx as i32),
            main_asset,
            improvements,
            allowances,
            total,
            tax_saving: total * marginal_rate,
        });
    }

    let total_depreciation = rows.iter().map(|r| r.total).sum();
    let total_tax_saving = rows.iter().map(|r| r.tax_saving).sum();

    DepreciationSchedule {
        rows,
        strands,
        total_depreciation,
        total_tax_saving,
    }
}

/// Whether `policy` would produce anything for a positive base.
pub fn is_effective(policy: &DepreciationPolicy) -> bool {
    if policy.useful_life_years == 0 {
        return false;
    }
    match policy.method {
        DepreciationMethod::Linear => true,
        DepreciationMethod::DecliningBalance => policy.declining_rate > Decimal::ZERO,
        DepreciationMethod::Combined => {
            policy.linear_years > 0 || policy.declining_rate > Decimal::ZERO
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Strand year for deal year `year` (1-based), if the strand has started.
fn elapsed(deal_start: i32, strand_start: i32, year: u32) -> Option<u32> {
    let strand_year = i64::from(deal_start) - i64::from(strand_start) + i64::from(year);
    u32::try_from(strand_year).ok().filter(|y| *y >= 1)
}

fn build_strand(
    id: String,
    kind: StrandKind,
    base: Money,
    horizon: u32,
    amount_in: impl Fn(u32) -> Money,
) -> StrandSummary {
    let amounts: Vec<Money> = (1..=horizon).map(amount_in).collect();
    let total = amounts.iter().copied().sum();
    StrandSummary {
        id,
        kind,
        base,
        amounts,
        total,
    }
}

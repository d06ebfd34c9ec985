//! Depreciation (AfA) for the building, capitalised improvements and special
//! allowances. Each item is an independent strand indexed by its own elapsed
//! year; the schedule sums the strands per calendar year.

pub mod schedule;
pub mod strand;

pub use schedule::{
    compute_depreciation_schedule, is_effective, DepreciationSchedule, DepreciationYearRow,
    StrandKind, StrandSummary,
};
pub use strand::{allowance_amount, strand_amount};

pub mod deal;
pub mod error;
pub mod numeric;
pub mod types;

#[cfg(feature = "depreciation")]
pub mod depreciation;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "projection")]
pub mod projection;

#[cfg(feature = "purchase_costs")]
pub mod purchase_costs;

#[cfg(feature = "rent_roll")]
pub mod rent_roll;

#[cfg(feature = "analysis")]
pub mod analysis;

pub use error::ImmoCalcError;
pub use types::*;

/// Standard result type for the envelope-level operations
pub type ImmoCalcResult<T> = Result<T, ImmoCalcError>;

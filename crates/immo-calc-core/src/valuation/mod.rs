//! Income-capitalisation valuation, the composite deal score and the
//! break-even solvers.

pub mod break_even;
pub mod cash_flow;
pub mod income;
pub mod score;

pub use break_even::{solve_break_even_price, solve_break_even_rent};
pub use cash_flow::{
    compute_year_one_metrics, monthly_cash_flow, monthly_cash_flow_at_price,
    monthly_cash_flow_at_rent, YearOneMetrics,
};
pub use income::{compute_valuation, ValuationInput, ValuationResult};
pub use score::{
    score_deal, DealScore, ScoreBand, ScoreComponents, ScoreMetrics, ScorePreset, ScoreProfile,
    ScoreProfileChoice, ScoreWeights, Verdict,
};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ImmoCalcError;
use crate::numeric::clamp01;
use crate::types::{Money, Rate};
use crate::ImmoCalcResult;

const WEIGHT_TOLERANCE: Decimal = dec!(0.000001);

// ---------------------------------------------------------------------------
// Policy types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub low: Decimal,
    pub high: Decimal,
}

impl ScoreBand {
    pub const fn new(low: Decimal, high: Decimal) -> Self {
        Self { low, high }
    }

    /// `clamp01((value - low) / (high - low))`
    pub fn normalize(&self, value: Decimal) -> Decimal {
        let width = self.high - self.low;
        if width <= Decimal::ZERO {
            return if value >= self.high {
                Decimal::ONE
            } else {
                Decimal::ZERO
            };
        }
        clamp01((value - self.low) / width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub noi_yield: Decimal,
    pub dscr: Decimal,
    pub cash_flow: Decimal,
    pub vacancy: Decimal,
}

impl ScoreWeights {
    pub fn sum(&self) -> Decimal {
        self.noi_yield + self.dscr + self.cash_flow + self.vacancy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreProfile {
    pub name: String,
    pub noi_yield: ScoreBand,
    pub dscr: ScoreBand,
    /// Monthly cash flow after debt service, in currency units
    pub monthly_cash_flow: ScoreBand,
    /// Inverted: vacancy at or below `low` scores 1, at or above `high` 0
    pub vacancy: ScoreBand,
    pub weights: ScoreWeights,
    pub buy_threshold: Decimal,
    pub check_threshold: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePreset {
    ResidentialCondo,
    MultiFamily,
    Commercial,
}

/// Profile selection as it appears in a parameter snapshot:
/// `{"preset": "multi_family"}` or `{"custom": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreProfileChoice {
    Preset(ScorePreset),
    Custom(ScoreProfile),
}

impl Default for ScoreProfileChoice {
    fn default() -> Self {
        ScoreProfileChoice::Preset(ScorePreset::ResidentialCondo)
    }
}

impl ScoreProfileChoice {
    pub fn resolve(&self) -> ScoreProfile {
        match self {
            ScoreProfileChoice::Preset(preset) => ScoreProfile::preset(*preset),
            ScoreProfileChoice::Custom(profile) => profile.clone(),
        }
    }
}

impl ScoreProfile {
    pub fn preset(preset: ScorePreset) -> Self {
        match preset {
            ScorePreset::ResidentialCondo => Self::residential_condo(),
            ScorePreset::MultiFamily => Self::multi_family(),
            ScorePreset::Commercial => Self::commercial(),
        }
    }

    /// Single condominium: small absolute cash flows, yield-driven.
    pub fn residential_condo() -> Self {
        Self {
            name: "residential_condo".into(),
            noi_yield: ScoreBand::new(dec!(0.04), dec!(0.08)),
            dscr: ScoreBand::new(dec!(1.1), dec!(1.5)),
            monthly_cash_flow: ScoreBand::new(Decimal::ZERO, dec!(300)),
            vacancy: ScoreBand::new(dec!(0.02), dec!(0.10)),
            weights: ScoreWeights {
                noi_yield: dec!(0.35),
                dscr: dec!(0.25),
                cash_flow: dec!(0.25),
                vacancy: dec!(0.15),
            },
            buy_threshold: dec!(0.70),
            check_threshold: dec!(0.50),
        }
    }

    pub fn multi_family() -> Self {
        Self {
            name: "multi_family".into(),
            noi_yield: ScoreBand::new(dec!(0.04), dec!(0.09)),
            dscr: ScoreBand::new(dec!(1.2), dec!(1.7)),
            monthly_cash_flow: ScoreBand::new(Decimal::ZERO, dec!(1200)),
            vacancy: ScoreBand::new(dec!(0.03), dec!(0.12)),
            weights: ScoreWeights {
                noi_yield: dec!(0.30),
                dscr: dec!(0.30),
                cash_flow: dec!(0.25),
                vacancy: dec!(0.15),
            },
            buy_threshold: dec!(0.70),
            check_threshold: dec!(0.50),
        }
    }

    /// Commercial units: longer vacancies are normal, DSCR weighs more.
    pub fn commercial() -> Self {
        Self {
            name: "commercial".into(),
            noi_yield: ScoreBand::new(dec!(0.045), dec!(0.09)),
            dscr: ScoreBand::new(dec!(1.2), dec!(1.6)),
            monthly_cash_flow: ScoreBand::new(Decimal::ZERO, dec!(1000)),
            vacancy: ScoreBand::new(dec!(0.05), dec!(0.20)),
            weights: ScoreWeights {
                noi_yield: dec!(0.30),
                dscr: dec!(0.30),
                cash_flow: dec!(0.20),
                vacancy: dec!(0.20),
            },
            buy_threshold: dec!(0.70),
            check_threshold: dec!(0.50),
        }
    }

    /// Reject profiles whose weights are not convex or whose bands and
    /// thresholds are out of order.
    pub fn validate(&self) -> ImmoCalcResult<()> {
        let w = &self.weights;
        for (field, weight) in [
            ("weights.noi_yield", w.noi_yield),
            ("weights.dscr", w.dscr),
            ("weights.cash_flow", w.cash_flow),
            ("weights.vacancy", w.vacancy),
        ] {
            if weight < Decimal::ZERO {
                return Err(invalid(field, "Score weights must be non-negative"));
            }
        }
        if (w.sum() - Decimal::ONE).abs() > WEIGHT_TOLERANCE {
            return Err(invalid(
                "weights",
                &format!("Score weights must sum to 1 (got {})", w.sum()),
            ));
        }

        for (field, band) in [
            ("noi_yield", self.noi_yield),
            ("dscr", self.dscr),
            ("monthly_cash_flow", self.monthly_cash_flow),
            ("vacancy", self.vacancy),
        ] {
            if band.high <= band.low {
                return Err(invalid(field, "Band high bound must exceed its low bound"));
            }
        }

        if self.check_threshold < Decimal::ZERO
            || self.buy_threshold > Decimal::ONE
            || self.check_threshold > self.buy_threshold
        {
            return Err(invalid(
                "buy_threshold",
                "Thresholds must satisfy 0 <= check <= buy <= 1",
            ));
        }
        Ok(())
    }

    pub fn verdict(&self, score: Decimal) -> Verdict {
        if score >= self.buy_threshold {
            Verdict::Buy
        } else if score >= self.check_threshold {
            Verdict::Check
        } else {
            Verdict::No
        }
    }
}

fn invalid(field: &str, reason: &str) -> ImmoCalcError {
    log::warn!("rejected score profile: {field}: {reason}");
    ImmoCalcError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "CHECK")]
    Check,
    #[serde(rename = "NO")]
    No,
}

/// The signals a score is computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMetrics {
    pub noi_yield: Rate,
    /// Absent without financing
    pub dscr: Option<Decimal>,
    pub monthly_cash_flow: Money,
    pub vacancy_rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub noi_yield: Decimal,
    pub dscr: Option<Decimal>,
    pub cash_flow: Decimal,
    pub vacancy: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealScore {
    pub profile: String,
    pub score: Decimal,
    pub verdict: Verdict,
    pub components: ScoreComponents,
}

/// Weighted sum of the band-normalised sub-scores.
///
/// Without a DSCR its weight is spread proportionally over the remaining
/// sub-scores, so an all-cash deal is judged on yield, cash flow and vacancy.
pub fn score_deal(metrics: &ScoreMetrics, profile: &ScoreProfile) -> DealScore {
    let components = ScoreComponents {
        noi_yield: profile.noi_yield.normalize(metrics.noi_yield),
        dscr: metrics.dscr.map(|d| profile.dscr.normalize(d)),
        cash_flow: profile.monthly_cash_flow.normalize(metrics.monthly_cash_flow),
        vacancy: Decimal::ONE - profile.vacancy.normalize(metrics.vacancy_rate),
    };

    let w = &profile.weights;
    let mut weighted = w.noi_yield * components.noi_yield
        + w.cash_flow * components.cash_flow
        + w.vacancy * components.vacancy;
    let mut total_weight = w.noi_yield + w.cash_flow + w.vacancy;
    if let Some(dscr) = components.dscr {
        weighted += w.dscr * dscr;
        total_weight += w.dscr;
    }

    let score = if total_weight > Decimal::ZERO {
        clamp01(weighted / total_weight)
    } else {
        Decimal::ZERO
    };

    DealScore {
        profile: profile.name.clone(),
        score,
        verdict: profile.verdict(score),
        components,
    }
}

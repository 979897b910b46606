//! Attrition risk scoring
//!
//! The score is recomputed on every normalization pass. The policy sits behind
//! [`RiskScorer`] so a stored-model scorer can replace the random one without
//! touching the analytics consumers.

use crate::schema::ENGINEERING;
use rand::{Rng, RngCore};

pub const RISK_MIN: f64 = 0.0;
pub const RISK_MAX: f64 = 100.0;
const RISK_BOOST: f64 = 30.0;
const LOW_ENGAGEMENT: f64 = 70.0;
const SHORT_TENURE_YEARS: f64 = 2.0;

/// Per-row inputs a scorer may look at. All slices have the table's height.
pub struct RiskInputs<'a> {
    pub engagement: &'a [f64],
    pub tenure_years: &'a [f64],
    pub departments: &'a [String],
}

impl RiskInputs<'_> {
    pub fn len(&self) -> usize {
        self.engagement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engagement.is_empty()
    }

    /// Rows matching any of the elevated-risk conditions.
    pub fn is_elevated(&self, row: usize) -> bool {
        self.engagement[row] < LOW_ENGAGEMENT
            || self.tenure_years[row] < SHORT_TENURE_YEARS
            || self.departments[row] == ENGINEERING
    }
}

pub trait RiskScorer {
    /// One score per row, each within [`RISK_MIN`, `RISK_MAX`].
    fn score(&self, inputs: &RiskInputs<'_>, rng: &mut dyn RngCore) -> Vec<f64>;

    fn name(&self) -> &'static str;
}

/// Uniform base score with a random boost for elevated-risk rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRiskScorer;

impl RiskScorer for RandomRiskScorer {
    fn score(&self, inputs: &RiskInputs<'_>, rng: &mut dyn RngCore) -> Vec<f64> {
        let mut scores: Vec<f64> = (0..inputs.len())
            .map(|_| rng.gen::<f64>() * RISK_MAX)
            .collect();

        for (row, score) in scores.iter_mut().enumerate() {
            if inputs.is_elevated(row) {
                *score += rng.gen::<f64>() * RISK_BOOST;
            }
        }

        scores.into_iter().map(clamp_and_round).collect()
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Clamps to the score range and rounds to one decimal.
pub fn clamp_and_round(score: f64) -> f64 {
    (score.clamp(RISK_MIN, RISK_MAX) * 10.0).round() / 10.0
}

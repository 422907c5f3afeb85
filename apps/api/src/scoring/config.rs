use serde::{Deserialize, Serialize};

use crate::scoring::aggregate::{SemanticWeights, ScoringWeights, MAX_CERTIFICATION_BONUS};
use crate::scoring::matcher::DEFAULT_THRESHOLD;
use crate::scoring::ScoringError;

/// Every heuristic number the scorers use, as overridable defaults.
///
/// The years-per-entry proxy and the 70/60 match thresholds have no empirical
/// derivation; calibrate them against labeled evaluations before trusting
/// absolute scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub must_have_threshold: u8,
    pub nice_to_have_threshold: u8,
    /// Estimated years of experience contributed by each experience entry.
    pub years_per_entry: f64,
    pub weights: ScoringWeights,
    pub semantic_weights: SemanticWeights,
    pub certification_points: u8,
    pub certification_cap: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            must_have_threshold: DEFAULT_THRESHOLD,
            nice_to_have_threshold: 60,
            years_per_entry: 1.5,
            weights: ScoringWeights::default(),
            semantic_weights: SemanticWeights::default(),
            certification_points: 5,
            certification_cap: MAX_CERTIFICATION_BONUS,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringError> {
        check_threshold("must-have", self.must_have_threshold)?;
        check_threshold("nice-to-have", self.nice_to_have_threshold)?;
        check_weight("years per entry", self.years_per_entry)?;

        let w = &self.weights;
        check_weight("must-have", w.must_have)?;
        check_weight("nice-to-have", w.nice_to_have)?;
        check_weight("education", w.education)?;
        check_weight("experience", w.experience)?;
        check_weight("projects", w.projects)?;
        check_weight("hard score", self.semantic_weights.hard)?;
        check_weight("semantic score", self.semantic_weights.semantic)?;

        if self.certification_cap > MAX_CERTIFICATION_BONUS {
            return Err(ScoringError::InvalidCertificationCap(self.certification_cap));
        }
        Ok(())
    }
}

pub(crate) fn check_threshold(name: &'static str, value: u8) -> Result<(), ScoringError> {
    if value > 100 {
        return Err(ScoringError::InvalidThreshold { name, value });
    }
    Ok(())
}

fn check_weight(name: &'static str, value: f64) -> Result<(), ScoringError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ScoringError::InvalidWeight { name, value });
    }
    Ok(())
}

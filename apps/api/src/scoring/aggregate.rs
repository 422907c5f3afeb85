//! Score aggregation: weighted sub-scores, certification bonus, verdict.
//!
//! Every function here is pure: identical inputs always give identical output.

use serde::{Deserialize, Serialize};

use crate::models::evaluation::Verdict;

pub const MAX_CERTIFICATION_BONUS: u8 = 20;
pub const HIGH_VERDICT_MIN: u8 = 80;
pub const MEDIUM_VERDICT_MIN: u8 = 60;

const TRUNCATION_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub must_have: f64,
    pub nice_to_have: f64,
    pub education: f64,
    pub experience: f64,
    pub projects: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            must_have: 0.35,
            nice_to_have: 0.15,
            education: 0.20,
            experience: 0.20,
            projects: 0.10,
        }
    }
}

/// Weights for blending the rule-based score with the semantic signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticWeights {
    pub hard: f64,
    pub semantic: f64,
}

impl Default for SemanticWeights {
    fn default() -> Self {
        Self {
            hard: 0.6,
            semantic: 0.4,
        }
    }
}

/// The five weighted criteria, each in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubScores {
    pub must_have: u8,
    pub nice_to_have: u8,
    pub education: u8,
    pub experience: u8,
    pub projects: u8,
}

/// `points` per certification, capped at `cap` (itself at most 20).
pub fn certification_bonus(certifications: usize, points: u8, cap: u8) -> u8 {
    let cap = cap.min(MAX_CERTIFICATION_BONUS);
    let bonus = certifications.saturating_mul(points as usize);
    bonus.min(cap as usize) as u8
}

/// Weighted sum plus bonus, truncated toward zero and clamped to 0..=100.
/// The bonus may push the raw total above 100 before the clamp.
pub fn aggregate(scores: &SubScores, bonus: u8, weights: &ScoringWeights) -> u8 {
    let weighted = scores.must_have as f64 * weights.must_have
        + scores.nice_to_have as f64 * weights.nice_to_have
        + scores.education as f64 * weights.education
        + scores.experience as f64 * weights.experience
        + scores.projects as f64 * weights.projects;

    // Float products such as 90 * 0.35 land just under the integer.
    (weighted + bonus as f64 + TRUNCATION_EPSILON)
        .floor()
        .clamp(0.0, 100.0) as u8
}

pub fn verdict_from_score(score: u8) -> Verdict {
    if score >= HIGH_VERDICT_MIN {
        Verdict::High
    } else if score >= MEDIUM_VERDICT_MIN {
        Verdict::Medium
    } else {
        Verdict::Low
    }
}

/// Blends the rule-based score with a semantic similarity score.
pub fn blend_semantic(hard: u8, semantic: u8, weights: &SemanticWeights) -> u8 {
    (hard as f64 * weights.hard + semantic as f64 * weights.semantic)
        .round()
        .clamp(0.0, 100.0) as u8
}

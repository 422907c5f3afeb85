use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::scoring::feedback::Feedback;

/// Three-tier categorical outcome derived from the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Low,
    Medium,
    High,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::High => "High",
            Verdict::Medium => "Medium",
            Verdict::Low => "Low",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full multi-criteria result for one (resume, job) pair.
///
/// All scores lie in 0..=100; `certification_bonus` never exceeds 20.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub final_score: u8,
    pub must_have_score: u8,
    pub nice_to_have_score: u8,
    pub education_score: u8,
    pub experience_score: u8,
    pub project_score: u8,
    pub certification_bonus: u8,
    pub matched_must_have: BTreeSet<String>,
    pub missing_must_have: BTreeSet<String>,
    pub matched_nice_to_have: BTreeSet<String>,
    pub missing_nice_to_have: BTreeSet<String>,
    pub verdict: Verdict,
    pub education_rationale: String,
    pub experience_rationale: String,
    pub project_rationale: String,
}

/// Scoring result enriched with the semantic signal and rendered feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub scoring: ScoringResult,
    pub semantic_score: u8,
    pub blended_score: u8,
    pub feedback: Feedback,
}

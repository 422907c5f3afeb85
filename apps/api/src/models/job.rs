use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Structured requirements extracted from a free-text job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequirements {
    pub title: String,
    pub must_have_skills: BTreeSet<String>,
    pub nice_to_have_skills: BTreeSet<String>,
    pub required_education: Vec<String>,
    /// Free-form, e.g. "1-3 years" or "5+ years".
    pub required_experience: String,
    #[serde(default)]
    pub remote_friendly: bool,
}

impl JobRequirements {
    /// Must-have and nice-to-have skills combined, in sorted order.
    pub fn all_skills(&self) -> Vec<&str> {
        self.must_have_skills
            .union(&self.nice_to_have_skills)
            .map(String::as_str)
            .collect()
    }
}

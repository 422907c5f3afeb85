//! Job description structurer: rule-based extraction of `JobRequirements`.

use std::collections::BTreeSet;
use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::models::job::JobRequirements;
use crate::parsing::catalog::{compile, CatalogError, KeywordCatalog};
use crate::parsing::section::contains_any;

const TITLE_SEARCH_LINES: usize = 5;
const MAX_TITLE_CHARS: usize = 100;

/// Which requirement tier skills on the current line belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkillTier {
    MustHave,
    NiceToHave,
}

pub struct JobStructurer {
    catalog: Arc<KeywordCatalog>,
    experience_range: Regex,
    experience_single: Regex,
}

impl JobStructurer {
    pub fn new(catalog: Arc<KeywordCatalog>) -> Result<Self, CatalogError> {
        let experience_range = compile("experience range", &catalog.experience_range_pattern)?;
        let experience_single =
            compile("experience single", &catalog.experience_single_pattern)?;

        Ok(Self {
            catalog,
            experience_range,
            experience_single,
        })
    }

    pub fn structure(&self, text: &str) -> JobRequirements {
        let lower = text.to_lowercase();
        let (must_have_skills, nice_to_have_skills) = self.extract_skill_tiers(text);

        let requirements = JobRequirements {
            title: self.extract_title(text),
            must_have_skills,
            nice_to_have_skills,
            required_education: self.extract_education(&lower),
            required_experience: self.extract_experience(&lower),
            remote_friendly: lower.contains("remote"),
        };

        debug!(
            title = %requirements.title,
            must_have = requirements.must_have_skills.len(),
            nice_to_have = requirements.nice_to_have_skills.len(),
            experience = %requirements.required_experience,
            "Structured job description"
        );

        requirements
    }

    /// First short non-empty line among the opening lines.
    pub fn extract_title(&self, text: &str) -> String {
        text.lines()
            .take(TITLE_SEARCH_LINES)
            .map(str::trim)
            .find(|line| !line.is_empty() && line.chars().count() < MAX_TITLE_CHARS)
            .map(str::to_string)
            .unwrap_or_else(|| self.catalog.default_job_title.clone())
    }

    /// Walks the posting line by line. Preferred indicators switch to the
    /// nice-to-have tier, required indicators back to must-have; catalog
    /// skills on each line land in whichever tier is current.
    pub fn extract_skill_tiers(&self, text: &str) -> (BTreeSet<String>, BTreeSet<String>) {
        let mut must_have = BTreeSet::new();
        let mut nice_to_have = BTreeSet::new();
        let mut tier = SkillTier::MustHave;

        for line in text.lines() {
            if contains_any(line, &self.catalog.preferred_indicators) {
                tier = SkillTier::NiceToHave;
            } else if contains_any(line, &self.catalog.required_indicators) {
                tier = SkillTier::MustHave;
            }

            let lower = line.to_lowercase();
            let target = match tier {
                SkillTier::MustHave => &mut must_have,
                SkillTier::NiceToHave => &mut nice_to_have,
            };
            for skill in &self.catalog.skills {
                if lower.contains(skill.as_str()) {
                    target.insert(skill.clone());
                }
            }
        }

        (must_have, nice_to_have)
    }

    /// `N-M years` wins over `N+ years`; falls back to the catalog default.
    pub fn extract_experience(&self, lower: &str) -> String {
        self.experience_range
            .find(lower)
            .or_else(|| self.experience_single.find(lower))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| self.catalog.default_experience.clone())
    }

    pub fn extract_education(&self, lower: &str) -> Vec<String> {
        self.catalog
            .job_education_keywords
            .iter()
            .filter(|keyword| lower.contains(keyword.as_str()))
            .map(|keyword| title_case(keyword))
            .collect()
    }
}

/// Upper-cases the first letter of every alphabetic run: "b.tech" → "B.Tech".
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

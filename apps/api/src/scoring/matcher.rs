//! Skill matcher: canonicalization, synonym expansion and token-sort fuzzy
//! similarity between a required skill list and a candidate skill list.

use std::collections::BTreeSet;

use rapidfuzz::fuzz;
use serde::{Deserialize, Serialize};

use crate::parsing::catalog::SynonymGroup;
use crate::scoring::config::check_threshold;
use crate::scoring::ScoringError;

pub const DEFAULT_THRESHOLD: u8 = 70;

/// Outcome of matching one requirement tier.
///
/// `matched` and `missing` partition the canonical required skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub matched: BTreeSet<String>,
    pub missing: BTreeSet<String>,
    pub match_percentage: u8,
}

#[derive(Debug, Clone)]
pub struct SkillMatcher {
    threshold: u8,
    synonyms: Vec<SynonymGroup>,
}

impl SkillMatcher {
    /// Rejects thresholds above 100 eagerly: a bad threshold is a caller bug.
    pub fn new(threshold: u8, synonyms: &[SynonymGroup]) -> Result<Self, ScoringError> {
        check_threshold("skill match", threshold)?;

        let synonyms = synonyms
            .iter()
            .map(|group| SynonymGroup {
                canonical: canonicalize(&group.canonical),
                variants: group.variants.iter().map(|v| canonicalize(v)).collect(),
            })
            .collect();

        Ok(Self {
            threshold,
            synonyms,
        })
    }

    /// Matches every canonical required skill against the candidate skills.
    /// An empty requirement list is fully satisfied (100%).
    pub fn match_skills<R, C>(&self, required: R, candidate: C) -> SkillMatch
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let required = canonical_set(required);
        let candidate: Vec<String> = canonical_set(candidate).into_iter().collect();

        let mut matched = BTreeSet::new();
        let mut missing = BTreeSet::new();

        for skill in required {
            if self.best_similarity(&skill, &candidate) >= f64::from(self.threshold) {
                matched.insert(skill);
            } else {
                missing.insert(skill);
            }
        }

        let total = matched.len() + missing.len();
        let match_percentage = if total == 0 {
            100
        } else {
            (matched.len() * 100 / total) as u8
        };

        SkillMatch {
            matched,
            missing,
            match_percentage,
        }
    }

    /// Highest similarity of `skill`, or any synonym of it, to any candidate.
    fn best_similarity(&self, skill: &str, candidate: &[String]) -> f64 {
        let direct = candidate
            .iter()
            .map(|c| token_sort_ratio(skill, c))
            .fold(0.0, f64::max);

        self.synonyms
            .iter()
            .filter(|group| group.contains(skill))
            .flat_map(|group| group.terms())
            .flat_map(|term| candidate.iter().map(move |c| token_sort_ratio(term, c)))
            .fold(direct, f64::max)
    }
}

/// Lowercase, `-`/`_` become spaces, surrounding whitespace trimmed.
pub fn canonicalize(skill: &str) -> String {
    skill
        .to_lowercase()
        .replace(['-', '_'], " ")
        .trim()
        .to_string()
}

fn canonical_set<I>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    skills
        .into_iter()
        .map(|s| canonicalize(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Order-insensitive similarity in 0.0..=100.0: whitespace tokens are sorted
/// and re-joined, then compared with the Indel ratio `2 * LCS / (|a| + |b|)`.
///
/// Left unrounded so a threshold compare sees e.g. 69.6 as below 70.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let a = sorted_tokens(a);
    let b = sorted_tokens(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    (fuzz::ratio(a.chars(), b.chars()) * 100.0).clamp(0.0, 100.0)
}

fn sorted_tokens(value: &str) -> String {
    let mut tokens: Vec<&str> = value.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::KeywordCatalog;

    fn matcher(threshold: u8) -> SkillMatcher {
        SkillMatcher::new(threshold, &KeywordCatalog::default().synonyms).unwrap()
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_exact_match_at_any_threshold() {
        for threshold in [0, 70, 100] {
            let result = matcher(threshold).match_skills(["python", "sql"], ["python", "sql", "docker"]);
            assert_eq!(result.matched, set(&["python", "sql"]));
            assert!(result.missing.is_empty());
            assert_eq!(result.match_percentage, 100);
        }
    }

    #[test]
    fn test_empty_requirements_are_fully_satisfied() {
        let empty: [&str; 0] = [];
        let result = matcher(70).match_skills(empty, ["rust"]);
        assert_eq!(result.match_percentage, 100);
        assert!(result.matched.is_empty());
        assert!(result.missing.is_empty());

        let result = matcher(70).match_skills(empty, empty);
        assert_eq!(result.match_percentage, 100);
    }

    #[test]
    fn test_synonym_expansion_matches_javascript_to_node() {
        let result = matcher(70).match_skills(["JavaScript"], ["node.js"]);
        assert!(result.matched.contains("javascript"));
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_synonym_variant_as_requirement_expands_group() {
        let result = matcher(70).match_skills(["js"], ["ecmascript"]);
        assert!(result.matched.contains("js"));
    }

    #[test]
    fn test_unrelated_skill_is_missing() {
        let result = matcher(70).match_skills(["kubernetes", "python"], ["python"]);
        assert_eq!(result.matched, set(&["python"]));
        assert_eq!(result.missing, set(&["kubernetes"]));
        assert_eq!(result.match_percentage, 50);
    }

    #[test]
    fn test_match_percentage_truncates() {
        let result = matcher(70).match_skills(["python", "rust", "go"], ["python", "rust"]);
        // 2/3 = 66.67
        assert_eq!(result.match_percentage, 66);
    }

    #[test]
    fn test_canonicalization_of_separators() {
        assert_eq!(canonicalize("  Spring-Boot_API "), "spring boot api");
        let result = matcher(70).match_skills(["scikit-learn"], ["Scikit_Learn"]);
        assert!(result.matched.contains("scikit learn"));
    }

    #[test]
    fn test_token_sort_ratio_is_order_insensitive() {
        assert_eq!(token_sort_ratio("machine learning", "learning machine"), 100.0);
        assert_eq!(token_sort_ratio("rust", ""), 0.0);
        assert!(token_sort_ratio("nodejs", "node.js") >= 70.0);
        assert!(token_sort_ratio("java", "kotlin") < 70.0);
    }

    #[test]
    fn test_token_sort_ratio_uses_common_subsequence() {
        // 2 * 5 / (5 + 8)
        let react = token_sort_ratio("react", "react.js");
        assert!((react - 76.92).abs() < 0.01, "got {react}");
        // 2 * 3 / (3 + 5)
        assert!((token_sort_ratio("sql", "mysql") - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_suffixed_and_prefixed_names_match_at_default_threshold() {
        let result = matcher(DEFAULT_THRESHOLD).match_skills(["react", "sql"], ["react.js", "mysql"]);
        assert_eq!(result.matched, set(&["react", "sql"]));
        assert_eq!(result.match_percentage, 100);
    }

    #[test]
    fn test_threshold_compares_unrounded_ratio() {
        // 76.92 would round up to 77 and pass a threshold of 77.
        let result = matcher(77).match_skills(["react"], ["react.js"]);
        assert_eq!(result.missing, set(&["react"]));
    }

    #[test]
    fn test_matched_and_missing_partition_required() {
        let required = ["Python", "python", "Go", "Haskell", "React-Native", ""];
        let result = matcher(70).match_skills(required, ["python", "golang", "react native"]);

        let union: BTreeSet<String> = result.matched.union(&result.missing).cloned().collect();
        let expected = canonical_set(required);
        assert_eq!(union, expected);
        assert!(result.matched.is_disjoint(&result.missing));
        assert!(result.match_percentage <= 100);
    }

    #[test]
    fn test_threshold_above_100_is_rejected() {
        let err = SkillMatcher::new(150, &[]).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidThreshold { value: 150, .. }));
    }
}

//! Criterion scorers: education level, experience duration and project
//! relevance. Each yields a 0–100 score with a one-line rationale.

use serde::{Deserialize, Serialize};

use crate::models::resume::{EducationEntry, ExperienceEntry, ProjectEntry};
use crate::scoring::matcher::canonicalize;

/// Degree keywords this short must match a whole token ("ba", "be", "ma"),
/// longer ones may appear inside a word ("bachelors").
const MAX_TOKEN_KEYWORD_CHARS: usize = 4;
const CLOSE_EXPERIENCE_RATIO: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub score: u8,
    pub rationale: String,
}

impl CriterionScore {
    fn new(score: u8, rationale: impl Into<String>) -> Self {
        Self {
            score,
            rationale: rationale.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

/// Ordinal degree comparison: certificate=1, diploma=2, bachelor=3,
/// master=4, doctorate=5.
#[derive(Debug, Clone)]
pub struct EducationScorer {
    levels: Vec<(String, u8)>,
}

impl EducationScorer {
    pub fn new(levels: &[(String, u8)]) -> Self {
        Self {
            levels: levels.to_vec(),
        }
    }

    /// Highest degree level named in `text`, 0 when none is recognized.
    pub fn level_of(&self, text: &str) -> u8 {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .filter(|c| *c != '.' && *c != '\'')
            .collect();
        let tokens: Vec<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        self.levels
            .iter()
            .filter(|(keyword, _)| {
                if keyword.chars().count() <= MAX_TOKEN_KEYWORD_CHARS {
                    tokens.contains(&keyword.as_str())
                } else {
                    normalized.contains(keyword.as_str())
                }
            })
            .map(|(_, level)| *level)
            .max()
            .unwrap_or(0)
    }

    pub fn score(&self, required: &[String], candidate: &[EducationEntry]) -> CriterionScore {
        if required.is_empty() {
            return CriterionScore::new(100, "No specific education requirements");
        }
        if candidate.is_empty() {
            return CriterionScore::new(0, "No education information found");
        }

        let required_level = required.iter().map(|r| self.level_of(r)).max().unwrap_or(0);
        let candidate_level = candidate
            .iter()
            .map(|e| self.level_of(&e.degree))
            .max()
            .unwrap_or(0);

        if candidate_level >= required_level {
            CriterionScore::new(100, "Education requirements met")
        } else if candidate_level >= required_level.saturating_sub(1) {
            CriterionScore::new(75, "Close match to education requirements")
        } else {
            CriterionScore::new(25, "Education requirements not fully met")
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// Coarse experience check: every experience entry counts for
/// `years_per_entry` years; durations are not parsed.
#[derive(Debug, Clone)]
pub struct ExperienceScorer {
    years_per_entry: f64,
}

impl ExperienceScorer {
    pub fn new(years_per_entry: f64) -> Self {
        Self { years_per_entry }
    }

    pub fn candidate_years(&self, experience: &[ExperienceEntry]) -> f64 {
        self.years_per_entry * experience.len() as f64
    }

    pub fn score(&self, required: &str, candidate: &[ExperienceEntry]) -> CriterionScore {
        if required.trim().is_empty() || required.to_lowercase().contains("not specified") {
            return CriterionScore::new(100, "No specific experience requirements");
        }

        let required_years = first_integer(required).unwrap_or(0) as f64;
        let years = self.candidate_years(candidate);

        if years >= required_years {
            CriterionScore::new(100, format!("Experience requirement met ({years:.1} years)"))
        } else if years >= required_years * CLOSE_EXPERIENCE_RATIO {
            CriterionScore::new(
                75,
                format!("Close to experience requirement ({years:.1} years)"),
            )
        } else {
            CriterionScore::new(
                40,
                format!("Below experience requirement ({years:.1} years)"),
            )
        }
    }
}

/// First run of ASCII digits in `text`; `None` if absent or out of range.
fn first_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

// ────────────────────────────────────────────────────────────────────────────
// Projects
// ────────────────────────────────────────────────────────────────────────────

/// Averages, over projects that mention at least one job skill, the share of
/// job skills each project mentions.
pub fn score_projects(projects: &[ProjectEntry], job_skills: &[&str]) -> CriterionScore {
    if projects.is_empty() {
        return CriterionScore::new(50, "No projects found");
    }

    let skills: Vec<String> = job_skills
        .iter()
        .map(|s| canonicalize(s))
        .filter(|s| !s.is_empty())
        .collect();
    if skills.is_empty() {
        return CriterionScore::new(80, "Projects present but no specific skills to match");
    }

    let mut relevant = 0usize;
    let mut total = 0.0_f64;

    for project in projects {
        let text = canonicalize(&format!("{} {}", project.title, project.description));
        let hits = skills.iter().filter(|s| text.contains(s.as_str())).count();
        if hits > 0 {
            relevant += 1;
            total += (hits as f64 / skills.len() as f64).min(1.0) * 100.0;
        }
    }

    if relevant == 0 {
        return CriterionScore::new(30, "No relevant projects found");
    }

    let average = (total / relevant as f64).floor().clamp(0.0, 100.0) as u8;
    CriterionScore::new(average, format!("{relevant} relevant projects found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::KeywordCatalog;

    fn education_scorer() -> EducationScorer {
        EducationScorer::new(&KeywordCatalog::default().degree_levels)
    }

    fn degree(text: &str) -> EducationEntry {
        EducationEntry {
            degree: text.to_string(),
            year: None,
            institution: None,
        }
    }

    fn jobs(n: usize) -> Vec<ExperienceEntry> {
        (0..n)
            .map(|i| ExperienceEntry {
                role: None,
                company: format!("Company {i}"),
                duration: "2019 - 2020".to_string(),
            })
            .collect()
    }

    fn project(title: &str, description: &str) -> ProjectEntry {
        ProjectEntry {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_degree_levels() {
        let s = education_scorer();
        assert_eq!(s.level_of("Ph.D. in Physics"), 5);
        assert_eq!(s.level_of("M.Tech Computer Engineering"), 4);
        assert_eq!(s.level_of("MBA"), 4);
        assert_eq!(s.level_of("Bachelor's degree"), 3);
        assert_eq!(s.level_of("B.E. Mechanical"), 3);
        assert_eq!(s.level_of("Diploma in Networking"), 2);
        assert_eq!(s.level_of("Certificate in Data Analytics"), 1);
        assert_eq!(s.level_of("High school"), 0);
    }

    #[test]
    fn test_short_keywords_do_not_match_inside_words() {
        let s = education_scorer();
        assert_eq!(s.level_of("Member of the band"), 0);
    }

    #[test]
    fn test_education_no_requirement_is_full_score() {
        let result = education_scorer().score(&[], &[]);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_education_gap_when_candidate_has_none() {
        let result = education_scorer().score(&["Bachelor".to_string()], &[]);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_education_met_close_and_short() {
        let s = education_scorer();
        let master = ["Master".to_string()];
        assert_eq!(s.score(&master, &[degree("PhD in CS")]).score, 100);
        assert_eq!(s.score(&master, &[degree("Bachelor of Science")]).score, 75);
        assert_eq!(s.score(&master, &[degree("Diploma in IT")]).score, 25);
    }

    #[test]
    fn test_unrecognized_requirement_is_met_by_any_education() {
        let result = education_scorer().score(&["Degree".to_string()], &[degree("Diploma")]);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_experience_unspecified_is_full_score() {
        let scorer = ExperienceScorer::new(1.5);
        assert_eq!(scorer.score("", &[]).score, 100);
        assert_eq!(scorer.score("Not specified", &[]).score, 100);
    }

    #[test]
    fn test_experience_bands() {
        let scorer = ExperienceScorer::new(1.5);
        // 2 entries → 3.0 years
        assert_eq!(scorer.score("3-5 years", &jobs(2)).score, 100);
        // 3.0 ≥ 0.7 × 4 = 2.8
        assert_eq!(scorer.score("4+ years", &jobs(2)).score, 75);
        // 1.5 < 0.7 × 5 = 3.5
        assert_eq!(scorer.score("5+ years", &jobs(1)).score, 40);
    }

    #[test]
    fn test_experience_unparsable_requirement_counts_as_zero_years() {
        let scorer = ExperienceScorer::new(1.5);
        let result = scorer.score("several years", &[]);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_experience_rationale_reports_estimate() {
        let result = ExperienceScorer::new(1.5).score("5 years", &jobs(1));
        assert!(result.rationale.contains("1.5 years"));
    }

    #[test]
    fn test_first_integer() {
        assert_eq!(first_integer("1-3 years"), Some(1));
        assert_eq!(first_integer("10+ years"), Some(10));
        assert_eq!(first_integer("none"), None);
        assert_eq!(first_integer("99999999999999 years"), None);
    }

    #[test]
    fn test_projects_special_cases() {
        assert_eq!(score_projects(&[], &["python"]).score, 50);
        let p = [project("Weather Dashboard", "Charts")];
        assert_eq!(score_projects(&p, &[]).score, 80);
        assert_eq!(score_projects(&p, &["rust"]).score, 30);
    }

    #[test]
    fn test_projects_average_over_relevant_only() {
        let projects = [
            project("Inventory API", "Python and Docker backend"),
            project("Chess Engine", "Written in Rust"),
            project("Garden Planner", "Spreadsheets"),
        ];
        // job skills: python, docker, rust, sql
        // project 1: 2/4 → 50; project 2: 1/4 → 25; project 3 irrelevant
        let result = score_projects(&projects, &["python", "docker", "rust", "sql"]);
        assert_eq!(result.score, 37);
        assert!(result.rationale.starts_with("2 relevant"));
    }

    #[test]
    fn test_projects_canonicalize_skills() {
        let projects = [project("ML Pipeline", "Built with scikit learn")];
        let result = score_projects(&projects, &["Scikit-Learn"]);
        assert_eq!(result.score, 100);
    }
}

//! Feedback generator: turns a `ScoringResult` into prioritized, actionable
//! sections for the candidate.
//!
//! Output is fully determined by the inputs: set iteration is ordered and the
//! certification lookup walks the catalog table in its declared order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::evaluation::{ScoringResult, Verdict};
use crate::models::job::JobRequirements;
use crate::parsing::catalog::CertificationSuggestion;

const MAX_CRITICAL_GAPS: usize = 5;
const MAX_STRENGTHS: usize = 5;
const MAX_NICE_TO_HAVE_GAPS: usize = 3;
const MAX_SUGGESTIONS: usize = 5;
const MAX_RECOMMENDED_CERTIFICATIONS: usize = 3;
const MAX_FOCUS_SKILLS: usize = 3;

const EDUCATION_NOTE_BELOW: u8 = 75;
const EXPERIENCE_NOTE_BELOW: u8 = 75;
const PROJECT_NOTE_BELOW: u8 = 60;
const CERTIFICATION_BONUS_BELOW: u8 = 10;
const ACTION_PLAN_BELOW: u8 = 70;
const PLAN_PROJECTS_BELOW: u8 = 60;
const PLAN_EXPERIENCE_BELOW: u8 = 60;

/// One prioritized step in the improvement plan. Priority 1 is most urgent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub priority: u8,
    pub title: String,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub summary: String,
    pub critical_gaps: Vec<String>,
    pub strengths: Vec<String>,
    pub nice_to_have_gaps: Vec<String>,
    pub education_note: Option<String>,
    pub experience_note: Option<String>,
    pub project_note: Option<String>,
    pub recommended_certifications: Vec<String>,
    pub action_plan: Vec<ActionItem>,
}

#[derive(Debug, Clone)]
pub struct FeedbackGenerator {
    suggestions: Vec<CertificationSuggestion>,
}

impl FeedbackGenerator {
    pub fn new(suggestions: &[CertificationSuggestion]) -> Self {
        Self {
            suggestions: suggestions.to_vec(),
        }
    }

    pub fn generate(&self, result: &ScoringResult, job: &JobRequirements) -> Feedback {
        let recommended_certifications = if result.certification_bonus < CERTIFICATION_BONUS_BELOW {
            self.suggest_certifications(&job.must_have_skills)
                .into_iter()
                .take(MAX_RECOMMENDED_CERTIFICATIONS)
                .collect()
        } else {
            Vec::new()
        };

        let action_plan = if result.final_score < ACTION_PLAN_BELOW {
            action_plan(result)
        } else {
            Vec::new()
        };

        Feedback {
            summary: summary(result.final_score, result.verdict),
            critical_gaps: first_n(&result.missing_must_have, MAX_CRITICAL_GAPS),
            strengths: first_n(&result.matched_must_have, MAX_STRENGTHS),
            nice_to_have_gaps: first_n(&result.missing_nice_to_have, MAX_NICE_TO_HAVE_GAPS),
            education_note: (result.education_score < EDUCATION_NOTE_BELOW)
                .then(|| result.education_rationale.clone()),
            experience_note: (result.experience_score < EXPERIENCE_NOTE_BELOW)
                .then(|| result.experience_rationale.clone()),
            project_note: (result.project_score < PROJECT_NOTE_BELOW).then(|| {
                format!(
                    "{}. Consider adding projects that demonstrate the required skills.",
                    result.project_rationale
                )
            }),
            recommended_certifications,
            action_plan,
        }
    }

    /// Certifications for every table key found inside a required skill,
    /// unique in first-seen order, at most five.
    pub fn suggest_certifications<I>(&self, skills: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for skill in skills {
            let skill = skill.as_ref().to_lowercase();
            for suggestion in &self.suggestions {
                if !skill.contains(suggestion.skill.as_str()) {
                    continue;
                }
                for cert in &suggestion.certifications {
                    if !out.contains(cert) {
                        out.push(cert.clone());
                    }
                }
            }
        }
        out.truncate(MAX_SUGGESTIONS);
        out
    }
}

fn summary(score: u8, verdict: Verdict) -> String {
    let opening = match verdict {
        Verdict::High => "Excellent match!",
        Verdict::Medium => "Good match!",
        Verdict::Low => "Areas for improvement.",
    };
    format!("{opening} Your profile scores {score}/100 with a {verdict} suitability rating.")
}

fn first_n<'a, I>(items: I, n: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    items.into_iter().take(n).cloned().collect()
}

fn action_plan(result: &ScoringResult) -> Vec<ActionItem> {
    let mut plan = Vec::new();

    if !result.missing_must_have.is_empty() {
        plan.push(ActionItem {
            priority: 1,
            title: "Learn critical skills".to_string(),
            steps: result
                .missing_must_have
                .iter()
                .take(MAX_FOCUS_SKILLS)
                .map(|skill| format!("Focus on {skill}"))
                .collect(),
        });
    }

    if result.project_score < PLAN_PROJECTS_BELOW {
        plan.push(ActionItem {
            priority: 2,
            title: "Build relevant projects".to_string(),
            steps: vec![
                "Create 2-3 projects showcasing the missing skills".to_string(),
                "Document projects on GitHub with a clear README".to_string(),
            ],
        });
    }

    if result.experience_score < PLAN_EXPERIENCE_BELOW {
        plan.push(ActionItem {
            priority: 3,
            title: "Gain practical experience".to_string(),
            steps: vec![
                "Look for internships or freelance opportunities".to_string(),
                "Contribute to open-source projects".to_string(),
            ],
        });
    }

    if result.certification_bonus < CERTIFICATION_BONUS_BELOW {
        plan.push(ActionItem {
            priority: 4,
            title: "Consider relevant certifications".to_string(),
            steps: vec!["Start with fundamental certifications in your tech stack".to_string()],
        });
    }

    plan
}

// ────────────────────────────────────────────────────────────────────────────
// Plain-text rendering
// ────────────────────────────────────────────────────────────────────────────

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary)?;

        if !self.critical_gaps.is_empty() {
            writeln!(f, "\nCritical Skills Gap:")?;
            write_bullets(f, &self.critical_gaps)?;
            writeln!(f, "Prioritize learning these essential skills for this role.")?;
        }
        if !self.strengths.is_empty() {
            writeln!(f, "\nStrong Skills Match:")?;
            write_bullets(f, &self.strengths)?;
        }
        if !self.nice_to_have_gaps.is_empty() {
            writeln!(f, "\nNice-to-Have Skills:")?;
            write_bullets(f, &self.nice_to_have_gaps)?;
            writeln!(f, "These would strengthen your profile.")?;
        }
        if let Some(note) = &self.education_note {
            writeln!(f, "\nEducation: {note}")?;
        }
        if let Some(note) = &self.experience_note {
            writeln!(f, "\nExperience: {note}")?;
        }
        if let Some(note) = &self.project_note {
            writeln!(f, "\nProjects: {note}")?;
        }
        if !self.recommended_certifications.is_empty() {
            writeln!(f, "\nRecommended Certifications:")?;
            write_bullets(f, &self.recommended_certifications)?;
        }
        if !self.action_plan.is_empty() {
            writeln!(f, "\nAction Plan for Improvement:")?;
            for item in &self.action_plan {
                writeln!(f, "{}. {}", item.priority, item.title)?;
                for step in &item.steps {
                    writeln!(f, "   - {step}")?;
                }
            }
        }
        Ok(())
    }
}

fn write_bullets(f: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    for item in items {
        writeln!(f, "• {item}")?;
    }
    Ok(())
}

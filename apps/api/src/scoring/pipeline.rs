//! Relevance engine: wires normalization, structuring, matching, criterion
//! scoring, aggregation and feedback into one evaluation pipeline.
//!
//! `RelevanceEngine` is immutable after construction and `Send + Sync`;
//! `AppState` shares one instance behind an `Arc`.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::evaluation::{Evaluation, ScoringResult};
use crate::models::job::JobRequirements;
use crate::models::resume::ResumeRecord;
use crate::parsing::{JobStructurer, KeywordCatalog, ResumeStructurer, TextNormalizer};
use crate::scoring::aggregate::{
    aggregate, blend_semantic, certification_bonus, verdict_from_score, SubScores,
};
use crate::scoring::config::ScoringConfig;
use crate::scoring::criteria::{score_projects, EducationScorer, ExperienceScorer};
use crate::scoring::feedback::{Feedback, FeedbackGenerator};
use crate::scoring::matcher::SkillMatcher;
use crate::scoring::ScoringError;
use crate::semantic::{similarity_or_fallback, SemanticSimilarity};

/// Rule-based outcome for one resume, without the semantic signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub scoring: ScoringResult,
    pub feedback: Feedback,
}

/// One resume submitted for bulk evaluation.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResume {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub id: String,
    #[serde(flatten)]
    pub assessment: Assessment,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub processed_count: usize,
    /// Ids beyond the batch limit, in input order.
    pub skipped: Vec<String>,
    pub results: Vec<BatchEntry>,
}

pub struct RelevanceEngine {
    normalizer: TextNormalizer,
    resumes: ResumeStructurer,
    jobs: JobStructurer,
    must_have: SkillMatcher,
    nice_to_have: SkillMatcher,
    education: EducationScorer,
    experience: ExperienceScorer,
    feedback: FeedbackGenerator,
    config: ScoringConfig,
}

impl RelevanceEngine {
    /// Validates `config` and compiles every catalog pattern up front; a
    /// successfully built engine cannot fail on any input text.
    pub fn new(catalog: KeywordCatalog, config: ScoringConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        let catalog = Arc::new(catalog);

        let engine = Self {
            normalizer: TextNormalizer::new()?,
            resumes: ResumeStructurer::new(Arc::clone(&catalog))?,
            jobs: JobStructurer::new(Arc::clone(&catalog))?,
            must_have: SkillMatcher::new(config.must_have_threshold, &catalog.synonyms)?,
            nice_to_have: SkillMatcher::new(config.nice_to_have_threshold, &catalog.synonyms)?,
            education: EducationScorer::new(&catalog.degree_levels),
            experience: ExperienceScorer::new(config.years_per_entry),
            feedback: FeedbackGenerator::new(&catalog.certification_suggestions),
            config,
        };

        info!(
            must_have_threshold = engine.config.must_have_threshold,
            nice_to_have_threshold = engine.config.nice_to_have_threshold,
            years_per_entry = engine.config.years_per_entry,
            "Relevance engine ready"
        );
        Ok(engine)
    }

    /// Normalizes and structures raw resume text.
    pub fn parse_resume(&self, raw: &str) -> ResumeRecord {
        self.resumes.structure(&self.normalizer.normalize(raw))
    }

    pub fn parse_job(&self, text: &str) -> JobRequirements {
        self.jobs.structure(&self.normalizer.normalize(text))
    }

    /// Multi-criteria score of `resume` against `job`. Pure: identical
    /// inputs always give an identical result.
    pub fn score(&self, resume: &ResumeRecord, job: &JobRequirements) -> ScoringResult {
        let must = self
            .must_have
            .match_skills(&job.must_have_skills, &resume.skills);
        let nice = self
            .nice_to_have
            .match_skills(&job.nice_to_have_skills, &resume.skills);
        let education = self
            .education
            .score(&job.required_education, &resume.education);
        let experience = self
            .experience
            .score(&job.required_experience, &resume.experience);
        let projects = score_projects(&resume.projects, &job.all_skills());

        let bonus = certification_bonus(
            resume.certifications.len(),
            self.config.certification_points,
            self.config.certification_cap,
        );
        let sub_scores = SubScores {
            must_have: must.match_percentage,
            nice_to_have: nice.match_percentage,
            education: education.score,
            experience: experience.score,
            projects: projects.score,
        };
        let final_score = aggregate(&sub_scores, bonus, &self.config.weights);

        debug!(
            final_score,
            must_have = must.match_percentage,
            nice_to_have = nice.match_percentage,
            education = education.score,
            experience = experience.score,
            projects = projects.score,
            bonus,
            "Scored resume"
        );

        ScoringResult {
            final_score,
            must_have_score: must.match_percentage,
            nice_to_have_score: nice.match_percentage,
            education_score: education.score,
            experience_score: experience.score,
            project_score: projects.score,
            certification_bonus: bonus,
            matched_must_have: must.matched,
            missing_must_have: must.missing,
            matched_nice_to_have: nice.matched,
            missing_nice_to_have: nice.missing,
            verdict: verdict_from_score(final_score),
            education_rationale: education.rationale,
            experience_rationale: experience.rationale,
            project_rationale: projects.rationale,
        }
    }

    pub fn feedback(&self, result: &ScoringResult, job: &JobRequirements) -> Feedback {
        self.feedback.generate(result, job)
    }

    /// Score plus feedback, no external calls.
    pub fn evaluate(&self, resume: &ResumeRecord, job: &JobRequirements) -> Assessment {
        let scoring = self.score(resume, job);
        let feedback = self.feedback(&scoring, job);
        Assessment { scoring, feedback }
    }

    /// Full evaluation including the semantic signal. The similarity call is
    /// the only await point and falls back to a neutral score on failure.
    pub async fn evaluate_with_semantic(
        &self,
        resume: &ResumeRecord,
        job: &JobRequirements,
        job_text: &str,
        service: &dyn SemanticSimilarity,
        timeout: Duration,
    ) -> Evaluation {
        let Assessment { scoring, feedback } = self.evaluate(resume, job);
        let semantic_score =
            similarity_or_fallback(service, job_text, &resume.raw_text, timeout).await;
        self.assemble(scoring, feedback, semantic_score)
    }

    fn assemble(&self, scoring: ScoringResult, feedback: Feedback, semantic_score: u8) -> Evaluation {
        let blended_score = blend_semantic(
            scoring.final_score,
            semantic_score,
            &self.config.semantic_weights,
        );
        Evaluation {
            scoring,
            semantic_score,
            blended_score,
            feedback,
        }
    }

    /// Evaluates at most `limit` resumes in input order; the remainder are
    /// reported by id as skipped.
    pub fn evaluate_batch(
        &self,
        resumes: &[BatchResume],
        job: &JobRequirements,
        limit: usize,
    ) -> BatchOutcome {
        let cutoff = limit.min(resumes.len());
        let (accepted, rejected) = resumes.split_at(cutoff);

        let results: Vec<BatchEntry> = accepted
            .iter()
            .map(|resume| BatchEntry {
                id: resume.id.clone(),
                assessment: self.evaluate(&self.parse_resume(&resume.text), job),
            })
            .collect();

        info!(
            processed = results.len(),
            skipped = rejected.len(),
            "Batch evaluation complete"
        );

        BatchOutcome {
            processed_count: results.len(),
            skipped: rejected.iter().map(|r| r.id.clone()).collect(),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::evaluation::Verdict;
    use crate::models::resume::EducationEntry;
    use crate::semantic::FixedSimilarity;

    const RESUME: &str = "Jane Doe
Backend Developer

Skills
Python, SQL, Docker, FastAPI

Education
Bachelor of Science in Computer Science 2018
Tech University

Experience
Backend Engineer
Initech, 2018 - 2020
Senior Backend Engineer
Globex, Mar 2020 - Present

Certifications
AWS Certified Developer

Projects
Payments Reconciliation API
Python service with FastAPI and SQL storage.
";

    const JD: &str = "Backend Python Engineer

Required:
- Python, SQL and FastAPI
- 2+ years of experience

Nice to have:
- Kubernetes
- Docker

Education: Bachelor degree
";

    fn engine() -> RelevanceEngine {
        RelevanceEngine::new(KeywordCatalog::default(), ScoringConfig::default()).unwrap()
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn resume_with(skills: &[&str]) -> ResumeRecord {
        ResumeRecord {
            raw_text: String::new(),
            skills: set(skills),
            education: vec![EducationEntry {
                degree: "Bachelor of Engineering".to_string(),
                year: Some(2020),
                institution: None,
            }],
            experience: Vec::new(),
            certifications: BTreeSet::new(),
            projects: Vec::new(),
            parsed_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn job_with(must: &[&str], nice: &[&str]) -> JobRequirements {
        JobRequirements {
            title: "Engineer".to_string(),
            must_have_skills: set(must),
            nice_to_have_skills: set(nice),
            required_education: vec!["Bachelor".to_string()],
            required_experience: String::new(),
            remote_friendly: false,
        }
    }

    #[test]
    fn test_full_pipeline_scores_a_strong_candidate() {
        let e = engine();
        let resume = e.parse_resume(RESUME);
        let job = e.parse_job(JD);
        let result = e.score(&resume, &job);

        assert!(result.missing_must_have.is_empty(), "{result:?}");
        assert_eq!(result.must_have_score, 100);
        assert_eq!(result.education_score, 100);
        assert_eq!(result.experience_score, 100);
        assert_eq!(result.certification_bonus, 5);
        assert!(result.matched_nice_to_have.contains("docker"));
        assert!(result.missing_nice_to_have.contains("kubernetes"));
        assert!(result.final_score >= 80);
        assert_eq!(result.verdict, Verdict::High);
    }

    #[test]
    fn test_score_is_idempotent() {
        let e = engine();
        let resume = e.parse_resume(RESUME);
        let job = e.parse_job(JD);
        assert_eq!(e.score(&resume, &job), e.score(&resume, &job));
    }

    #[test]
    fn test_tiers_partition_required_skills() {
        let e = engine();
        let job = job_with(&["python", "rust", "go"], &["docker"]);
        let result = e.score(&resume_with(&["python", "golang"]), &job);

        let union: BTreeSet<String> = result
            .matched_must_have
            .union(&result.missing_must_have)
            .cloned()
            .collect();
        assert_eq!(union, job.must_have_skills);
        assert!(result.matched_must_have.is_disjoint(&result.missing_must_have));
        assert!(result.missing_nice_to_have.contains("docker"));
    }

    #[test]
    fn test_empty_requirements_score_full_on_skill_tiers() {
        let result = engine().score(&resume_with(&[]), &job_with(&[], &[]));
        assert_eq!(result.must_have_score, 100);
        assert_eq!(result.nice_to_have_score, 100);
        assert!(result.missing_must_have.is_empty());
    }

    #[test]
    fn test_empty_resume_never_panics() {
        let e = engine();
        let resume = e.parse_resume("");
        let job = e.parse_job("");
        let result = e.score(&resume, &job);
        assert!(result.final_score <= 100);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ScoringConfig {
            must_have_threshold: 101,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            RelevanceEngine::new(KeywordCatalog::default(), config),
            Err(ScoringError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_bad_catalog_pattern_is_rejected() {
        let catalog = KeywordCatalog {
            degree_pattern: "(unclosed".to_string(),
            ..KeywordCatalog::default()
        };
        assert!(matches!(
            RelevanceEngine::new(catalog, ScoringConfig::default()),
            Err(ScoringError::Catalog(_))
        ));
    }

    #[test]
    fn test_batch_respects_limit_and_order() {
        let e = engine();
        let job = e.parse_job(JD);
        let resumes: Vec<BatchResume> = (0..4)
            .map(|i| BatchResume {
                id: format!("r{i}"),
                text: RESUME.to_string(),
            })
            .collect();

        let outcome = e.evaluate_batch(&resumes, &job, 3);
        assert_eq!(outcome.processed_count, 3);
        assert_eq!(outcome.skipped, vec!["r3"]);
        let ids: Vec<&str> = outcome.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r0", "r1", "r2"]);
    }

    #[test]
    fn test_batch_with_zero_limit_skips_everything() {
        let e = engine();
        let job = e.parse_job(JD);
        let resumes = vec![BatchResume {
            id: "only".to_string(),
            text: RESUME.to_string(),
        }];
        let outcome = e.evaluate_batch(&resumes, &job, 0);
        assert_eq!(outcome.processed_count, 0);
        assert_eq!(outcome.skipped, vec!["only"]);
    }

    #[tokio::test]
    async fn test_evaluate_with_semantic_blends_scores() {
        let e = engine();
        let resume = e.parse_resume(RESUME);
        let job = e.parse_job(JD);
        let evaluation = e
            .evaluate_with_semantic(&resume, &job, JD, &FixedSimilarity(50), Duration::from_secs(1))
            .await;

        assert_eq!(evaluation.semantic_score, 50);
        let expected = (evaluation.scoring.final_score as f64 * 0.6 + 50.0 * 0.4).round() as u8;
        assert_eq!(evaluation.blended_score, expected);
    }
}

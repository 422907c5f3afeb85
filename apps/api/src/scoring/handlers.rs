//! Axum route handlers for the parsing and evaluation API.
//!
//! Parsing is CPU-bound and runs inside `spawn_blocking`. A single
//! evaluation is scored through `RelevanceEngine::evaluate_with_semantic`,
//! whose similarity call is the only await point.

use std::collections::BTreeSet;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::evaluation::Evaluation;
use crate::models::job::JobRequirements;
use crate::models::resume::ResumeRecord;
use crate::scoring::matcher::canonicalize;
use crate::scoring::pipeline::{BatchOutcome, BatchResume};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseResumeRequest {
    pub raw_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseJobRequest {
    pub jd_text: String,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub resume_text: String,
    pub jd_text: String,
    /// Overrides the must-have skills parsed from `jd_text`.
    pub must_have: Option<Vec<String>>,
    pub nice_to_have: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub evaluation_id: Uuid,
    pub job: JobRequirements,
    pub evaluation: Evaluation,
}

#[derive(Debug, Deserialize)]
pub struct BulkEvaluateRequest {
    pub jd_text: String,
    pub must_have: Option<Vec<String>>,
    pub nice_to_have: Option<Vec<String>>,
    pub resumes: Vec<BatchResume>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/parse
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<ResumeRecord>, AppError> {
    let engine = state.engine.clone();
    let record = run_blocking(move || engine.parse_resume(&request.raw_text)).await?;
    Ok(Json(record))
}

/// POST /api/v1/jobs/parse
pub async fn handle_parse_job(
    State(state): State<AppState>,
    Json(request): Json<ParseJobRequest>,
) -> Result<Json<JobRequirements>, AppError> {
    require_jd_text(&request.jd_text)?;

    let engine = state.engine.clone();
    let job = run_blocking(move || engine.parse_job(&request.jd_text)).await?;
    Ok(Json(job))
}

/// POST /api/v1/evaluations
///
/// Scores one resume against one job description and attaches the
/// semantic signal and feedback.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    require_jd_text(&request.jd_text)?;

    let engine = state.engine.clone();
    let EvaluateRequest {
        resume_text,
        jd_text,
        must_have,
        nice_to_have,
    } = request;

    let (resume, job, jd_text) = run_blocking(move || {
        let resume = engine.parse_resume(&resume_text);
        let job = apply_overrides(engine.parse_job(&jd_text), must_have, nice_to_have);
        (resume, job, jd_text)
    })
    .await?;

    let evaluation = state
        .engine
        .evaluate_with_semantic(
            &resume,
            &job,
            &jd_text,
            state.semantic.as_ref(),
            state.config.semantic_timeout,
        )
        .await;
    let evaluation_id = Uuid::new_v4();

    info!(
        %evaluation_id,
        final_score = evaluation.scoring.final_score,
        semantic_score = evaluation.semantic_score,
        blended_score = evaluation.blended_score,
        verdict = %evaluation.scoring.verdict,
        "Evaluation complete"
    );

    Ok(Json(EvaluateResponse {
        evaluation_id,
        job,
        evaluation,
    }))
}

/// POST /api/v1/evaluations/bulk
///
/// Rule-based scoring only; the semantic call is skipped so a batch costs no
/// network round-trips.
pub async fn handle_bulk_evaluate(
    State(state): State<AppState>,
    Json(request): Json<BulkEvaluateRequest>,
) -> Result<Json<BatchOutcome>, AppError> {
    require_jd_text(&request.jd_text)?;

    let engine = state.engine.clone();
    let limit = state.config.bulk_batch_limit;

    let outcome = run_blocking(move || {
        let job = apply_overrides(
            engine.parse_job(&request.jd_text),
            request.must_have,
            request.nice_to_have,
        );
        engine.evaluate_batch(&request.resumes, &job, limit)
    })
    .await?;

    Ok(Json(outcome))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn require_jd_text(jd_text: &str) -> Result<(), AppError> {
    if jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }
    Ok(())
}

/// Explicit skill lists replace the tiers parsed from the posting.
fn apply_overrides(
    mut job: JobRequirements,
    must_have: Option<Vec<String>>,
    nice_to_have: Option<Vec<String>>,
) -> JobRequirements {
    if let Some(skills) = must_have {
        job.must_have_skills = canonical_skills(skills);
    }
    if let Some(skills) = nice_to_have {
        job.nice_to_have_skills = canonical_skills(skills);
    }
    job
}

fn canonical_skills(skills: Vec<String>) -> BTreeSet<String> {
    skills
        .iter()
        .map(|s| canonicalize(s))
        .filter(|s| !s.is_empty())
        .collect()
}

async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in scoring: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> JobRequirements {
        JobRequirements {
            title: "Engineer".to_string(),
            must_have_skills: ["python".to_string()].into_iter().collect(),
            nice_to_have_skills: ["docker".to_string()].into_iter().collect(),
            required_education: Vec::new(),
            required_experience: "1-3 years".to_string(),
            remote_friendly: false,
        }
    }

    #[test]
    fn test_overrides_replace_parsed_tiers() {
        let job = apply_overrides(
            job(),
            Some(vec!["Rust".to_string(), "  ".to_string(), "Tokio-Runtime".to_string()]),
            None,
        );
        let must: Vec<&str> = job.must_have_skills.iter().map(String::as_str).collect();
        assert_eq!(must, vec!["rust", "tokio runtime"]);
        assert!(job.nice_to_have_skills.contains("docker"));
    }

    #[test]
    fn test_no_overrides_keep_parsed_tiers() {
        assert_eq!(apply_overrides(job(), None, None), job());
    }

    #[test]
    fn test_blank_jd_text_is_rejected() {
        assert!(matches!(require_jd_text("  \n"), Err(AppError::Validation(_))));
        assert!(require_jd_text("Rust Engineer").is_ok());
    }
}

/// Semantic similarity: the optional embedding-based signal blended into the
/// rule-based score.
///
/// Every call is time-bounded and fails soft: any `SemanticUnavailable`
/// becomes `FALLBACK_SCORE` at `similarity_or_fallback`, never an HTTP error.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Neutral score used whenever the similarity service cannot answer.
pub const FALLBACK_SCORE: u8 = 50;
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Error)]
pub enum SemanticUnavailable {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed embedding response: {0}")]
    Malformed(String),

    #[error("Similarity call timed out after {0:?}")]
    Timeout(Duration),
}

/// Scores how semantically close a resume is to a job description, 0..=100.
///
/// Carried in `AppState` as `Arc<dyn SemanticSimilarity>`.
#[async_trait]
pub trait SemanticSimilarity: Send + Sync {
    async fn similarity(&self, job_text: &str, resume_text: &str)
        -> Result<u8, SemanticUnavailable>;
}

// ────────────────────────────────────────────────────────────────────────────
// FixedSimilarity: constant stand-in when no service is configured
// ────────────────────────────────────────────────────────────────────────────

pub struct FixedSimilarity(pub u8);

impl Default for FixedSimilarity {
    fn default() -> Self {
        Self(FALLBACK_SCORE)
    }
}

#[async_trait]
impl SemanticSimilarity for FixedSimilarity {
    async fn similarity(&self, _job_text: &str, _resume_text: &str) -> Result<u8, SemanticUnavailable> {
        Ok(self.0.min(100))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// EmbeddingClient: OpenAI-compatible embeddings endpoint
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 2],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}

/// Embeds the job and resume in one request and maps their cosine
/// similarity onto 0..=100.
#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl EmbeddingClient {
    pub fn new(
        url: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SemanticUnavailable> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            model,
            api_key,
        })
    }
}

#[async_trait]
impl SemanticSimilarity for EmbeddingClient {
    async fn similarity(&self, job_text: &str, resume_text: &str) -> Result<u8, SemanticUnavailable> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: [job_text, resume_text],
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SemanticUnavailable::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        let score = score_embeddings(&parsed)?;
        debug!(score, model = %self.model, "Semantic similarity computed");
        Ok(score)
    }
}

fn score_embeddings(response: &EmbeddingResponse) -> Result<u8, SemanticUnavailable> {
    match response.data.as_slice() {
        [job, resume, ..] => {
            if job.embedding.is_empty() || job.embedding.len() != resume.embedding.len() {
                return Err(SemanticUnavailable::Malformed(format!(
                    "embedding dimensions {} and {}",
                    job.embedding.len(),
                    resume.embedding.len()
                )));
            }
            Ok(cosine_to_score(cosine(&job.embedding, &resume.embedding)))
        }
        other => Err(SemanticUnavailable::Malformed(format!(
            "expected 2 embeddings, got {}",
            other.len()
        ))),
    }
}

/// Zero vectors give 0 rather than NaN.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    dot / (norm_a * norm_b + 1e-12)
}

/// Maps cosine similarity in [-1, 1] onto 0..=100.
pub fn cosine_to_score(cos: f64) -> u8 {
    if !cos.is_finite() {
        return FALLBACK_SCORE;
    }
    ((cos.clamp(-1.0, 1.0) + 1.0) / 2.0 * 100.0).round() as u8
}

/// Calls `service` under `timeout`; any failure is logged and replaced by
/// `FALLBACK_SCORE`.
pub async fn similarity_or_fallback(
    service: &dyn SemanticSimilarity,
    job_text: &str,
    resume_text: &str,
    timeout: Duration,
) -> u8 {
    let outcome = match tokio::time::timeout(timeout, service.similarity(job_text, resume_text)).await {
        Ok(result) => result,
        Err(_) => Err(SemanticUnavailable::Timeout(timeout)),
    };

    match outcome {
        Ok(score) => score.min(100),
        Err(e) => {
            warn!("Semantic similarity unavailable, using fallback {FALLBACK_SCORE}: {e}");
            FALLBACK_SCORE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowSimilarity;

    #[async_trait]
    impl SemanticSimilarity for SlowSimilarity {
        async fn similarity(&self, _job: &str, _resume: &str) -> Result<u8, SemanticUnavailable> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(99)
        }
    }

    struct FailingSimilarity;

    #[async_trait]
    impl SemanticSimilarity for FailingSimilarity {
        async fn similarity(&self, _job: &str, _resume: &str) -> Result<u8, SemanticUnavailable> {
            Err(SemanticUnavailable::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    fn response(vectors: Vec<Vec<f64>>) -> EmbeddingResponse {
        EmbeddingResponse {
            data: vectors
                .into_iter()
                .map(|embedding| EmbeddingData { embedding })
                .collect(),
        }
    }

    #[test]
    fn test_cosine_to_score_range() {
        assert_eq!(cosine_to_score(1.0), 100);
        assert_eq!(cosine_to_score(0.0), 50);
        assert_eq!(cosine_to_score(-1.0), 0);
        assert_eq!(cosine_to_score(f64::NAN), FALLBACK_SCORE);
    }

    #[test]
    fn test_identical_embeddings_score_100() {
        let r = response(vec![vec![0.3, 0.4, 0.5], vec![0.3, 0.4, 0.5]]);
        assert_eq!(score_embeddings(&r).unwrap(), 100);
    }

    #[test]
    fn test_orthogonal_embeddings_score_50() {
        let r = response(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(score_embeddings(&r).unwrap(), 50);
    }

    #[test]
    fn test_zero_vector_does_not_produce_nan() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_malformed_responses_are_rejected() {
        assert!(matches!(
            score_embeddings(&response(vec![vec![1.0]])),
            Err(SemanticUnavailable::Malformed(_))
        ));
        assert!(matches!(
            score_embeddings(&response(vec![vec![1.0, 2.0], vec![1.0]])),
            Err(SemanticUnavailable::Malformed(_))
        ));
    }

    #[test]
    fn test_embedding_response_deserializes() {
        let json = r#"{"data":[{"embedding":[1.0,0.0]},{"embedding":[1.0,0.0]}],"model":"m"}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(score_embeddings(&parsed).unwrap(), 100);
    }

    #[tokio::test]
    async fn test_fixed_similarity() {
        assert_eq!(FixedSimilarity(73).similarity("a", "b").await.unwrap(), 73);
        assert_eq!(FixedSimilarity::default().similarity("a", "b").await.unwrap(), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back_to_50() {
        let score =
            similarity_or_fallback(&SlowSimilarity, "job", "resume", Duration::from_millis(100)).await;
        assert_eq!(score, FALLBACK_SCORE);
    }

    #[tokio::test]
    async fn test_error_falls_back_to_50() {
        let score = similarity_or_fallback(&FailingSimilarity, "job", "resume", DEFAULT_TIMEOUT).await;
        assert_eq!(score, FALLBACK_SCORE);
    }

    #[tokio::test]
    async fn test_successful_call_passes_through() {
        let score = similarity_or_fallback(&FixedSimilarity(81), "job", "resume", DEFAULT_TIMEOUT).await;
        assert_eq!(score, 81);
    }
}

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::parsing::KeywordCatalog;
use crate::scoring::RelevanceEngine;
use crate::semantic::{EmbeddingClient, FixedSimilarity, SemanticSimilarity};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub engine: Arc<RelevanceEngine>,
    /// Pluggable similarity backend. `FixedSimilarity` unless
    /// SEMANTIC_SERVICE_URL is set.
    pub semantic: Arc<dyn SemanticSimilarity>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let engine = RelevanceEngine::new(KeywordCatalog::default(), config.scoring.clone())?;

        let semantic: Arc<dyn SemanticSimilarity> = match &config.semantic_service_url {
            Some(url) => {
                let client = EmbeddingClient::new(
                    url.clone(),
                    config.semantic_model.clone(),
                    config.semantic_api_key.clone(),
                    config.semantic_timeout,
                )
                .context("Failed to build semantic similarity client")?;
                info!("Semantic similarity enabled (model: {})", config.semantic_model);
                Arc::new(client)
            }
            None => {
                info!("Semantic similarity disabled, using fixed fallback score");
                Arc::new(FixedSimilarity::default())
            }
        };

        Ok(Self {
            config,
            engine: Arc::new(engine),
            semantic,
        })
    }
}

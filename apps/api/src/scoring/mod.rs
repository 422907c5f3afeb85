// Scoring layer: skill matching, criterion scorers, weighted aggregation and
// feedback. Pure and synchronous; the only await point is the optional
// semantic similarity call made by `pipeline::RelevanceEngine`.

pub mod aggregate;
pub mod config;
pub mod criteria;
pub mod feedback;
pub mod handlers;
pub mod matcher;
pub mod pipeline;

use thiserror::Error;

use crate::parsing::CatalogError;

pub use config::ScoringConfig;
pub use pipeline::RelevanceEngine;

/// Configuration errors. These are caller bugs, rejected when a component is
/// built; scoring itself never fails on data.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Invalid {name} threshold {value}: must be within 0..=100")]
    InvalidThreshold { name: &'static str, value: u8 },

    #[error("Invalid {name} weight {value}: must be finite and non-negative")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("Invalid certification cap {0}: must not exceed 20")]
    InvalidCertificationCap(u8),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

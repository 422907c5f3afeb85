// Extraction layer: raw text → normalized text → structured records.
// Every scan is heuristic and best-effort; malformed input degrades to empty
// collections or catalog defaults, never to an error.

pub mod catalog;
pub mod job;
pub mod normalize;
pub mod resume;
pub mod section;

pub use catalog::{CatalogError, KeywordCatalog};
pub use job::JobStructurer;
pub use normalize::TextNormalizer;
pub use resume::ResumeStructurer;

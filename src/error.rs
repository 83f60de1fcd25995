//! Error types shared across the recommender

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, RecommenderError>;

/// Recommender error types
#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error("Term frequency fetch failed: {0}")]
    BackendUnavailable(String),

    #[error("Similarity query failed: {0}")]
    BackendQuery(String),

    #[error("No document frequency recorded for card: {0}")]
    MissingTermFrequency(String),

    #[error("Collection has {size} distinct cards, need at least {required}")]
    InsufficientCollectionSize { size: usize, required: usize },

    #[error("Relevant set is empty")]
    EmptyRelevantSet,

    #[error("Unknown df weighting: {0}")]
    UnknownDfWeighting(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Malformed deck file: {0}")]
    MalformedDeck(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

//! Recommendation scoring

pub mod config;
pub mod scorer;

pub use config::{DfWeighting, ScoringConfig};
pub use scorer::{RecommendRequest, Recommender};

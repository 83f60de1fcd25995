//! Commander deck card recommendations backed by more-like-this
//! similarity search over a corpus of assembled decks.
//!
//! Given a partial card list, [`recommend::Recommender`] retrieves
//! similar decks through a [`backend::SimilarityBackend`] and aggregates
//! their card lists into a ranked list of novel suggestions under a
//! configurable scoring policy. The [`eval`] module splits known decks
//! into held-out test cases, measures ranking quality, and sweeps
//! parameter grids across a deck sample.

pub mod backend;
pub mod deck;
pub mod error;
pub mod eval;
pub mod metrics;
pub mod recommend;

pub use error::{RecommenderError, Result};

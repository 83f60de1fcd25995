//! Similarity backend abstraction and the Solr implementation

pub mod config;
pub mod models;
pub mod solr;
pub mod term_cache;

pub use config::SolrConfig;
pub use models::SimilarDeck;
pub use solr::SolrBackend;
pub use term_cache::TermFrequencyCache;

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// A ranked-neighbor similarity service over the deck corpus
#[async_trait]
pub trait SimilarityBackend: Send + Sync {
    /// Top similar decks for a query document, backend relevance order.
    ///
    /// `rows` is handed to the backend's result-limit parameter unchanged;
    /// the backend may return fewer.
    async fn more_like_this(&self, query_doc: &str, rows: usize) -> Result<Vec<SimilarDeck>>;

    /// Corpus-wide document frequency per card
    async fn term_frequencies(&self) -> Result<HashMap<String, u64>>;
}

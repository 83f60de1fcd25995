//! Process-wide document frequency table, fetched once and shared
//!
//! The corpus frequency table is large and changes only when the index is
//! rebuilt, so it is fetched in a single backend call on first use and
//! kept for the process lifetime. Refreshing means restarting.

use super::SimilarityBackend;
use crate::error::{RecommenderError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Lazily initialized corpus document frequencies
pub struct TermFrequencyCache {
    backend: Arc<dyn SimilarityBackend>,
    table: OnceCell<HashMap<String, u64>>,
}

impl TermFrequencyCache {
    /// Create a cache backed by the given similarity service
    pub fn new(backend: Arc<dyn SimilarityBackend>) -> Self {
        Self {
            backend,
            table: OnceCell::new(),
        }
    }

    /// The full frequency table, fetching it on first use.
    ///
    /// Concurrent callers share a single fetch; once initialized the table
    /// is immutable and reads take no lock.
    pub async fn table(&self) -> Result<&HashMap<String, u64>> {
        self.table
            .get_or_try_init(|| async {
                info!("Fetching corpus term frequencies");
                let table = self.backend.term_frequencies().await?;
                debug!("Term frequency table holds {} cards", table.len());
                Ok(table)
            })
            .await
    }

    /// Document frequency for one card.
    ///
    /// A card missing from a complete corpus table is a data error, not a
    /// frequency of zero.
    pub async fn document_frequency(&self, card: &str) -> Result<u64> {
        self.table()
            .await?
            .get(card)
            .copied()
            .ok_or_else(|| RecommenderError::MissingTermFrequency(card.to_string()))
    }
}

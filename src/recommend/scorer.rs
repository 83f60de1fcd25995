//! Recommendation scoring over backend neighbors

use super::config::{DfWeighting, ScoringConfig};
use crate::backend::{SimilarityBackend, TermFrequencyCache};
use crate::error::{RecommenderError, Result};
use crate::metrics::METRICS;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// A request for card suggestions
#[derive(Debug, Clone)]
pub struct RecommendRequest {
    /// Observed cards, deck order
    pub cards: Vec<String>,
    /// Corpus id to skip among neighbors (the query deck itself, when it
    /// is part of the stored corpus)
    pub exclude_id: Option<String>,
    /// Maximum suggestions returned
    pub k: usize,
}

/// Generates ranked novel-card suggestions from similar decks
pub struct Recommender {
    backend: Arc<dyn SimilarityBackend>,
    term_frequencies: Arc<TermFrequencyCache>,
}

impl Recommender {
    /// Create a recommender over the given backend and frequency cache
    pub fn new(
        backend: Arc<dyn SimilarityBackend>,
        term_frequencies: Arc<TermFrequencyCache>,
    ) -> Self {
        Self {
            backend,
            term_frequencies,
        }
    }

    /// Ranked card suggestions for the request.
    ///
    /// Returns at most `request.k` cards, none of which appear in the
    /// request, ordered by descending aggregated score with first-seen
    /// order breaking ties. An empty neighbor set yields an empty list.
    pub async fn recommend(
        &self,
        request: &RecommendRequest,
        config: &ScoringConfig,
    ) -> Result<Vec<String>> {
        let ranked = self.score(request, config).await?;
        METRICS.recommendations_generated.inc();
        Ok(ranked.into_iter().map(|(card, _)| card).collect())
    }

    /// Accumulated scores in final rank order, truncated to the request's k
    async fn score(
        &self,
        request: &RecommendRequest,
        config: &ScoringConfig,
    ) -> Result<Vec<(String, f64)>> {
        config.validate()?;

        // An empty query passes through as an empty document; what that
        // matches is the backend's business.
        let query_doc = request.cards.join(" ");
        let query_set: HashSet<&str> = request.cards.iter().map(String::as_str).collect();

        let neighbors = self
            .backend
            .more_like_this(&query_doc, config.similar_decks_count)
            .await?;
        debug!(
            "Scoring {} similar decks for a query of {} cards",
            neighbors.len(),
            query_set.len()
        );

        let term_table = match config.df_weighting {
            DfWeighting::None => None,
            _ => Some(self.term_frequencies.table().await?),
        };

        let mut scores: IndexMap<String, f64> = IndexMap::new();
        let mut discount = 1.0_f64;
        for neighbor in &neighbors {
            if request.exclude_id.as_deref() == Some(neighbor.id.as_str()) {
                // A self-match carries no new information and must not
                // consume a discount position.
                continue;
            }

            let deck_weight = if config.use_deck_score {
                neighbor.score
            } else {
                1.0
            };

            let mut neighbor_seen: HashSet<&str> = HashSet::with_capacity(neighbor.cards.len());
            for card in &neighbor.cards {
                if !neighbor_seen.insert(card.as_str()) || query_set.contains(card.as_str()) {
                    continue;
                }

                let divisor = match term_table {
                    Some(table) => {
                        let df = table.get(card).copied().ok_or_else(|| {
                            RecommenderError::MissingTermFrequency(card.clone())
                        })?;
                        config.df_weighting.divisor(df)
                    }
                    None => 1.0,
                };

                *scores.entry(card.clone()).or_insert(0.0) += discount * deck_weight / divisor;
            }

            discount *= config.discount_factor;
        }

        // IndexMap keeps first-seen order, so the stable sort breaks score
        // ties by discovery order.
        let mut ranked: Vec<(String, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(request.k);
        Ok(ranked)
    }
}

//! Solr client implementing the similarity backend
//!
//! Speaks the mlt and terms handlers of a Solr core whose documents carry
//! a space-joined `cards` field. Failures are surfaced to the caller
//! without retrying; retry policy belongs to whoever drives the scorer.

use super::config::SolrConfig;
use super::models::{parse_term_counts, MltResponse, SimilarDeck, TermsResponse};
use super::SimilarityBackend;
use crate::error::{RecommenderError, Result};
use crate::metrics::METRICS;
use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Similarity backend speaking the Solr HTTP API
pub struct SolrBackend {
    http: Client,
    config: SolrConfig,
    mlt_cache: Option<Cache<(String, usize), Arc<Vec<SimilarDeck>>>>,
}

impl SolrBackend {
    /// Create a new client from configuration
    pub fn new(config: SolrConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RecommenderError::BackendQuery(e.to_string()))?;

        let mlt_cache = (config.mlt_cache_max_size > 0).then(|| {
            Cache::builder()
                .max_capacity(config.mlt_cache_max_size)
                .time_to_live(config.mlt_cache_ttl())
                .build()
        });

        Ok(Self {
            http,
            config,
            mlt_cache,
        })
    }

    fn handler_url(&self, handler: &str) -> String {
        format!(
            "{}/solr/{}/{}",
            self.config.base_url, self.config.core, handler
        )
    }

    async fn fetch_similar(&self, query_doc: &str, rows: usize) -> Result<Vec<SimilarDeck>> {
        let start = Instant::now();
        let rows_param = rows.to_string();

        let response = self
            .http
            .get(self.handler_url("mlt"))
            .query(&[
                ("stream.body", query_doc),
                ("mlt.interestingTerms", "details"),
                ("mlt.mindf", "0"),
                ("mlt.mintf", "0"),
                ("mlt.boost", "true"),
                ("fl", "id, cards, score"),
                ("rows", rows_param.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                METRICS
                    .solr_requests
                    .with_label_values(&["mlt", "error"])
                    .inc();
                RecommenderError::BackendQuery(e.to_string())
            })?;

        if !response.status().is_success() {
            METRICS
                .solr_requests
                .with_label_values(&["mlt", "error"])
                .inc();
            return Err(RecommenderError::BackendQuery(format!(
                "mlt handler returned {}",
                response.status()
            )));
        }

        let body: MltResponse = response
            .json()
            .await
            .map_err(|e| RecommenderError::BackendQuery(e.to_string()))?;

        METRICS
            .solr_requests
            .with_label_values(&["mlt", "success"])
            .inc();
        METRICS
            .solr_request_duration
            .with_label_values(&["mlt"])
            .observe(start.elapsed().as_secs_f64());

        let similar: Vec<SimilarDeck> = body
            .response
            .docs
            .into_iter()
            .map(SimilarDeck::from)
            .collect();
        debug!(
            "mlt returned {} similar decks for {} requested",
            similar.len(),
            rows
        );
        Ok(similar)
    }

    async fn fetch_terms(&self) -> Result<HashMap<String, u64>> {
        let start = Instant::now();

        let response = self
            .http
            .get(self.handler_url("terms"))
            .query(&[("terms.fl", "cards"), ("terms.limit", "-1")])
            .send()
            .await
            .map_err(|e| {
                METRICS
                    .solr_requests
                    .with_label_values(&["terms", "error"])
                    .inc();
                RecommenderError::BackendUnavailable(e.to_string())
            })?;

        if !response.status().is_success() {
            METRICS
                .solr_requests
                .with_label_values(&["terms", "error"])
                .inc();
            return Err(RecommenderError::BackendUnavailable(format!(
                "terms handler returned {}",
                response.status()
            )));
        }

        let body: TermsResponse = response
            .json()
            .await
            .map_err(|e| RecommenderError::BackendUnavailable(e.to_string()))?;

        METRICS
            .solr_requests
            .with_label_values(&["terms", "success"])
            .inc();
        METRICS
            .solr_request_duration
            .with_label_values(&["terms"])
            .observe(start.elapsed().as_secs_f64());

        parse_term_counts(&body.terms.cards)
    }
}

#[async_trait]
impl SimilarityBackend for SolrBackend {
    async fn more_like_this(&self, query_doc: &str, rows: usize) -> Result<Vec<SimilarDeck>> {
        let Some(cache) = &self.mlt_cache else {
            return self.fetch_similar(query_doc, rows).await;
        };

        let key = (query_doc.to_string(), rows);
        if let Some(hit) = cache.get(&key).await {
            METRICS.mlt_cache_hits.inc();
            return Ok(hit.as_ref().clone());
        }
        METRICS.mlt_cache_misses.inc();

        let fetched = Arc::new(self.fetch_similar(query_doc, rows).await?);
        cache.insert(key, fetched.clone()).await;
        Ok(fetched.as_ref().clone())
    }

    async fn term_frequencies(&self) -> Result<HashMap<String, u64>> {
        self.fetch_terms().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let backend = SolrBackend::new(SolrConfig::default());
        assert!(backend.is_ok());
    }

    #[test]
    fn test_cache_disabled_when_size_zero() {
        let config = SolrConfig {
            mlt_cache_max_size: 0,
            ..SolrConfig::default()
        };
        let backend = SolrBackend::new(config).unwrap();
        assert!(backend.mlt_cache.is_none());
    }

    #[test]
    fn test_handler_url() {
        let backend = SolrBackend::new(SolrConfig::default()).unwrap();
        assert_eq!(
            backend.handler_url("mlt"),
            "http://localhost:8983/solr/decks/mlt"
        );
    }
}

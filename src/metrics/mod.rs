//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, Counter, CounterVec, HistogramVec, Opts, Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> =
    Lazy::new(|| Arc::new(Metrics::new().expect("Failed to initialize metrics")));

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Solr backend metrics
    pub solr_requests: CounterVec,
    pub solr_request_duration: HistogramVec,
    pub mlt_cache_hits: Counter,
    pub mlt_cache_misses: Counter,

    // Recommendation metrics
    pub recommendations_generated: Counter,

    // Experiment metrics
    pub experiment_cases: CounterVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let solr_requests = register_counter_vec_with_registry!(
            Opts::new("solr_requests_total", "Total Solr backend requests"),
            &["endpoint", "status"],
            registry
        )?;

        let solr_request_duration = register_histogram_vec_with_registry!(
            "solr_request_duration_seconds",
            "Solr request duration in seconds",
            &["endpoint"],
            registry
        )?;

        let mlt_cache_hits = register_counter_with_registry!(
            Opts::new("mlt_cache_hits_total", "Total more-like-this cache hits"),
            registry
        )?;

        let mlt_cache_misses = register_counter_with_registry!(
            Opts::new(
                "mlt_cache_misses_total",
                "Total more-like-this cache misses"
            ),
            registry
        )?;

        let recommendations_generated = register_counter_with_registry!(
            Opts::new(
                "recommendations_generated_total",
                "Total recommendation lists generated"
            ),
            registry
        )?;

        let experiment_cases = register_counter_vec_with_registry!(
            Opts::new("experiment_cases_total", "Total experiment test cases"),
            &["status"],
            registry
        )?;

        Ok(Self {
            registry,
            solr_requests,
            solr_request_duration,
            mlt_cache_hits,
            mlt_cache_misses,
            recommendations_generated,
            experiment_cases,
        })
    }

    /// Gather all metric families
    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }
}

//! Evaluation framework: metrics, test cases, and parameter sweeps

pub mod experiment;
pub mod grid;
pub mod metrics;
pub mod testcase;

pub use experiment::{ExperimentConfig, ExperimentDriver, ExperimentReport};
pub use grid::ScoringGrid;
pub use metrics::{
    average_precision, interpolated_precision, precision_recall_curve, r_precision,
};
pub use testcase::split_deck;

//! Scoring configuration

use crate::error::{RecommenderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Document frequency weighting applied to card contributions.
///
/// Cards like sol-ring appear in most stored decks and would dominate the
/// ranking on raw counts; dividing by a function of document frequency
/// pushes deck-specific cards back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DfWeighting {
    /// No weighting, every card divides by 1
    None,
    /// Divide by `max(df, 1)`
    Identity,
    /// Divide by `max(ln(df), 1)`
    Log,
}

impl DfWeighting {
    /// Divisor applied to a card's contribution given its document frequency
    pub fn divisor(&self, df: u64) -> f64 {
        match self {
            DfWeighting::None => 1.0,
            DfWeighting::Identity => df.max(1) as f64,
            DfWeighting::Log => (df as f64).ln().max(1.0),
        }
    }
}

impl FromStr for DfWeighting {
    type Err = RecommenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(DfWeighting::None),
            "identity" => Ok(DfWeighting::Identity),
            "log" => Ok(DfWeighting::Log),
            other => Err(RecommenderError::UnknownDfWeighting(other.to_string())),
        }
    }
}

impl fmt::Display for DfWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DfWeighting::None => write!(f, "none"),
            DfWeighting::Identity => write!(f, "identity"),
            DfWeighting::Log => write!(f, "log"),
        }
    }
}

/// Scoring policy for recommendation generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Similar decks requested from the backend
    #[serde(default = "default_similar_decks_count")]
    pub similar_decks_count: usize,

    /// Weight contributions by the neighbor's relevance score instead of 1
    #[serde(default)]
    pub use_deck_score: bool,

    /// Multiplier applied per neighbor rank position, in (0, 1]
    #[serde(default = "default_discount_factor")]
    pub discount_factor: f64,

    /// Penalty for globally common cards
    #[serde(default = "default_df_weighting")]
    pub df_weighting: DfWeighting,
}

// Default value functions
fn default_similar_decks_count() -> usize {
    10
}
fn default_discount_factor() -> f64 {
    1.0
}
fn default_df_weighting() -> DfWeighting {
    DfWeighting::None
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            similar_decks_count: default_similar_decks_count(),
            use_deck_score: false,
            discount_factor: default_discount_factor(),
            df_weighting: default_df_weighting(),
        }
    }
}

impl ScoringConfig {
    /// Reject out-of-range values before any backend call is issued
    pub fn validate(&self) -> Result<()> {
        if self.similar_decks_count == 0 {
            return Err(RecommenderError::InvalidConfiguration(
                "similar_decks_count must be at least 1".to_string(),
            ));
        }
        if !(self.discount_factor > 0.0 && self.discount_factor <= 1.0) {
            return Err(RecommenderError::InvalidConfiguration(format!(
                "discount_factor must be in (0, 1], got {}",
                self.discount_factor
            )));
        }
        Ok(())
    }

    /// Key identifying this configuration in experiment summaries
    pub fn summary_key(&self) -> String {
        format!(
            "n={} deck_score={} discount={} df={}",
            self.similar_decks_count, self.use_deck_score, self.discount_factor, self.df_weighting
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScoringConfig::default();
        assert_eq!(config.similar_decks_count, 10);
        assert!(!config.use_deck_score);
        assert_eq!(config.discount_factor, 1.0);
        assert_eq!(config.df_weighting, DfWeighting::None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_neighbors() {
        let config = ScoringConfig {
            similar_decks_count: 0,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RecommenderError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_discount() {
        for discount in [0.0, -0.5, 1.5, f64::NAN] {
            let config = ScoringConfig {
                discount_factor: discount,
                ..ScoringConfig::default()
            };
            assert!(
                config.validate().is_err(),
                "discount {discount} should be rejected"
            );
        }
    }

    #[test]
    fn test_df_weighting_from_str() {
        assert_eq!("none".parse::<DfWeighting>().unwrap(), DfWeighting::None);
        assert_eq!(
            "identity".parse::<DfWeighting>().unwrap(),
            DfWeighting::Identity
        );
        assert_eq!("log".parse::<DfWeighting>().unwrap(), DfWeighting::Log);
        assert!(matches!(
            "prob-idf".parse::<DfWeighting>(),
            Err(RecommenderError::UnknownDfWeighting(s)) if s == "prob-idf"
        ));
    }

    #[test]
    fn test_df_divisors() {
        assert_eq!(DfWeighting::None.divisor(9000), 1.0);
        assert_eq!(DfWeighting::Identity.divisor(4), 4.0);
        // Values whose log would fall below 1 are floored at 1
        assert_eq!(DfWeighting::Identity.divisor(0), 1.0);
        assert_eq!(DfWeighting::Log.divisor(2), 1.0);
        let expected = (8.0_f64).ln();
        assert!((DfWeighting::Log.divisor(8) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&DfWeighting::Log).unwrap();
        assert_eq!(json, "\"log\"");
        let back: DfWeighting = serde_json::from_str("\"identity\"").unwrap();
        assert_eq!(back, DfWeighting::Identity);
    }

    #[test]
    fn test_summary_key() {
        let config = ScoringConfig {
            similar_decks_count: 5,
            use_deck_score: true,
            discount_factor: 0.7,
            df_weighting: DfWeighting::Identity,
        };
        assert_eq!(
            config.summary_key(),
            "n=5 deck_score=true discount=0.7 df=identity"
        );
    }
}

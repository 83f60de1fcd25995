//! Parameter grid enumeration for scoring sweeps

use crate::error::{RecommenderError, Result};
use crate::recommend::{DfWeighting, ScoringConfig};

/// Option lists for each scoring dimension, expanded into the cartesian
/// product odometer-style: the leftmost dimension advances fastest and
/// carries into the next on overflow.
#[derive(Debug, Clone)]
pub struct ScoringGrid {
    pub similar_decks_count: Vec<usize>,
    pub use_deck_score: Vec<bool>,
    pub discount_factor: Vec<f64>,
    pub df_weighting: Vec<DfWeighting>,
}

impl ScoringGrid {
    /// Grid holding exactly the given configuration
    pub fn single(config: &ScoringConfig) -> Self {
        Self {
            similar_decks_count: vec![config.similar_decks_count],
            use_deck_score: vec![config.use_deck_score],
            discount_factor: vec![config.discount_factor],
            df_weighting: vec![config.df_weighting],
        }
    }

    /// All configurations in odometer order, each validated up front so a
    /// bad grid fails before any backend call
    pub fn configurations(&self) -> Result<Vec<ScoringConfig>> {
        let counts = [
            self.similar_decks_count.len(),
            self.use_deck_score.len(),
            self.discount_factor.len(),
            self.df_weighting.len(),
        ];
        if counts.contains(&0) {
            return Err(RecommenderError::InvalidConfiguration(
                "every grid dimension needs at least one value".to_string(),
            ));
        }

        let mut configs = Vec::with_capacity(counts.iter().product());
        for indices in Odometer::new(&counts) {
            let config = ScoringConfig {
                similar_decks_count: self.similar_decks_count[indices[0]],
                use_deck_score: self.use_deck_score[indices[1]],
                discount_factor: self.discount_factor[indices[2]],
                df_weighting: self.df_weighting[indices[3]],
            };
            config.validate()?;
            configs.push(config);
        }
        Ok(configs)
    }
}

/// Mixed-radix counter over dimension sizes. Terminates when the last
/// dimension overflows.
struct Odometer {
    counts: Vec<usize>,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Odometer {
    fn new(counts: &[usize]) -> Self {
        Self {
            counts: counts.to_vec(),
            indices: vec![0; counts.len()],
            started: false,
            done: false,
        }
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        let mut position = 0;
        loop {
            if position == self.counts.len() {
                self.done = true;
                return None;
            }
            self.indices[position] += 1;
            if self.indices[position] < self.counts[position] {
                break;
            }
            self.indices[position] = 0;
            position += 1;
        }
        Some(self.indices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odometer_leftmost_digit_advances_fastest() {
        let sequence: Vec<Vec<usize>> = Odometer::new(&[2, 2]).collect();
        assert_eq!(
            sequence,
            vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]
        );
    }

    #[test]
    fn test_odometer_counts_the_full_product() {
        assert_eq!(Odometer::new(&[3, 2, 4]).count(), 24);
        assert_eq!(Odometer::new(&[1]).count(), 1);
    }

    #[test]
    fn test_grid_expands_in_odometer_order() {
        let grid = ScoringGrid {
            similar_decks_count: vec![1, 5],
            use_deck_score: vec![false, true],
            discount_factor: vec![1.0],
            df_weighting: vec![DfWeighting::None],
        };

        let configs = grid.configurations().unwrap();

        assert_eq!(configs.len(), 4);
        // similar_decks_count cycles before use_deck_score carries
        assert_eq!(configs[0].similar_decks_count, 1);
        assert!(!configs[0].use_deck_score);
        assert_eq!(configs[1].similar_decks_count, 5);
        assert!(!configs[1].use_deck_score);
        assert_eq!(configs[2].similar_decks_count, 1);
        assert!(configs[2].use_deck_score);
        assert_eq!(configs[3].similar_decks_count, 5);
        assert!(configs[3].use_deck_score);
    }

    #[test]
    fn test_grid_rejects_empty_dimension() {
        let grid = ScoringGrid {
            similar_decks_count: vec![1],
            use_deck_score: vec![false],
            discount_factor: Vec::new(),
            df_weighting: vec![DfWeighting::None],
        };
        assert!(matches!(
            grid.configurations(),
            Err(RecommenderError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_grid_rejects_invalid_values_up_front() {
        let grid = ScoringGrid {
            similar_decks_count: vec![5],
            use_deck_score: vec![false],
            discount_factor: vec![0.7, 0.0],
            df_weighting: vec![DfWeighting::None],
        };
        assert!(matches!(
            grid.configurations(),
            Err(RecommenderError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_single_grid_mirrors_the_config() {
        let config = ScoringConfig {
            similar_decks_count: 5,
            use_deck_score: true,
            discount_factor: 0.7,
            df_weighting: DfWeighting::Log,
        };
        let configs = ScoringGrid::single(&config).configurations().unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].summary_key(), config.summary_key());
    }
}

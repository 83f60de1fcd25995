//! Experiment driver sweeping held-out decks across scoring configurations
//!
//! Each sampled deck is split into a query and a held-out relevant set,
//! scored under every grid configuration, and measured. Per-deck failures
//! are recorded and skipped; the sweep never aborts on a single bad deck.

use crate::deck::{discover_decks, Deck, MIN_DECK_CARDS};
use crate::error::{RecommenderError, Result};
use crate::eval::grid::ScoringGrid;
use crate::eval::metrics::{average_precision, r_precision};
use crate::eval::testcase::split_deck;
use crate::metrics::METRICS;
use crate::recommend::{RecommendRequest, Recommender, ScoringConfig};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Experiment run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Experiment name, used as the results subdirectory
    pub name: String,

    /// Directory of processed test deck files
    pub deck_dir: PathBuf,

    /// Root directory for experiment output
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// How many test decks to sample (0 takes all)
    #[serde(default)]
    pub deck_sample: usize,

    /// Seeds per deck; each seed is one held-out test case
    #[serde(default = "default_seed_count")]
    pub seed_count: u64,

    /// Cards held out of each deck
    #[serde(default = "default_leave_out_count")]
    pub leave_out_count: usize,

    /// Recommendations requested per test case
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Seed for the deck sample
    #[serde(default)]
    pub sample_seed: u64,

    /// Decks evaluated concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

// Default value functions
fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}
fn default_seed_count() -> u64 {
    1
}
fn default_leave_out_count() -> usize {
    25
}
fn default_recommendation_count() -> usize {
    1000
}
fn default_concurrency() -> usize {
    1
}

impl ExperimentConfig {
    /// Load from a config file plus EXPERIMENT_-prefixed environment
    /// overrides
    pub fn load(path: &Path) -> Result<Self> {
        config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("EXPERIMENT"))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| RecommenderError::InvalidConfiguration(e.to_string()))
    }

    /// Reject impossible runs before touching the dataset
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(RecommenderError::InvalidConfiguration(
                "experiment name must not be empty".to_string(),
            ));
        }
        if self.seed_count == 0 {
            return Err(RecommenderError::InvalidConfiguration(
                "seed_count must be at least 1".to_string(),
            ));
        }
        if self.leave_out_count == 0 {
            return Err(RecommenderError::InvalidConfiguration(
                "leave_out_count must be at least 1".to_string(),
            ));
        }
        if self.recommendation_count == 0 {
            return Err(RecommenderError::InvalidConfiguration(
                "recommendation_count must be at least 1".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(RecommenderError::InvalidConfiguration(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Aggregate metrics for one configuration
#[derive(Debug, Clone, Serialize)]
pub struct ConfigAggregate {
    pub key: String,
    pub average_precision: f64,
    pub r_precision: f64,
    pub cases: usize,
}

/// A deck the sweep could not evaluate
#[derive(Debug, Clone, Serialize)]
pub struct SkippedDeck {
    pub id: String,
    pub reason: String,
}

/// Outcome of an experiment run
#[derive(Debug, Serialize)]
pub struct ExperimentReport {
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub deck_count: usize,
    pub case_count: usize,
    pub aggregates: Vec<ConfigAggregate>,
    pub skipped: Vec<SkippedDeck>,
}

/// Metrics for one test case: (configuration key, AP, R-precision)
type CaseMetrics = Vec<(String, f64, f64)>;

struct DeckOutcome {
    id: String,
    per_seed: Vec<CaseMetrics>,
}

#[derive(Serialize)]
struct Manifest<'a> {
    config: &'a ExperimentConfig,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    deck_count: usize,
    case_count: usize,
    skipped: &'a [SkippedDeck],
}

/// Runs test-case generation, scoring, and metrics over a deck sample
pub struct ExperimentDriver {
    recommender: Arc<Recommender>,
    config: ExperimentConfig,
}

impl ExperimentDriver {
    /// Create a driver for the given recommender and run configuration
    pub fn new(recommender: Arc<Recommender>, config: ExperimentConfig) -> Self {
        Self {
            recommender,
            config,
        }
    }

    /// Run the sweep and write per-case, per-deck, and aggregate
    /// summaries under the results directory.
    ///
    /// Re-running with the same seeds reproduces the same deck sample and
    /// the same splits.
    pub async fn run(&self, grid: &ScoringGrid) -> Result<ExperimentReport> {
        self.config.validate()?;
        let configs = grid.configurations()?;
        let started_at = Utc::now();

        let paths = self.sample_deck_paths()?;
        info!(
            "Running experiment {} over {} decks and {} configurations",
            self.config.name,
            paths.len(),
            configs.len()
        );

        let experiment_dir = self.config.results_dir.join(&self.config.name);
        fs::create_dir_all(&experiment_dir)?;

        let outcomes: Vec<std::result::Result<DeckOutcome, SkippedDeck>> =
            stream::iter(paths.iter())
                .map(|path| self.evaluate_deck(path, &configs))
                .buffered(self.config.concurrency)
                .collect()
                .await;

        // Aggregation stays in deck order so reruns agree exactly
        let mut sums: IndexMap<String, (f64, f64, usize)> = IndexMap::new();
        let mut skipped = Vec::new();
        let mut deck_count = 0_usize;
        let mut case_count = 0_usize;
        for outcome in outcomes {
            match outcome {
                Ok(outcome) => {
                    deck_count += 1;
                    case_count += outcome.per_seed.len();
                    self.write_deck_summaries(&experiment_dir, &outcome)?;
                    for case in &outcome.per_seed {
                        for (key, ap, rp) in case {
                            let entry = sums.entry(key.clone()).or_insert((0.0, 0.0, 0));
                            entry.0 += ap;
                            entry.1 += rp;
                            entry.2 += 1;
                        }
                    }
                }
                Err(skip) => {
                    METRICS
                        .experiment_cases
                        .with_label_values(&["skipped"])
                        .inc();
                    warn!("Skipping deck {}: {}", skip.id, skip.reason);
                    skipped.push(skip);
                }
            }
        }

        let aggregates: Vec<ConfigAggregate> = sums
            .into_iter()
            .map(|(key, (ap, rp, cases))| ConfigAggregate {
                key,
                average_precision: ap / cases as f64,
                r_precision: rp / cases as f64,
                cases,
            })
            .collect();

        write_summary(
            &experiment_dir.join("summary.txt"),
            aggregates
                .iter()
                .map(|a| (a.key.as_str(), a.average_precision, a.r_precision)),
        )?;

        let finished_at = Utc::now();
        let manifest = Manifest {
            config: &self.config,
            started_at,
            finished_at,
            deck_count,
            case_count,
            skipped: &skipped,
        };
        fs::write(
            experiment_dir.join("manifest.json"),
            serde_json::to_string_pretty(&manifest)?,
        )?;

        info!(
            "Experiment {} finished: {} decks, {} cases, {} skipped",
            self.config.name,
            deck_count,
            case_count,
            skipped.len()
        );

        Ok(ExperimentReport {
            name: self.config.name.clone(),
            started_at,
            finished_at,
            deck_count,
            case_count,
            aggregates,
            skipped,
        })
    }

    /// Deterministic sample of the discovered deck files
    fn sample_deck_paths(&self) -> Result<Vec<PathBuf>> {
        let paths = discover_decks(&self.config.deck_dir)?;
        if self.config.deck_sample == 0 || self.config.deck_sample >= paths.len() {
            return Ok(paths);
        }

        let mut rng = StdRng::seed_from_u64(self.config.sample_seed);
        let mut chosen: Vec<usize> =
            index::sample(&mut rng, paths.len(), self.config.deck_sample).into_vec();
        chosen.sort_unstable();
        Ok(chosen.into_iter().map(|i| paths[i].clone()).collect())
    }

    async fn evaluate_deck(
        &self,
        path: &Path,
        configs: &[ScoringConfig],
    ) -> std::result::Result<DeckOutcome, SkippedDeck> {
        let deck = match Deck::load(path) {
            Ok(deck) => deck,
            Err(e) => {
                return Err(SkippedDeck {
                    id: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };
        if !deck.is_evaluable() {
            return Err(SkippedDeck {
                id: deck.id,
                reason: format!("fewer than {MIN_DECK_CARDS} distinct cards"),
            });
        }

        let mut per_seed = Vec::with_capacity(self.config.seed_count as usize);
        for seed in 0..self.config.seed_count {
            match self.evaluate_case(&deck, seed, configs).await {
                Ok(case) => {
                    METRICS
                        .experiment_cases
                        .with_label_values(&["completed"])
                        .inc();
                    per_seed.push(case);
                }
                Err(e) => {
                    return Err(SkippedDeck {
                        id: deck.id.clone(),
                        reason: format!("seed {seed}: {e}"),
                    })
                }
            }
        }
        Ok(DeckOutcome {
            id: deck.id,
            per_seed,
        })
    }

    async fn evaluate_case(
        &self,
        deck: &Deck,
        seed: u64,
        configs: &[ScoringConfig],
    ) -> Result<CaseMetrics> {
        let (query, relevant) = split_deck(&deck.cards, self.config.leave_out_count, Some(seed))?;

        let mut case = Vec::with_capacity(configs.len());
        for config in configs {
            let request = RecommendRequest {
                cards: query.clone(),
                exclude_id: Some(deck.id.clone()),
                k: self.config.recommendation_count,
            };
            let recommendations = self.recommender.recommend(&request, config).await?;

            let ap = average_precision(&recommendations, &relevant);
            let rp = r_precision(&recommendations, &relevant)?;
            case.push((config.summary_key(), ap, rp));
        }
        Ok(case)
    }

    /// Per-case summaries, plus a seed-averaged per-deck summary when the
    /// deck was evaluated under more than one seed
    fn write_deck_summaries(&self, experiment_dir: &Path, outcome: &DeckOutcome) -> Result<()> {
        let multi_seed = self.config.seed_count > 1;

        for (seed, case) in outcome.per_seed.iter().enumerate() {
            let case_dir = if multi_seed {
                experiment_dir
                    .join(&outcome.id)
                    .join(format!("seed={seed}"))
            } else {
                experiment_dir.join(&outcome.id)
            };
            fs::create_dir_all(&case_dir)?;
            write_summary(
                &case_dir.join("summary.txt"),
                case.iter().map(|(key, ap, rp)| (key.as_str(), *ap, *rp)),
            )?;
        }

        if multi_seed {
            let mut sums: IndexMap<&str, (f64, f64)> = IndexMap::new();
            for case in &outcome.per_seed {
                for (key, ap, rp) in case {
                    let entry = sums.entry(key.as_str()).or_insert((0.0, 0.0));
                    entry.0 += ap;
                    entry.1 += rp;
                }
            }
            let seeds = outcome.per_seed.len() as f64;
            write_summary(
                &experiment_dir.join(&outcome.id).join("summary.txt"),
                sums.iter()
                    .map(|(key, (ap, rp))| (*key, ap / seeds, rp / seeds)),
            )?;
        }
        Ok(())
    }
}

/// Tab-separated `key<TAB>average_precision<TAB>r_precision` lines
fn write_summary<'a>(
    path: &Path,
    lines: impl Iterator<Item = (&'a str, f64, f64)>,
) -> Result<()> {
    let mut out = String::new();
    for (key, ap, rp) in lines {
        out.push_str(&format!("{key}\t{ap:.4}\t{rp:.4}\n"));
    }
    fs::write(path, out)?;
    Ok(())
}

//! Deck file model and dataset discovery

use crate::error::{RecommenderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Minimum card count for a deck to serve as evaluation ground truth
pub const MIN_DECK_CARDS: usize = 50;

/// On-disk deck format: stable id plus space-joined sanitized card names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckFile {
    pub id: String,
    pub cards: String,
}

/// A parsed deck, card order as stored
#[derive(Debug, Clone)]
pub struct Deck {
    pub id: String,
    pub cards: Vec<String>,
}

impl Deck {
    /// Load a deck from a processed JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let file: DeckFile = serde_json::from_str(&raw)?;
        Self::from_file(file)
    }

    /// Build a deck from the on-disk representation
    pub fn from_file(file: DeckFile) -> Result<Self> {
        let cards: Vec<String> = file
            .cards
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if cards.is_empty() {
            return Err(RecommenderError::MalformedDeck(format!(
                "deck {} has no cards",
                file.id
            )));
        }
        Ok(Self {
            id: file.id,
            cards,
        })
    }

    /// Distinct cards, first occurrence order
    pub fn distinct_cards(&self) -> Vec<String> {
        let mut seen = HashSet::with_capacity(self.cards.len());
        self.cards
            .iter()
            .filter(|card| seen.insert(card.as_str()))
            .cloned()
            .collect()
    }

    /// Whether the deck is large enough to produce held-out test cases
    pub fn is_evaluable(&self) -> bool {
        self.distinct_cards().len() >= MIN_DECK_CARDS
    }
}

/// Discover processed deck files under a directory, sorted for determinism
pub fn discover_decks(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = dir.join("*.json");
    let entries = glob::glob(&pattern.to_string_lossy())
        .map_err(|e| RecommenderError::InvalidConfiguration(format!("bad deck pattern: {e}")))?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => warn!("Skipping unreadable deck file: {}", e),
        }
    }
    paths.sort();
    Ok(paths)
}

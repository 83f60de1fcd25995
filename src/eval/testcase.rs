//! Held-out test case generation
//!
//! A known complete deck is split into an observed query and a held-out
//! relevant set; the recommender then has to rediscover the held-out
//! cards from the query alone.

use crate::error::{RecommenderError, Result};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use std::collections::HashSet;

/// Split a deck into an observed query and a held-out relevant set.
///
/// Sampling is uniform without replacement over the deck's distinct
/// cards. The generator is scoped to this call: the same `seed` always
/// produces the same split, and concurrent splits cannot interfere. The
/// query keeps the deck's original card order minus the held-out cards.
pub fn split_deck(
    cards: &[String],
    leave_out_count: usize,
    seed: Option<u64>,
) -> Result<(Vec<String>, HashSet<String>)> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(cards.len());
    let distinct: Vec<&str> = cards
        .iter()
        .map(String::as_str)
        .filter(|card| seen.insert(card))
        .collect();

    if leave_out_count >= distinct.len() {
        return Err(RecommenderError::InsufficientCollectionSize {
            size: distinct.len(),
            required: leave_out_count + 1,
        });
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let held_out: HashSet<usize> = index::sample(&mut rng, distinct.len(), leave_out_count)
        .into_iter()
        .collect();

    let mut query = Vec::with_capacity(distinct.len() - leave_out_count);
    let mut relevant = HashSet::with_capacity(leave_out_count);
    for (i, card) in distinct.iter().enumerate() {
        if held_out.contains(&i) {
            relevant.insert((*card).to_string());
        } else {
            query.push((*card).to_string());
        }
    }
    Ok((query, relevant))
}

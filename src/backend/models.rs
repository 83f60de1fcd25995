//! Wire models for the Solr similarity backend

use crate::error::{RecommenderError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// A similar deck returned by the backend
#[derive(Debug, Clone)]
pub struct SimilarDeck {
    /// Corpus id of the stored deck
    pub id: String,
    /// Backend relevance score
    pub score: f64,
    /// Cards of the stored deck, document order
    pub cards: Vec<String>,
}

/// Body of a more-like-this response
#[derive(Debug, Deserialize)]
pub(crate) struct MltResponse {
    pub response: MltDocs,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MltDocs {
    pub docs: Vec<MltDoc>,
}

/// One document from the mlt handler, `fl=id, cards, score`
#[derive(Debug, Deserialize)]
pub(crate) struct MltDoc {
    pub id: String,
    pub cards: String,
    pub score: f64,
}

impl From<MltDoc> for SimilarDeck {
    fn from(doc: MltDoc) -> Self {
        Self {
            id: doc.id,
            score: doc.score,
            cards: doc.cards.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// Body of a terms response
#[derive(Debug, Deserialize)]
pub(crate) struct TermsResponse {
    pub terms: TermsBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TermsBody {
    pub cards: Vec<Value>,
}

/// Reshape the interleaved `[name, count, name, count, ...]` terms list
/// into a frequency map. Malformed interleaving is an error, never a
/// partial table.
pub(crate) fn parse_term_counts(values: &[Value]) -> Result<HashMap<String, u64>> {
    if values.len() % 2 != 0 {
        return Err(RecommenderError::BackendUnavailable(format!(
            "terms list has odd length {}",
            values.len()
        )));
    }

    let mut table = HashMap::with_capacity(values.len() / 2);
    for pair in values.chunks_exact(2) {
        let name = pair[0].as_str().ok_or_else(|| {
            RecommenderError::BackendUnavailable(format!("term name is not a string: {}", pair[0]))
        })?;
        let count = pair[1].as_u64().ok_or_else(|| {
            RecommenderError::BackendUnavailable(format!(
                "document frequency for {name} is not a non-negative integer: {}",
                pair[1]
            ))
        })?;
        table.insert(name.to_string(), count);
    }
    Ok(table)
}

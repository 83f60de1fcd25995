//! Ranking quality metrics against held-out ground truth

use crate::error::{RecommenderError, Result};
use std::collections::HashSet;

/// Precision and recall per prefix length k = 1..=len(recommendations).
///
/// Fails with `EmptyRelevantSet` when there is no ground truth; a zero
/// denominator is undefined, not silently zero.
pub fn precision_recall_curve(
    recommendations: &[String],
    relevant: &HashSet<String>,
) -> Result<(Vec<f64>, Vec<f64>)> {
    if relevant.is_empty() {
        return Err(RecommenderError::EmptyRelevantSet);
    }

    let mut precision = Vec::with_capacity(recommendations.len());
    let mut recall = Vec::with_capacity(recommendations.len());
    let mut hits = 0_usize;
    for (i, card) in recommendations.iter().enumerate() {
        if relevant.contains(card) {
            hits += 1;
        }
        precision.push(hits as f64 / (i + 1) as f64);
        recall.push(hits as f64 / relevant.len() as f64);
    }
    Ok((precision, recall))
}

/// Average precision, normalized by the number of relevant cards actually
/// retrieved rather than the relevant set size.
///
/// Measures ranking quality conditional on what was retrieved; returns 0
/// when no relevant card appears at all.
pub fn average_precision(recommendations: &[String], relevant: &HashSet<String>) -> f64 {
    let mut hits = 0_usize;
    let mut sum = 0.0;
    for (i, card) in recommendations.iter().enumerate() {
        if relevant.contains(card) {
            hits += 1;
            sum += hits as f64 / (i + 1) as f64;
        }
    }
    if hits == 0 {
        0.0
    } else {
        sum / hits as f64
    }
}

/// Precision at the rank equal to the relevant set size.
///
/// Fails with `EmptyRelevantSet` when there is no ground truth.
pub fn r_precision(recommendations: &[String], relevant: &HashSet<String>) -> Result<f64> {
    if relevant.is_empty() {
        return Err(RecommenderError::EmptyRelevantSet);
    }

    let cutoff = relevant.len().min(recommendations.len());
    let hits = recommendations[..cutoff]
        .iter()
        .filter(|card| relevant.contains(card.as_str()))
        .count();
    Ok(hits as f64 / relevant.len() as f64)
}

/// Monotone non-increasing-from-the-right precision envelope,
/// `P'[k] = max(P[k..])`, used for area-style curve rendering.
pub fn interpolated_precision(precision: &[f64]) -> Vec<f64> {
    let mut envelope = precision.to_vec();
    for i in (0..envelope.len().saturating_sub(1)).rev() {
        if envelope[i + 1] > envelope[i] {
            envelope[i] = envelope[i + 1];
        }
    }
    envelope
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(names: &str) -> Vec<String> {
        names.split_whitespace().map(str::to_string).collect()
    }

    fn set(names: &str) -> HashSet<String> {
        names.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_curve_known_case() {
        let (p, r) = precision_recall_curve(&cards("a x b"), &set("a b")).unwrap();
        assert_eq!(p, vec![1.0, 0.5, 2.0 / 3.0]);
        assert_eq!(r, vec![0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_curve_bounds_and_recall_monotonicity() {
        let recommendations = cards("a b x y c z");
        let relevant = set("a c q");
        let (p, r) = precision_recall_curve(&recommendations, &relevant).unwrap();

        for value in &p {
            assert!((0.0..=1.0).contains(value));
        }
        for window in r.windows(2) {
            assert!(window[1] >= window[0]);
        }
        assert!(*r.last().unwrap() <= 1.0);
    }

    #[test]
    fn test_curve_rejects_empty_relevant_set() {
        let result = precision_recall_curve(&cards("a b"), &HashSet::new());
        assert!(matches!(result, Err(RecommenderError::EmptyRelevantSet)));
    }

    #[test]
    fn test_average_precision_zero_without_overlap() {
        assert_eq!(average_precision(&cards("x y z"), &set("a b")), 0.0);
        assert_eq!(average_precision(&[], &set("a b")), 0.0);
    }

    #[test]
    fn test_average_precision_one_when_relevant_lead() {
        // Every relevant card sits in the first |relevant| positions
        assert_eq!(average_precision(&cards("b a x y"), &set("a b")), 1.0);
    }

    #[test]
    fn test_average_precision_normalizes_by_retrieved_hits() {
        // Only one of two relevant cards retrieved, at rank 1: the sum
        // divides by 1 hit, not by |relevant| = 2
        assert_eq!(average_precision(&cards("a x y"), &set("a b")), 1.0);
    }

    #[test]
    fn test_average_precision_mid_list_hits() {
        // Hits at ranks 2 and 4: (1/2 + 2/4) / 2
        let value = average_precision(&cards("x a y b"), &set("a b"));
        assert!((value - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_r_precision_counts_hits_at_relevant_size() {
        let value = r_precision(&cards("a x b"), &set("a b")).unwrap();
        assert_eq!(value, 0.5);
    }

    #[test]
    fn test_r_precision_equals_average_precision_when_contiguous_at_top() {
        let recommendations = cards("a b x y");
        let relevant = set("a b");
        let rp = r_precision(&recommendations, &relevant).unwrap();
        let ap = average_precision(&recommendations, &relevant);
        assert_eq!(rp, 1.0);
        assert_eq!(rp, ap);
    }

    #[test]
    fn test_r_precision_with_short_recommendation_list() {
        // Missing positions count as misses
        let value = r_precision(&cards("a"), &set("a b c")).unwrap();
        assert!((value - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_r_precision_rejects_empty_relevant_set() {
        let result = r_precision(&cards("a"), &HashSet::new());
        assert!(matches!(result, Err(RecommenderError::EmptyRelevantSet)));
    }

    #[test]
    fn test_interpolated_precision_is_suffix_max() {
        let envelope = interpolated_precision(&[1.0, 0.5, 2.0 / 3.0, 0.5]);
        assert_eq!(envelope, vec![1.0, 2.0 / 3.0, 2.0 / 3.0, 0.5]);
    }

    #[test]
    fn test_interpolated_precision_is_non_increasing() {
        let (p, _) = precision_recall_curve(&cards("x a y b z"), &set("a b")).unwrap();
        let envelope = interpolated_precision(&p);
        for window in envelope.windows(2) {
            assert!(window[0] >= window[1]);
        }
    }

    #[test]
    fn test_interpolated_precision_handles_empty_input() {
        assert!(interpolated_precision(&[]).is_empty());
    }
}

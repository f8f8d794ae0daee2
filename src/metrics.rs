use std::cmp::Ordering;

use crate::allocation::AlgorithmResult;
use crate::entities::Advertisers;

/// Gini inequality index over a non-negative distribution
///
/// Negative values are filtered out; an empty or all-zero sequence is
/// defined as perfectly equal (0, never NaN). Range [0, 1): 0 means every
/// value is equal, values approaching 1 mean maximal concentration.
pub fn gini_index(values: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| *v >= 0.0).collect();
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let sum: f64 = sorted.iter().sum();
    if sum == 0.0 {
        return 0.0;
    }

    // 1-indexed weighted sum over the ascending order
    let weighted_sum: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (i + 1) as f64 * v)
        .sum();

    let n = n as f64;
    (2.0 * weighted_sum) / (n * sum) - (n + 1.0) / n
}

/// Win counts over the entire advertiser candidate set, including
/// advertisers with zero wins
pub fn win_counts(result: &AlgorithmResult, advertisers: &Advertisers) -> Vec<f64> {
    let mut counts = vec![0.0; advertisers.len()];
    for m in &result.matches {
        counts[m.advertiser_id] += 1.0;
    }
    counts
}

/// Gini index over the win-count distribution of the full advertiser set.
/// Quantifies how concentrated publisher exposure is among advertisers.
pub fn market_fairness(result: &AlgorithmResult, advertisers: &Advertisers) -> f64 {
    gini_index(&win_counts(result, advertisers))
}

/// Sum of affinity values across all matches, an aggregate proxy for
/// allocation quality that is directly comparable between mechanisms on the
/// same candidate set
pub fn total_satisfaction(result: &AlgorithmResult) -> f64 {
    result.matches.iter().map(|m| m.affinity).sum()
}

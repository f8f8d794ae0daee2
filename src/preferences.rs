use std::cmp::Ordering;

use crate::affinity::AffinityModel;
use crate::entities::{Advertisers, Publishers};

/// Weights of the internal publisher-side ranking score used to decide
/// deferred-acceptance engagement switches
const RANKING_AFFINITY_WEIGHT: f64 = 0.6;
const RANKING_BID_WEIGHT: f64 = 0.3;
const RANKING_CATEGORY_WEIGHT: f64 = 0.1;
/// Bonus value when advertiser and publisher share a category
const SHARED_CATEGORY_BONUS: f64 = 0.15;

/// Weights of the reported publisher-side score attached to output matches.
/// Intentionally differs from the internal ranking score: no category bonus
/// and a heavier bid term. Do not conflate the two.
const REPORTED_AFFINITY_WEIGHT: f64 = 0.6;
const REPORTED_BID_WEIGHT: f64 = 0.4;

/// Bid normalized against the maximum bid in the candidate set, 0 when the
/// maximum is 0 (all-zero bids never divide by zero)
pub fn bid_ratio(bid: f64, max_bid: f64) -> f64 {
    if max_bid > 0.0 {
        bid / max_bid
    } else {
        0.0
    }
}

/// Reported per-match metrics, shared by both mechanisms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchMetrics {
    /// Compatibility score in [0, 100]
    pub affinity: f64,
    /// Advertiser-side preference score in [0, 1] (affinity based)
    pub advertiser_score: f64,
    /// Publisher-side score in [0, 1] (affinity + bid blend)
    pub publisher_score: f64,
}

/// Precomputed per-run preference state for one candidate set: pairwise
/// affinities, each advertiser's ranked publisher list, and each publisher's
/// internal ranking score over advertisers. Built once, then consumed by
/// both allocation mechanisms.
pub struct PreferenceProfile {
    /// Maximum bid across the full advertiser candidate set
    pub max_bid: f64,
    /// affinities[advertiser_id][publisher_id] in [0, 100]
    pub affinities: Vec<Vec<f64>>,
    /// Publisher ids per advertiser, descending by advertiser-side score;
    /// ties keep the original candidate-set order
    pub advertiser_rankings: Vec<Vec<usize>>,
    /// ranking_scores[publisher_id][advertiser_id], the internal
    /// publisher-side score (with category bonus)
    pub ranking_scores: Vec<Vec<f64>>,
}

impl PreferenceProfile {
    /// Build the full preference state for a candidate set
    pub fn build(model: &AffinityModel, advertisers: &Advertisers, publishers: &Publishers) -> Self {
        let max_bid = advertisers
            .advertisers
            .iter()
            .fold(0.0_f64, |max, advertiser| max.max(advertiser.bid));

        // Pairwise affinities, computed once per pair
        let affinities: Vec<Vec<f64>> = advertisers
            .advertisers
            .iter()
            .map(|advertiser| {
                publishers
                    .publishers
                    .iter()
                    .map(|publisher| model.affinity(advertiser, publisher))
                    .collect()
            })
            .collect();

        // Each advertiser ranks all publishers by its own preference score.
        // Vec::sort_by is stable, so equal scores keep candidate-set order.
        let advertiser_rankings: Vec<Vec<usize>> = affinities
            .iter()
            .map(|row| {
                let mut ranked: Vec<usize> = (0..publishers.len()).collect();
                ranked.sort_by(|&x, &y| {
                    advertiser_preference_score(row[y])
                        .partial_cmp(&advertiser_preference_score(row[x]))
                        .unwrap_or(Ordering::Equal)
                });
                ranked
            })
            .collect();

        let ranking_scores: Vec<Vec<f64>> = publishers
            .publishers
            .iter()
            .map(|publisher| {
                advertisers
                    .advertisers
                    .iter()
                    .map(|advertiser| {
                        let affinity01 = affinities[advertiser.advertiser_id][publisher.publisher_id] / 100.0;
                        let shared_category = advertiser.category == publisher.category;
                        publisher_ranking_score(affinity01, bid_ratio(advertiser.bid, max_bid), shared_category)
                    })
                    .collect()
            })
            .collect();

        Self {
            max_bid,
            affinities,
            advertiser_rankings,
            ranking_scores,
        }
    }

    /// Advertiser-side preference score for a pair, in [0, 1]
    pub fn advertiser_score(&self, advertiser_id: usize, publisher_id: usize) -> f64 {
        advertiser_preference_score(self.affinities[advertiser_id][publisher_id])
    }

    /// Reported metrics for an output match between a pair
    pub fn match_metrics(&self, advertiser_id: usize, publisher_id: usize, bid: f64) -> MatchMetrics {
        let affinity = self.affinities[advertiser_id][publisher_id];
        let affinity01 = affinity / 100.0;
        MatchMetrics {
            affinity,
            advertiser_score: affinity01,
            publisher_score: REPORTED_AFFINITY_WEIGHT * affinity01
                + REPORTED_BID_WEIGHT * bid_ratio(bid, self.max_bid),
        }
    }
}

/// How much an advertiser wants a publisher: affinity rescaled to [0, 1]
pub fn advertiser_preference_score(affinity: f64) -> f64 {
    affinity / 100.0
}

/// Internal publisher-side score used only to rank advertisers during
/// deferred acceptance. Carries the shared-category bonus that the reported
/// publisher score deliberately omits.
pub fn publisher_ranking_score(affinity01: f64, bid_ratio: f64, shared_category: bool) -> f64 {
    let category_bonus = if shared_category { SHARED_CATEGORY_BONUS } else { 0.0 };
    RANKING_AFFINITY_WEIGHT * affinity01
        + RANKING_BID_WEIGHT * bid_ratio
        + RANKING_CATEGORY_WEIGHT * category_bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Advertisers, Category, Publishers};

    fn sample_market() -> (Advertisers, Publishers) {
        let mut advertisers = Advertisers::new();
        advertisers.add("Arcadia Games".to_string(), Category::HobbyFun, 18.0, 3_000.0, 40.0);
        advertisers.add("Crossline Pharma".to_string(), Category::LivingHealth, 55.0, 2_000.0, 35.0);
        advertisers.add("UrbanThread".to_string(), Category::FashionShop, 20.0, 1_500.0, 18.0);

        let mut publishers = Publishers::new();
        publishers.add("WikiTree".to_string(), Category::HobbyFun, 22.0, 0.9);
        publishers.add("Newswire".to_string(), Category::LivingHealth, 52.0, 0.8);
        publishers.add("ShopExpress".to_string(), Category::FashionShop, 34.0, 0.9);
        (advertisers, publishers)
    }

    #[test]
    fn test_bid_ratio_zero_max() {
        assert_eq!(bid_ratio(0.0, 0.0), 0.0);
        assert_eq!(bid_ratio(10.0, 40.0), 0.25);
    }

    #[test]
    fn test_rankings_are_descending() {
        let (advertisers, publishers) = sample_market();
        let model = AffinityModel::standard();
        let profile = PreferenceProfile::build(&model, &advertisers, &publishers);

        for (advertiser_id, ranking) in profile.advertiser_rankings.iter().enumerate() {
            assert_eq!(ranking.len(), publishers.len());
            for pair in ranking.windows(2) {
                let first = profile.advertiser_score(advertiser_id, pair[0]);
                let second = profile.advertiser_score(advertiser_id, pair[1]);
                assert!(first >= second);
            }
        }
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        let mut advertisers = Advertisers::new();
        advertisers.add("Only".to_string(), Category::HobbyFun, 22.0, 1_000.0, 25.0);

        // Two identical publishers produce identical scores; the stable sort
        // must keep publisher 0 ahead of publisher 1
        let mut publishers = Publishers::new();
        publishers.add("Twin A".to_string(), Category::HobbyFun, 22.0, 0.5);
        publishers.add("Twin B".to_string(), Category::HobbyFun, 22.0, 0.5);

        let model = AffinityModel::standard();
        let profile = PreferenceProfile::build(&model, &advertisers, &publishers);
        assert_eq!(profile.advertiser_rankings[0], vec![0, 1]);
    }

    #[test]
    fn test_internal_and_reported_scores_differ_by_bonus() {
        let (advertisers, publishers) = sample_market();
        let model = AffinityModel::standard();
        let profile = PreferenceProfile::build(&model, &advertisers, &publishers);

        // Advertiser 0 and publisher 0 share the HobbyFun category
        let advertiser = &advertisers.advertisers[0];
        let affinity01 = profile.affinities[0][0] / 100.0;
        let ratio = bid_ratio(advertiser.bid, profile.max_bid);

        let internal = profile.ranking_scores[0][0];
        let expected_internal = 0.6 * affinity01 + 0.3 * ratio + 0.1 * 0.15;
        assert!((internal - expected_internal).abs() < 1e-9);

        let reported = profile.match_metrics(0, 0, advertiser.bid).publisher_score;
        let expected_reported = 0.6 * affinity01 + 0.4 * ratio;
        assert!((reported - expected_reported).abs() < 1e-9);
    }

    #[test]
    fn test_scores_within_unit_interval() {
        let (advertisers, publishers) = sample_market();
        let model = AffinityModel::standard();
        let profile = PreferenceProfile::build(&model, &advertisers, &publishers);

        for advertiser in &advertisers.advertisers {
            for publisher in &publishers.publishers {
                let metrics = profile.match_metrics(
                    advertiser.advertiser_id,
                    publisher.publisher_id,
                    advertiser.bid,
                );
                assert!((0.0..=1.0).contains(&metrics.advertiser_score));
                assert!((0.0..=1.0).contains(&metrics.publisher_score));
                assert!((0.0..=100.0).contains(&metrics.affinity));
            }
        }
    }
}

use std::sync::atomic::Ordering;

use crate::affinity::AffinityModel;
use crate::allocation::{AlgorithmResult, AllocatorTrait, Match};
use crate::entities::{Advertisers, Publishers};
use crate::logger::{LogEvent, Logger};
use crate::logln;
use crate::preferences::PreferenceProfile;
use crate::utils::VERBOSE_ALLOCATION;

/// Preference-based allocation: advertiser-proposing deferred acceptance
/// (Gale-Shapley). Produces a one-to-one stable matching: no pair outside
/// the result both strictly prefer each other over their current partners.
///
/// The engine is an inherently sequential state machine (shared engagement
/// state per publisher); it must not be parallelized without explicit
/// synchronization.
pub struct StableMatcher {
    pub model: AffinityModel,
}

impl StableMatcher {
    /// Create a matcher with the standard affinity rule table
    pub fn new() -> Self {
        Self {
            model: AffinityModel::standard(),
        }
    }

    /// Create a matcher with a custom affinity model
    pub fn with_model(model: AffinityModel) -> Self {
        Self { model }
    }
}

impl Default for StableMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocatorTrait for StableMatcher {
    fn mechanism_name(&self) -> &'static str {
        "Deferred Acceptance"
    }

    fn allocate(&self, advertisers: &Advertisers, publishers: &Publishers, logger: &mut Logger) -> AlgorithmResult {
        if advertisers.is_empty() || publishers.is_empty() {
            return AlgorithmResult::empty();
        }

        let profile = PreferenceProfile::build(&self.model, advertisers, publishers);
        let verbose = VERBOSE_ALLOCATION.load(Ordering::Relaxed);

        let advertiser_count = advertisers.len();
        let publisher_count = publishers.len();

        // State: per-advertiser cursor into its ranked publisher list plus a
        // free flag, and per-publisher optional tentative partner. Each
        // advertiser proposes at most once to each publisher, so the loop
        // terminates after at most advertiser_count * publisher_count
        // proposals.
        let mut cursor = vec![0usize; advertiser_count];
        let mut free = vec![true; advertiser_count];
        let mut engaged_to: Vec<Option<usize>> = vec![None; publisher_count];

        // Proposal order among free advertisers does not affect the final
        // matching, only intermediate churn; lowest id first keeps traces
        // reproducible.
        while let Some(proposer) =
            (0..advertiser_count).find(|&a| free[a] && cursor[a] < publisher_count)
        {
            let target = profile.advertiser_rankings[proposer][cursor[proposer]];
            cursor[proposer] += 1;

            match engaged_to[target] {
                None => {
                    engaged_to[target] = Some(proposer);
                    free[proposer] = false;
                    if verbose {
                        logln!(
                            logger,
                            LogEvent::Allocation,
                            "proposal {} -> {}: engaged (publisher was free)",
                            advertisers.advertisers[proposer].advertiser_name,
                            publishers.publishers[target].publisher_name
                        );
                    }
                }
                Some(current) => {
                    // The publisher compares suitors with its internal
                    // ranking score (bid- and category-aware)
                    if profile.ranking_scores[target][proposer] > profile.ranking_scores[target][current] {
                        engaged_to[target] = Some(proposer);
                        free[proposer] = false;
                        free[current] = true;
                        if verbose {
                            logln!(
                                logger,
                                LogEvent::Allocation,
                                "proposal {} -> {}: accepted, {} is free again",
                                advertisers.advertisers[proposer].advertiser_name,
                                publishers.publishers[target].publisher_name,
                                advertisers.advertisers[current].advertiser_name
                            );
                        }
                    } else if verbose {
                        logln!(
                            logger,
                            LogEvent::Allocation,
                            "proposal {} -> {}: rejected",
                            advertisers.advertisers[proposer].advertiser_name,
                            publishers.publishers[target].publisher_name
                        );
                    }
                }
            }
        }

        // Output ordered by publisher id ascending
        let mut matches = Vec::new();
        for (publisher_id, engagement) in engaged_to.iter().enumerate() {
            if let Some(advertiser_id) = *engagement {
                let bid = advertisers.advertisers[advertiser_id].bid;
                let metrics = profile.match_metrics(advertiser_id, publisher_id, bid);
                matches.push(Match {
                    advertiser_id,
                    publisher_id,
                    bid_price: bid,
                    affinity: metrics.affinity,
                    advertiser_score: metrics.advertiser_score,
                    publisher_score: metrics.publisher_score,
                });
            }
        }

        AlgorithmResult::from_matches(matches)
    }
}

/// Brute-force stability check: find a pair not matched to each other where
/// both strictly prefer each other over their current partners (an unmatched
/// side prefers any partner). Returns the first blocking pair as
/// (advertiser_id, publisher_id), or None when the matching is stable.
pub fn find_blocking_pair(
    result: &AlgorithmResult,
    advertisers: &Advertisers,
    publishers: &Publishers,
    model: &AffinityModel,
) -> Option<(usize, usize)> {
    let profile = PreferenceProfile::build(model, advertisers, publishers);

    let mut advertiser_partner: Vec<Option<usize>> = vec![None; advertisers.len()];
    let mut publisher_partner: Vec<Option<usize>> = vec![None; publishers.len()];
    for m in &result.matches {
        advertiser_partner[m.advertiser_id] = Some(m.publisher_id);
        publisher_partner[m.publisher_id] = Some(m.advertiser_id);
    }

    for advertiser in &advertisers.advertisers {
        let a = advertiser.advertiser_id;
        let current_advertiser_score = match advertiser_partner[a] {
            Some(p) => profile.advertiser_score(a, p),
            None => f64::NEG_INFINITY,
        };
        for publisher in &publishers.publishers {
            let p = publisher.publisher_id;
            if advertiser_partner[a] == Some(p) {
                continue;
            }
            let current_publisher_score = match publisher_partner[p] {
                Some(other) => profile.ranking_scores[p][other],
                None => f64::NEG_INFINITY,
            };
            if profile.advertiser_score(a, p) > current_advertiser_score
                && profile.ranking_scores[p][a] > current_publisher_score
            {
                return Some((a, p));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Category;

    fn sample_market() -> (Advertisers, Publishers) {
        let mut advertisers = Advertisers::new();
        advertisers.add("Arcadia Games".to_string(), Category::HobbyFun, 18.0, 3_000.0, 40.0);
        advertisers.add("Crossline Pharma".to_string(), Category::LivingHealth, 55.0, 2_000.0, 35.0);
        advertisers.add("UrbanThread".to_string(), Category::FashionShop, 20.0, 1_500.0, 18.0);
        advertisers.add("DailyVita".to_string(), Category::LivingHealth, 38.0, 900.0, 22.0);

        let mut publishers = Publishers::new();
        publishers.add("WikiTree".to_string(), Category::HobbyFun, 22.0, 0.9);
        publishers.add("Newswire".to_string(), Category::LivingHealth, 52.0, 0.8);
        publishers.add("ShopExpress".to_string(), Category::FashionShop, 34.0, 0.9);
        publishers.add("BandCircle".to_string(), Category::LivingHealth, 48.0, 0.7);
        (advertisers, publishers)
    }

    fn assert_one_to_one(result: &AlgorithmResult) {
        let mut advertiser_seen = std::collections::HashSet::new();
        let mut publisher_seen = std::collections::HashSet::new();
        for m in &result.matches {
            assert!(advertiser_seen.insert(m.advertiser_id), "advertiser matched twice");
            assert!(publisher_seen.insert(m.publisher_id), "publisher matched twice");
        }
    }

    #[test]
    fn test_equal_sets_produce_perfect_matching() {
        let (advertisers, publishers) = sample_market();
        let matcher = StableMatcher::new();
        let result = matcher.allocate(&advertisers, &publishers, &mut Logger::new());

        assert_eq!(result.matches.len(), 4);
        assert_one_to_one(&result);
    }

    #[test]
    fn test_result_is_stable() {
        let (advertisers, publishers) = sample_market();
        let matcher = StableMatcher::new();
        let result = matcher.allocate(&advertisers, &publishers, &mut Logger::new());

        assert_eq!(
            find_blocking_pair(&result, &advertisers, &publishers, &matcher.model),
            None
        );
    }

    #[test]
    fn test_output_sorted_by_publisher_id() {
        let (advertisers, publishers) = sample_market();
        let matcher = StableMatcher::new();
        let result = matcher.allocate(&advertisers, &publishers, &mut Logger::new());

        for pair in result.matches.windows(2) {
            assert!(pair[0].publisher_id < pair[1].publisher_id);
        }
    }

    #[test]
    fn test_surplus_advertisers_stay_free() {
        let (advertisers, _) = sample_market();
        let mut publishers = Publishers::new();
        publishers.add("WikiTree".to_string(), Category::HobbyFun, 22.0, 0.9);
        publishers.add("Newswire".to_string(), Category::LivingHealth, 52.0, 0.8);

        let matcher = StableMatcher::new();
        let result = matcher.allocate(&advertisers, &publishers, &mut Logger::new());

        // Two publishers, four advertisers: exactly two matches, still
        // one-to-one and stable
        assert_eq!(result.matches.len(), 2);
        assert_one_to_one(&result);
        assert_eq!(
            find_blocking_pair(&result, &advertisers, &publishers, &matcher.model),
            None
        );
    }

    #[test]
    fn test_surplus_publishers_leave_none_unmatched_on_demand_side() {
        let mut advertisers = Advertisers::new();
        advertisers.add("Arcadia Games".to_string(), Category::HobbyFun, 18.0, 3_000.0, 40.0);
        advertisers.add("UrbanThread".to_string(), Category::FashionShop, 20.0, 1_500.0, 18.0);
        let (_, publishers) = sample_market();

        let matcher = StableMatcher::new();
        let result = matcher.allocate(&advertisers, &publishers, &mut Logger::new());

        // Every advertiser finds some free publisher eventually
        assert_eq!(result.matches.len(), 2);
        assert_one_to_one(&result);
    }

    #[test]
    fn test_matching_is_deterministic() {
        let (advertisers, publishers) = sample_market();
        let matcher = StableMatcher::new();
        let first = matcher.allocate(&advertisers, &publishers, &mut Logger::new());
        let second = matcher.allocate(&advertisers, &publishers, &mut Logger::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_sets_yield_empty_result() {
        let (advertisers, publishers) = sample_market();
        let matcher = StableMatcher::new();

        let result = matcher.allocate(&Advertisers::new(), &publishers, &mut Logger::new());
        assert!(result.matches.is_empty());
        let result = matcher.allocate(&advertisers, &Publishers::new(), &mut Logger::new());
        assert!(result.matches.is_empty());
        assert_eq!(result.total_satisfaction, 0.0);
    }
}

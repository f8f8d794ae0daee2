use std::sync::atomic::Ordering;

use crate::affinity::AffinityModel;
use crate::allocation::{AlgorithmResult, AllocatorTrait, Match};
use crate::entities::{Advertisers, Publishers};
use crate::logger::{LogEvent, Logger};
use crate::logln;
use crate::preferences::PreferenceProfile;
use crate::utils::VERBOSE_ALLOCATION;

/// Price-driven allocation ("RTB"): one independent highest-bid auction per
/// publisher. An advertiser may win any number of publishers; there is no
/// capacity limit. This intentionally lets high-bid advertisers dominate
/// many publishers irrespective of fit, to surface market-concentration
/// risk.
pub struct AuctionAllocator {
    pub model: AffinityModel,
}

impl AuctionAllocator {
    /// Create an allocator with the standard affinity rule table
    pub fn new() -> Self {
        Self {
            model: AffinityModel::standard(),
        }
    }

    /// Create an allocator with a custom affinity model
    pub fn with_model(model: AffinityModel) -> Self {
        Self { model }
    }
}

impl Default for AuctionAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocatorTrait for AuctionAllocator {
    fn mechanism_name(&self) -> &'static str {
        "RTB"
    }

    fn allocate(&self, advertisers: &Advertisers, publishers: &Publishers, logger: &mut Logger) -> AlgorithmResult {
        if advertisers.is_empty() || publishers.is_empty() {
            return AlgorithmResult::empty();
        }

        let profile = PreferenceProfile::build(&self.model, advertisers, publishers);
        let verbose = VERBOSE_ALLOCATION.load(Ordering::Relaxed);
        let mut matches = Vec::with_capacity(publishers.len());

        for publisher in &publishers.publishers {
            // Winner scan: strictly higher bid wins; on a bid tie the
            // advertiser with the higher preference score at this publisher
            // takes it. Both branches are deterministic, so the first
            // advertiser in candidate order survives a full tie.
            let mut winner = &advertisers.advertisers[0];
            for advertiser in &advertisers.advertisers[1..] {
                if advertiser.bid > winner.bid {
                    winner = advertiser;
                } else if advertiser.bid == winner.bid {
                    let current_score = profile.advertiser_score(winner.advertiser_id, publisher.publisher_id);
                    let challenger_score = profile.advertiser_score(advertiser.advertiser_id, publisher.publisher_id);
                    if challenger_score > current_score {
                        winner = advertiser;
                    }
                }
            }

            let metrics = profile.match_metrics(winner.advertiser_id, publisher.publisher_id, winner.bid);
            if verbose {
                logln!(
                    logger,
                    LogEvent::Allocation,
                    "auction {}: winner {} at bid {:.2} (affinity {:.1})",
                    publisher.publisher_name,
                    winner.advertiser_name,
                    winner.bid,
                    metrics.affinity
                );
            }
            matches.push(Match {
                advertiser_id: winner.advertiser_id,
                publisher_id: publisher.publisher_id,
                bid_price: winner.bid,
                affinity: metrics.affinity,
                advertiser_score: metrics.advertiser_score,
                publisher_score: metrics.publisher_score,
            });
        }

        AlgorithmResult::from_matches(matches)
    }
}

use crate::entities::{Advertisers, Publishers};
use crate::logger::{LogEvent, Logger};
use crate::logln;

/// One advertiser/publisher pairing produced by a mechanism. A pure output
/// value referencing entities by id, not a shared mutable object.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub advertiser_id: usize,
    pub publisher_id: usize,
    /// Copy of the winning/engaged advertiser's bid
    pub bid_price: f64,
    /// Compatibility score in [0, 100]
    pub affinity: f64,
    /// Advertiser-side preference score in [0, 1]
    pub advertiser_score: f64,
    /// Reported publisher-side score in [0, 1]
    pub publisher_score: f64,
}

/// Ordered sequence of matches produced by one mechanism, plus the summed
/// affinity across them
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmResult {
    pub matches: Vec<Match>,
    /// Sum of affinities across all matches
    pub total_satisfaction: f64,
}

impl AlgorithmResult {
    /// Wrap a match sequence, computing total satisfaction
    pub fn from_matches(matches: Vec<Match>) -> Self {
        let total_satisfaction = matches.iter().map(|m| m.affinity).sum();
        Self {
            matches,
            total_satisfaction,
        }
    }

    /// Empty result for degenerate candidate sets
    pub fn empty() -> Self {
        Self {
            matches: Vec::new(),
            total_satisfaction: 0.0,
        }
    }

    /// Log the full match list and totals at the Run level
    pub fn printout(&self, advertisers: &Advertisers, publishers: &Publishers, logger: &mut Logger) {
        for m in &self.matches {
            logln!(
                logger,
                LogEvent::Run,
                "  {} <- {} (bid {:.2}, affinity {:.1}, advertiser score {:.3}, publisher score {:.3})",
                publishers.publishers[m.publisher_id].publisher_name,
                advertisers.advertisers[m.advertiser_id].advertiser_name,
                m.bid_price,
                m.affinity,
                m.advertiser_score,
                m.publisher_score
            );
        }
        logln!(
            logger,
            LogEvent::Run,
            "  {} matches, total satisfaction {:.1}",
            self.matches.len(),
            self.total_satisfaction
        );
    }
}

/// Trait for exposure-allocation mechanisms
///
/// Both mechanisms consume the same immutable candidate sets and produce an
/// AlgorithmResult from scratch on every call; alternative strategies over
/// identical inputs that never interact.
pub trait AllocatorTrait {
    /// Short mechanism name for logs and charts
    fn mechanism_name(&self) -> &'static str;

    /// Produce a match set for the candidate sets
    /// Empty advertiser or publisher set yields an empty result
    fn allocate(&self, advertisers: &Advertisers, publishers: &Publishers, logger: &mut Logger) -> AlgorithmResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_matches_sums_affinity() {
        let matches = vec![
            Match {
                advertiser_id: 0,
                publisher_id: 0,
                bid_price: 40.0,
                affinity: 62.5,
                advertiser_score: 0.625,
                publisher_score: 0.7,
            },
            Match {
                advertiser_id: 1,
                publisher_id: 1,
                bid_price: 35.0,
                affinity: 37.5,
                advertiser_score: 0.375,
                publisher_score: 0.5,
            },
        ];
        let result = AlgorithmResult::from_matches(matches);
        assert!((result.total_satisfaction - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_result() {
        let result = AlgorithmResult::empty();
        assert!(result.matches.is_empty());
        assert_eq!(result.total_satisfaction, 0.0);
    }
}

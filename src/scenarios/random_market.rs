//! Property checks over randomly generated markets.
//!
//! Draws several small markets (uneven side sizes, log-normal bids and
//! budgets) from the seeded generator and verifies mechanism invariants on
//! each: auction winners carry the highest bid, deferred acceptance is
//! stable and matches min(|advertisers|, |publishers|) pairs, fairness
//! stays in [0, 1), and repeated runs are identical. The RAND_SEED set by
//! the runner makes every iteration reproducible.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::allocation::AllocatorTrait;
use crate::auction::AuctionAllocator;
use crate::errln;
use crate::generator::MarketGenerator;
use crate::logger::{LogEvent, Logger};
use crate::logln;
use crate::matching::{find_blocking_pair, StableMatcher};
use crate::metrics::market_fairness;
use crate::utils::{get_seed, lognormal_dist};

// Register this scenario in the catalog
inventory::submit!(crate::scenarios::ScenarioEntry {
    short_name: "random_market",
    run,
});

/// Side sizes exercised per run, including uneven markets in both directions
const MARKET_SHAPES: [(usize, usize); 4] = [(4, 4), (5, 3), (3, 5), (1, 4)];

pub fn run(scenario_name: &str, logger: &mut Logger) -> Result<(), Box<dyn std::error::Error>> {
    let generator = MarketGenerator::new(
        lognormal_dist(25.0, 10.0),  // bid distribution
        lognormal_dist(2_000.0, 1_500.0),  // budget distribution
    );
    let mut rng = StdRng::seed_from_u64(get_seed());

    let auction = AuctionAllocator::new();
    let matcher = StableMatcher::new();

    let mut errors: Vec<String> = Vec::new();

    for (advertiser_count, publisher_count) in MARKET_SHAPES {
        let (advertisers, publishers) = generator.generate(advertiser_count, publisher_count, &mut rng);
        logln!(
            logger,
            LogEvent::Run,
            "Generated market {}v{} (seed {})",
            advertiser_count,
            publisher_count,
            get_seed()
        );

        let rtb_result = auction.allocate(&advertisers, &publishers, logger);
        let da_result = matcher.allocate(&advertisers, &publishers, logger);

        // Auction winners must carry the maximum bid of the candidate set
        let max_bid = advertisers
            .advertisers
            .iter()
            .fold(0.0_f64, |max, a| max.max(a.bid));
        for m in &rtb_result.matches {
            let winner_bid = advertisers.advertisers[m.advertiser_id].bid;
            if winner_bid < max_bid {
                errors.push(format!(
                    "{}v{}: auction winner bid {:.2} below max bid {:.2}",
                    advertiser_count, publisher_count, winner_bid, max_bid
                ));
            }
        }
        if rtb_result.matches.len() != publisher_count {
            errors.push(format!(
                "{}v{}: auction produced {} matches, expected one per publisher",
                advertiser_count,
                publisher_count,
                rtb_result.matches.len()
            ));
        }

        // Deferred acceptance: stable and exactly min(sides) matches
        if let Some((a, p)) = find_blocking_pair(&da_result, &advertisers, &publishers, &matcher.model) {
            errors.push(format!(
                "{}v{}: blocking pair (advertiser {}, publisher {})",
                advertiser_count, publisher_count, a, p
            ));
        }
        let expected_matches = advertiser_count.min(publisher_count);
        if da_result.matches.len() != expected_matches {
            errors.push(format!(
                "{}v{}: deferred acceptance produced {} matches, expected {}",
                advertiser_count,
                publisher_count,
                da_result.matches.len(),
                expected_matches
            ));
        }

        // Fairness gini over win counts stays within [0, 1)
        for (mechanism, result) in [("RTB", &rtb_result), ("DA", &da_result)] {
            let fairness = market_fairness(result, &advertisers);
            if !(0.0..1.0).contains(&fairness) {
                errors.push(format!(
                    "{}v{}: {} fairness {} out of [0, 1)",
                    advertiser_count, publisher_count, mechanism, fairness
                ));
            }
        }

        // Determinism on identical immutable inputs
        if auction.allocate(&advertisers, &publishers, &mut Logger::new()) != rtb_result
            || matcher.allocate(&advertisers, &publishers, &mut Logger::new()) != da_result
        {
            errors.push(format!(
                "{}v{}: repeated run produced a different result",
                advertiser_count, publisher_count
            ));
        }
    }

    logln!(logger, LogEvent::Scenario, "");
    if errors.is_empty() {
        logln!(
            logger,
            LogEvent::Scenario,
            "✓ All property checks passed over {} generated markets",
            MARKET_SHAPES.len()
        );
        Ok(())
    } else {
        for error in &errors {
            errln!(logger, LogEvent::Scenario, "✗ {}", error);
        }
        Err(format!("Scenario '{}' validation failed:\n{}", scenario_name, errors.join("\n")).into())
    }
}

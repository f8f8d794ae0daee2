//! Concentration regression: one whale advertiser (outsized budget and bid)
//! against three ordinary advertisers over four mixed publishers.
//!
//! The auction mechanism is expected to hand every publisher to the whale
//! regardless of fit, while deferred acceptance spreads exposure; market
//! fairness (win-count Gini) of RTB must come out meaningfully higher.
//! These are empirical regression checks on the sample catalog, not proven
//! invariants.

use crate::allocation::AllocatorTrait;
use crate::auction::AuctionAllocator;
use crate::catalog::{advertiser_subset, publisher_subset, sample_market};
use crate::errln;
use crate::logger::{LogEvent, Logger};
use crate::logln;
use crate::matching::StableMatcher;
use crate::metrics::market_fairness;

// Register this scenario in the catalog
inventory::submit!(crate::scenarios::ScenarioEntry {
    short_name: "whale_concentration",
    run,
});

pub fn run(scenario_name: &str, logger: &mut Logger) -> Result<(), Box<dyn std::error::Error>> {
    let (catalog_advertisers, catalog_publishers) = sample_market();
    // Whale plus three ordinary advertisers (bids 150 / 20 / 35 / 25)
    let advertisers = advertiser_subset(&catalog_advertisers, &[0, 1, 2, 3]);
    // Four publishers of mixed categories and audience ages
    let publishers = publisher_subset(&catalog_publishers, &[0, 3, 6, 7]);

    let auction = AuctionAllocator::new();
    let matcher = StableMatcher::new();

    logln!(logger, LogEvent::Run, "RTB allocation:");
    let rtb_result = auction.allocate(&advertisers, &publishers, logger);
    rtb_result.printout(&advertisers, &publishers, logger);

    logln!(logger, LogEvent::Run, "Deferred acceptance allocation:");
    let da_result = matcher.allocate(&advertisers, &publishers, logger);
    da_result.printout(&advertisers, &publishers, logger);

    let rtb_fairness = market_fairness(&rtb_result, &advertisers);
    let da_fairness = market_fairness(&da_result, &advertisers);

    logln!(logger, LogEvent::Scenario, "");
    let mut errors: Vec<String> = Vec::new();

    // Check: the whale's strictly-highest bid wins every single auction
    let whale_wins = rtb_result.matches.iter().filter(|m| m.advertiser_id == 0).count();
    let msg = format!(
        "Whale wins every auction: {} of {} publishers",
        whale_wins,
        publishers.len()
    );
    if whale_wins == publishers.len() {
        logln!(logger, LogEvent::Scenario, "✓ {}", msg);
    } else {
        errors.push(msg.clone());
        errln!(logger, LogEvent::Scenario, "✗ {}", msg);
    }

    // Check: RTB concentrates exposure, so its win-count Gini is higher
    let msg = format!(
        "RTB market fairness gini is higher than deferred acceptance: {:.3} > {:.3}",
        rtb_fairness, da_fairness
    );
    if rtb_fairness > da_fairness {
        logln!(logger, LogEvent::Scenario, "✓ {}", msg);
    } else {
        errors.push(msg.clone());
        errln!(logger, LogEvent::Scenario, "✗ {}", msg);
    }

    // Check: fit-blind concentration costs aggregate satisfaction
    // (true on this catalog because the whale is heavily penalized off its
    // preferred category)
    let msg = format!(
        "Deferred acceptance total satisfaction is higher than RTB: {:.1} > {:.1}",
        da_result.total_satisfaction, rtb_result.total_satisfaction
    );
    if da_result.total_satisfaction > rtb_result.total_satisfaction {
        logln!(logger, LogEvent::Scenario, "✓ {}", msg);
    } else {
        errors.push(msg.clone());
        errln!(logger, LogEvent::Scenario, "✗ {}", msg);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!("Scenario '{}' validation failed:\n{}", scenario_name, errors.join("\n")).into())
    }
}

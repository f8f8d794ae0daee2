//! Full-catalog run: eight advertisers against eight publishers.
//!
//! With equal side sizes and total preference lists, deferred acceptance
//! must produce a perfect one-to-one matching with no blocking pair, and
//! both mechanisms must be fully deterministic across repeated runs.

use crate::allocation::AllocatorTrait;
use crate::auction::AuctionAllocator;
use crate::catalog::sample_market;
use crate::errln;
use crate::logger::{LogEvent, Logger};
use crate::logln;
use crate::matching::{find_blocking_pair, StableMatcher};
use crate::metrics::market_fairness;

// Register this scenario in the catalog
inventory::submit!(crate::scenarios::ScenarioEntry {
    short_name: "balanced_market",
    run,
});

pub fn run(scenario_name: &str, logger: &mut Logger) -> Result<(), Box<dyn std::error::Error>> {
    let (advertisers, publishers) = sample_market();

    let auction = AuctionAllocator::new();
    let matcher = StableMatcher::new();

    logln!(logger, LogEvent::Run, "RTB allocation:");
    let rtb_result = auction.allocate(&advertisers, &publishers, logger);
    rtb_result.printout(&advertisers, &publishers, logger);

    logln!(logger, LogEvent::Run, "Deferred acceptance allocation:");
    let da_result = matcher.allocate(&advertisers, &publishers, logger);
    da_result.printout(&advertisers, &publishers, logger);

    logln!(logger, LogEvent::Scenario, "");
    let mut errors: Vec<String> = Vec::new();

    // Check: perfect matching under equal side sizes
    let mut advertiser_matched = vec![0usize; advertisers.len()];
    let mut publisher_matched = vec![0usize; publishers.len()];
    for m in &da_result.matches {
        advertiser_matched[m.advertiser_id] += 1;
        publisher_matched[m.publisher_id] += 1;
    }
    let perfect = da_result.matches.len() == advertisers.len()
        && advertiser_matched.iter().all(|&c| c == 1)
        && publisher_matched.iter().all(|&c| c == 1);
    let msg = format!(
        "Deferred acceptance yields a perfect one-to-one matching: {} matches over {}v{}",
        da_result.matches.len(),
        advertisers.len(),
        publishers.len()
    );
    if perfect {
        logln!(logger, LogEvent::Scenario, "✓ {}", msg);
    } else {
        errors.push(msg.clone());
        errln!(logger, LogEvent::Scenario, "✗ {}", msg);
    }

    // Check: no blocking pair (brute force over all pairs)
    let blocking = find_blocking_pair(&da_result, &advertisers, &publishers, &matcher.model);
    let msg = match blocking {
        None => "Deferred acceptance matching is stable (no blocking pair)".to_string(),
        Some((a, p)) => format!(
            "Deferred acceptance matching has blocking pair ({}, {})",
            advertisers.advertisers[a].advertiser_name, publishers.publishers[p].publisher_name
        ),
    };
    if blocking.is_none() {
        logln!(logger, LogEvent::Scenario, "✓ {}", msg);
    } else {
        errors.push(msg.clone());
        errln!(logger, LogEvent::Scenario, "✗ {}", msg);
    }

    // Check: satisfaction totals equal the sum of match affinities and every
    // affinity is within [0, 100]
    let rtb_sum: f64 = rtb_result.matches.iter().map(|m| m.affinity).sum();
    let da_sum: f64 = da_result.matches.iter().map(|m| m.affinity).sum();
    let bounds_ok = rtb_result
        .matches
        .iter()
        .chain(da_result.matches.iter())
        .all(|m| (0.0..=100.0).contains(&m.affinity));
    let totals_ok = (rtb_result.total_satisfaction - rtb_sum).abs() < 1e-9
        && (da_result.total_satisfaction - da_sum).abs() < 1e-9;
    let msg = format!(
        "Satisfaction totals are consistent and affinities bounded: RTB {:.1}, DA {:.1}",
        rtb_result.total_satisfaction, da_result.total_satisfaction
    );
    if totals_ok && bounds_ok {
        logln!(logger, LogEvent::Scenario, "✓ {}", msg);
    } else {
        errors.push(msg.clone());
        errln!(logger, LogEvent::Scenario, "✗ {}", msg);
    }

    // Check: both mechanisms are deterministic on identical inputs
    let rtb_again = auction.allocate(&advertisers, &publishers, &mut Logger::new());
    let da_again = matcher.allocate(&advertisers, &publishers, &mut Logger::new());
    let msg = "Repeated runs produce identical, order-stable results".to_string();
    if rtb_again == rtb_result && da_again == da_result {
        logln!(logger, LogEvent::Scenario, "✓ {}", msg);
    } else {
        errors.push(msg.clone());
        errln!(logger, LogEvent::Scenario, "✗ {}", msg);
    }

    // Check: the whale still concentrates the auction on the full catalog
    let rtb_fairness = market_fairness(&rtb_result, &advertisers);
    let da_fairness = market_fairness(&da_result, &advertisers);
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

    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!("Scenario '{}' validation failed:\n{}", scenario_name, errors.join("\n")).into())
    }
}

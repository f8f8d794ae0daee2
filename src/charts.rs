use plotters::prelude::*;

use crate::allocation::AllocatorTrait;
use crate::auction::AuctionAllocator;
use crate::catalog::sample_market;
use crate::logger::Logger;
use crate::matching::StableMatcher;
use crate::metrics::{market_fairness, win_counts};

/// Run both mechanisms over the sample catalog and render comparison
/// charts: per-advertiser win counts (RTB blue, deferred acceptance red)
/// and total-satisfaction bars, written as PNG files into the working
/// directory.
pub fn generate_comparison_charts() -> Result<(), Box<dyn std::error::Error>> {
    let (advertisers, publishers) = sample_market();
    let mut logger = Logger::new();

    let auction = AuctionAllocator::new();
    let matcher = StableMatcher::new();
    let rtb_result = auction.allocate(&advertisers, &publishers, &mut logger);
    let da_result = matcher.allocate(&advertisers, &publishers, &mut logger);

    let rtb_counts = win_counts(&rtb_result, &advertisers);
    let da_counts = win_counts(&da_result, &advertisers);

    // Win-count distribution chart
    let max_count = rtb_counts
        .iter()
        .chain(da_counts.iter())
        .fold(1.0_f64, |max, &c| max.max(c));
    let advertiser_count = advertisers.len();

    let root = BitMapBackend::new("win_counts.png", (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Publisher wins per advertiser", ("sans-serif", 40).into_font())
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..advertiser_count as f64, 0.0..max_count + 1.0)?;

    chart
        .configure_mesh()
        .x_desc("Advertiser id (RTB blue, deferred acceptance red)")
        .y_desc("Publishers won")
        .draw()?;

    // Grouped bars: RTB on the left half of each slot, deferred acceptance
    // on the right half
    for (i, (&rtb, &da)) in rtb_counts.iter().zip(da_counts.iter()).enumerate() {
        let slot = i as f64;
        if rtb > 0.0 {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(slot + 0.1, 0.0), (slot + 0.45, rtb)],
                BLUE.filled(),
            )))?;
        }
        if da > 0.0 {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(slot + 0.55, 0.0), (slot + 0.9, da)],
                RED.filled(),
            )))?;
        }
    }
    root.present()?;

    // Total-satisfaction comparison chart
    let max_satisfaction = rtb_result
        .total_satisfaction
        .max(da_result.total_satisfaction)
        .max(1.0);

    let root = BitMapBackend::new("satisfaction.png", (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Total satisfaction by mechanism", ("sans-serif", 40).into_font())
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..2.0, 0.0..max_satisfaction * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Mechanism (RTB blue, deferred acceptance red)")
        .y_desc("Summed affinity")
        .draw()?;

    chart.draw_series(std::iter::once(Rectangle::new(
        [(0.1, 0.0), (0.9, rtb_result.total_satisfaction)],
        BLUE.filled(),
    )))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(1.1, 0.0), (1.9, da_result.total_satisfaction)],
        RED.filled(),
    )))?;
    root.present()?;

    println!("Charts saved to win_counts.png and satisfaction.png");
    println!(
        "RTB: satisfaction {:.1}, fairness gini {:.3}",
        rtb_result.total_satisfaction,
        market_fairness(&rtb_result, &advertisers)
    );
    println!(
        "Deferred acceptance: satisfaction {:.1}, fairness gini {:.3}",
        da_result.total_satisfaction,
        market_fairness(&da_result, &advertisers)
    );

    Ok(())
}

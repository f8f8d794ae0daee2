use crate::entities::{age_range, Advertiser, Advertisers, Category, Publisher, Publishers};

/// Static sample market: eight advertisers and eight publishers with mixed
/// categories, ages, and bid levels. Advertiser 0 ("Global Cosmetics") is
/// the dominant whale: an outsized budget and bid paired with the
/// dominant-placement context rule. Publisher 5 ("FlashArcade") is flagged
/// as an inappropriate-audience outlet.
///
/// The catalog owns input validation: everything here satisfies the engine
/// preconditions (non-negative budgets and bids, authority in [0, 1]).
pub fn sample_market() -> (Advertisers, Publishers) {
    let mut advertisers = Advertisers::new();
    advertisers.add_advanced(Advertiser {
        advertiser_id: 0,
        advertiser_name: "Global Cosmetics".to_string(),
        category: Category::FashionShop,
        target_age: 25.0,
        target_age_range: age_range(25.0),
        budget: 100_000.0,
        bid: 150.0,
        dominant: true,
        preferred_category: Category::FashionShop,
    });
    advertisers.add("Gentle Optics".to_string(), Category::LivingHealth, 45.0, 800.0, 20.0);
    advertisers.add("Crossline Pharma".to_string(), Category::LivingHealth, 55.0, 2_000.0, 35.0);
    // Kids brand, but the buyers are the parents
    advertisers.add("PlayPony Toys".to_string(), Category::HobbyFun, 32.0, 1_000.0, 25.0);
    advertisers.add("Sonica Entertainment".to_string(), Category::HobbyFun, 30.0, 1_200.0, 30.0);
    advertisers.add("DailyVita".to_string(), Category::LivingHealth, 38.0, 900.0, 22.0);
    advertisers.add("Arcadia Games".to_string(), Category::HobbyFun, 18.0, 3_000.0, 40.0);
    advertisers.add("UrbanThread".to_string(), Category::FashionShop, 20.0, 1_500.0, 18.0);

    let mut publishers = Publishers::new();
    publishers.add("WikiTree".to_string(), Category::HobbyFun, 22.0, 0.9);
    publishers.add("BandCircle".to_string(), Category::LivingHealth, 48.0, 0.7);
    publishers.add("WebtoonHub".to_string(), Category::HobbyFun, 16.0, 0.8);
    publishers.add("Newswire".to_string(), Category::LivingHealth, 52.0, 0.8);
    publishers.add("OpenBoard".to_string(), Category::HobbyFun, 26.0, 0.6);
    publishers.add_advanced(Publisher {
        publisher_id: 0,
        publisher_name: "FlashArcade".to_string(),
        category: Category::HobbyFun,
        audience_age: 12.0,
        audience_age_range: age_range(12.0),
        authority: 0.3,
        inappropriate_audience: true,
    });
    publishers.add("ShopExpress".to_string(), Category::FashionShop, 34.0, 0.9);
    publishers.add("FanVerse".to_string(), Category::FashionShop, 16.0, 0.5);

    (advertisers, publishers)
}

/// Build a working set from selected catalog advertisers. IDs are
/// renumbered to match the new Vec indices, as the engine requires.
pub fn advertiser_subset(catalog: &Advertisers, selected: &[usize]) -> Advertisers {
    let mut subset = Advertisers::new();
    for &index in selected {
        subset.add_advanced(catalog.advertisers[index].clone());
    }
    subset
}

/// Build a working set from selected catalog publishers, renumbering IDs
pub fn publisher_subset(catalog: &Publishers, selected: &[usize]) -> Publishers {
    let mut subset = Publishers::new();
    for &index in selected {
        subset.add_advanced(catalog.publishers[index].clone());
    }
    subset
}

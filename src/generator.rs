use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::Distribution;

use crate::entities::{Advertisers, Category, Publishers};

/// Object-safe wrapper for Distribution<f64> that works with StdRng
/// This is needed because Distribution<f64> cannot be made into a trait object
/// due to its generic sample method
pub trait DistributionF64 {
    fn sample(&self, rng: &mut StdRng) -> f64;
}

impl<D: Distribution<f64>> DistributionF64 for D {
    fn sample(&self, rng: &mut StdRng) -> f64 {
        Distribution::sample(self, rng)
    }
}

const CATEGORIES: [Category; 3] = [
    Category::LivingHealth,
    Category::HobbyFun,
    Category::FashionShop,
];

/// Randomized candidate-set generator for property-style scenario runs.
/// Bids and budgets come from caller-supplied distributions (log-normal in
/// practice); ages and authority are uniform; categories are drawn evenly.
pub struct MarketGenerator {
    pub bid_dist: Box<dyn DistributionF64>,
    pub budget_dist: Box<dyn DistributionF64>,
}

impl MarketGenerator {
    /// Create a generator from bid and budget distributions
    /// The distributions will be boxed internally
    pub fn new<D1, D2>(bid_dist: D1, budget_dist: D2) -> Self
    where
        D1: Distribution<f64> + 'static,
        D2: Distribution<f64> + 'static,
    {
        Self {
            bid_dist: Box::new(bid_dist),
            budget_dist: Box::new(budget_dist),
        }
    }

    /// Generate one market with the given side sizes
    /// Deterministic for a given RNG state
    pub fn generate(
        &self,
        advertiser_count: usize,
        publisher_count: usize,
        rng: &mut StdRng,
    ) -> (Advertisers, Publishers) {
        let mut advertisers = Advertisers::new();
        for i in 0..advertiser_count {
            let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
            let target_age = rng.gen_range(12.0..60.0);
            let budget = self.budget_dist.sample(rng);
            let bid = self.bid_dist.sample(rng);
            advertisers.add(format!("Advertiser {}", i), category, target_age, budget, bid);
        }

        let mut publishers = Publishers::new();
        for i in 0..publisher_count {
            let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
            let audience_age = rng.gen_range(12.0..60.0);
            let authority = rng.gen_range(0.0..1.0);
            publishers.add(format!("Publisher {}", i), category, audience_age, authority);
        }

        (advertisers, publishers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::lognormal_dist;
    use rand::SeedableRng;

    #[test]
    fn test_generate_shapes_and_bounds() {
        let generator = MarketGenerator::new(lognormal_dist(25.0, 10.0), lognormal_dist(2_000.0, 1_000.0));
        let mut rng = StdRng::seed_from_u64(7);
        let (advertisers, publishers) = generator.generate(5, 4, &mut rng);

        assert_eq!(advertisers.len(), 5);
        assert_eq!(publishers.len(), 4);
        for (i, advertiser) in advertisers.advertisers.iter().enumerate() {
            assert_eq!(advertiser.advertiser_id, i);
            assert!(advertiser.bid > 0.0);
            assert!(advertiser.budget > 0.0);
        }
        for publisher in &publishers.publishers {
            assert!((0.0..=1.0).contains(&publisher.authority));
        }
    }

    #[test]
    fn test_same_seed_same_market() {
        let generator = MarketGenerator::new(lognormal_dist(25.0, 10.0), lognormal_dist(2_000.0, 1_000.0));
        let (a1, p1) = generator.generate(3, 3, &mut StdRng::seed_from_u64(42));
        let (a2, p2) = generator.generate(3, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a1.advertisers, a2.advertisers);
        assert_eq!(p1.publishers, p2.publishers);
    }
}

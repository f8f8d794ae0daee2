use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use rand_distr::LogNormal;

/// Global seed for random market generation, set per iteration by the runner
pub static RAND_SEED: AtomicU64 = AtomicU64::new(0);

/// When set, allocators emit per-decision detail at the Allocation log level
pub static VERBOSE_ALLOCATION: AtomicBool = AtomicBool::new(false);

/// Get the current seed for seeding StdRng instances
pub fn get_seed() -> u64 {
    RAND_SEED.load(Ordering::Relaxed)
}

/// Convert mean and standard deviation to log-normal distribution parameters
/// Returns (μ, σ) for LogNormal(μ, σ) that approximates the given mean and stddev
///
/// For LogNormal(μ, σ):
/// - E[X] = exp(μ + σ²/2)
/// - Var[X] = (exp(σ²) - 1) * exp(2μ + σ²)
///
/// To convert from mean (m) and stddev (s):
/// - σ = sqrt(ln(1 + s²/m²))
/// - μ = ln(m) - σ²/2
fn lognormal_from_mean_stddev(mean: f64, stddev: f64) -> (f64, f64) {
    let variance = stddev * stddev;
    let sigma_squared = (1.0 + variance / (mean * mean)).ln();
    let sigma = sigma_squared.sqrt();
    let mu = mean.ln() - sigma_squared / 2.0;
    (mu, sigma)
}

/// Create a log-normal distribution from mean and standard deviation
/// This is a convenience wrapper that converts mean/stddev to log-normal parameters
/// Panics if the parameters are degenerate (mean and stddev must be positive)
pub fn lognormal_dist(mean: f64, stddev: f64) -> LogNormal<f64> {
    let (mu, sigma) = lognormal_from_mean_stddev(mean, stddev);
    LogNormal::new(mu, sigma).expect("invalid log-normal parameters")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lognormal_from_mean_stddev() {
        // For mean 10.0 and stddev 3.0 the round-trip mean must come back out
        let (mu, sigma) = lognormal_from_mean_stddev(10.0, 3.0);
        let mean_back = (mu + sigma * sigma / 2.0).exp();
        assert!((mean_back - 10.0).abs() < 1e-9);
    }
}

//! Randomness for key generation and encryption.
//!
//! Every operation that draws randomness takes an explicit [`Sampler`]
//! rather than touching a process-wide generator, so concurrent calls are
//! reproducible and never race on shared state. The sampler wraps a seeded
//! ChaCha20 stream and knows which error distribution the scheme uses.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// Error distribution used for secret keys and encryption noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorDistribution {
    /// Discrete Gaussian with the configured standard deviation.
    Gaussian,
    /// Uniform over {-1, 0, 1}.
    Ternary,
}

/// Explicit randomness source for key generation and encryption.
///
/// Holds a ChaCha20 stream so the same seed always produces the same keys
/// and ciphertexts.
#[derive(Clone)]
pub struct Sampler {
    distribution: ErrorDistribution,
    sigma: f64,
    rng: ChaCha20Rng,
}

impl Sampler {
    /// Create a sampler seeded from system entropy
    pub fn new(distribution: ErrorDistribution, sigma: f64) -> Self {
        Self {
            distribution,
            sigma,
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Create a deterministic sampler from a u64 seed
    pub fn with_seed(distribution: ErrorDistribution, sigma: f64, seed: u64) -> Self {
        Self {
            distribution,
            sigma,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Create a deterministic sampler from a 32-byte seed
    pub fn from_seed(distribution: ErrorDistribution, sigma: f64, seed: [u8; 32]) -> Self {
        Self {
            distribution,
            sigma,
            rng: ChaCha20Rng::from_seed(seed),
        }
    }

    /// Get the standard deviation
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Get the configured error distribution
    pub fn distribution(&self) -> ErrorDistribution {
        self.distribution
    }

    /// Sample from the discrete Gaussian D_σ via Box-Muller with rounding
    pub fn sample_gaussian(&mut self) -> i64 {
        let u1: f64 = self.rng.gen_range(f64::MIN_POSITIVE..1.0);
        let u2: f64 = self.rng.gen_range(0.0..1.0);

        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        (z * self.sigma).round() as i64
    }

    /// Sample uniformly from {-1, 0, 1}
    pub fn sample_ternary(&mut self) -> i64 {
        self.rng.gen_range(-1i64..=1)
    }

    /// Sample one error term from the configured distribution
    pub fn sample_error(&mut self) -> i64 {
        match self.distribution {
            ErrorDistribution::Gaussian => self.sample_gaussian(),
            ErrorDistribution::Ternary => self.sample_ternary(),
        }
    }

    /// Sample a vector of n error terms
    pub fn error_vec(&mut self, n: usize) -> Vec<i64> {
        (0..n).map(|_| self.sample_error()).collect()
    }

    /// Sample a vector of n ternary values
    pub fn ternary_vec(&mut self, n: usize) -> Vec<i64> {
        (0..n).map(|_| self.sample_ternary()).collect()
    }

    /// Sample a vector of n values uniform in [0, q)
    pub fn uniform_vec(&mut self, n: usize, q: u64) -> Vec<u64> {
        (0..n).map(|_| self.rng.gen_range(0..q)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_distribution() {
        let mut sampler = Sampler::with_seed(ErrorDistribution::Gaussian, 3.2, 42);

        let samples: Vec<i64> = (0..10000).map(|_| sampler.sample_gaussian()).collect();

        let mean: f64 = samples.iter().map(|&x| x as f64).sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.5, "Mean {} should be close to 0", mean);

        let variance: f64 = samples
            .iter()
            .map(|&x| (x as f64 - mean).powi(2))
            .sum::<f64>()
            / samples.len() as f64;
        let std_dev = variance.sqrt();
        assert!(
            (std_dev - 3.2).abs() < 0.5,
            "Std dev {} should be close to sigma",
            std_dev
        );
    }

    #[test]
    fn test_ternary_range() {
        let mut sampler = Sampler::with_seed(ErrorDistribution::Ternary, 0.0, 7);
        for _ in 0..1000 {
            let v = sampler.sample_ternary();
            assert!((-1..=1).contains(&v));
        }
    }

    #[test]
    fn test_seeded_reproducibility() {
        let mut a = Sampler::with_seed(ErrorDistribution::Gaussian, 3.2, 99);
        let mut b = Sampler::with_seed(ErrorDistribution::Gaussian, 3.2, 99);

        assert_eq!(a.error_vec(64), b.error_vec(64));
        assert_eq!(a.uniform_vec(64, 12289), b.uniform_vec(64, 12289));
    }

    #[test]
    fn test_uniform_range() {
        let mut sampler = Sampler::with_seed(ErrorDistribution::Gaussian, 3.2, 1);
        let q = 12289;
        for v in sampler.uniform_vec(1000, q) {
            assert!(v < q);
        }
    }
}

//! Scheme parameters and the validated evaluation context.
//!
//! [`BgvParams`] is plain configuration; [`BgvContext`] is the immutable,
//! validated form every operation takes. Construction rejects invalid
//! combinations up front so the rest of the crate can assume a well-formed
//! modulus chain.
//!
//! Levels count down: a fresh ciphertext sits at `top_level()` under the
//! largest modulus `q0`; each modulus switch moves one level down the chain
//! until level 0, the smallest modulus, where no multiplicative depth
//! remains.

use crate::error::{BgvError, Result};
use crate::math::ErrorDistribution;
use serde::{Deserialize, Serialize};

/// Largest admissible chain modulus.
///
/// Caps every modulus at 2^54 so the centered tensor product of two ring
/// elements fits an i128 for any power-of-two ring degree up to 2^16.
pub const MAX_MODULUS: u64 = 1 << 54;

/// Core cryptographic parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BgvParams {
    /// Ring degree n (power of two).
    pub ring_dim: usize,

    /// Modulus chain q0 > q1 > ... > qL, one modulus per level.
    /// The maximum multiplicative depth is the chain length minus one.
    pub moduli: Vec<u64>,

    /// Plaintext modulus t.
    pub plain_modulus: u64,

    /// Standard deviation for Gaussian error sampling.
    pub sigma: f64,

    /// Error distribution for secret keys and encryption noise.
    pub error: ErrorDistribution,

    /// Digit-decomposition base for the relinearization key. Larger bases
    /// shrink the key and grow the key-switching noise.
    pub relin_base: u64,
}

impl BgvParams {
    /// 128-bit secure parameters for n = 2048, two multiplicative levels.
    ///
    /// The chain uses power-of-two moduli; none of the scheme's arithmetic
    /// requires primality or NTT-friendliness.
    pub fn secure_128_n2048() -> Self {
        Self {
            ring_dim: 2048,
            moduli: vec![1 << 52, 1 << 40, 1 << 28],
            plain_modulus: 257,
            sigma: 3.2,
            error: ErrorDistribution::Gaussian,
            relin_base: 1 << 13,
        }
    }
}

impl Default for BgvParams {
    fn default() -> Self {
        Self::secure_128_n2048()
    }
}

/// Validated, immutable evaluation context.
///
/// Wraps a parameter set that passed construction-time checks and
/// precomputes the per-level scaling factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BgvContext {
    params: BgvParams,
    /// Δ_j = ⌊q_j / t⌋ per chain index.
    deltas: Vec<u64>,
}

impl BgvContext {
    /// Validate a parameter set and build the context.
    ///
    /// Fails with [`BgvError::InvalidParameters`] if the ring degree is not
    /// a power of two, the modulus chain is empty or not strictly
    /// decreasing, any modulus exceeds [`MAX_MODULUS`] or is too close to
    /// the plaintext modulus for exact decoding, or the plaintext modulus
    /// or decomposition base is degenerate.
    pub fn new(params: BgvParams) -> Result<Self> {
        if !params.ring_dim.is_power_of_two() || params.ring_dim < 2 {
            return Err(BgvError::InvalidParameters(format!(
                "ring_dim {} must be a power of two (>= 2)",
                params.ring_dim
            )));
        }
        if params.ring_dim > (1 << 16) {
            return Err(BgvError::InvalidParameters(format!(
                "ring_dim {} exceeds the supported maximum of 2^16",
                params.ring_dim
            )));
        }
        if params.moduli.is_empty() {
            return Err(BgvError::InvalidParameters(
                "modulus chain is empty".into(),
            ));
        }
        if !params.moduli.windows(2).all(|w| w[0] > w[1]) {
            return Err(BgvError::InvalidParameters(
                "modulus chain must be strictly decreasing".into(),
            ));
        }
        if params.plain_modulus < 2 {
            return Err(BgvError::InvalidParameters(format!(
                "plain_modulus {} must be at least 2",
                params.plain_modulus
            )));
        }
        let t = params.plain_modulus as u128;
        for &q in &params.moduli {
            if q > MAX_MODULUS {
                return Err(BgvError::InvalidParameters(format!(
                    "modulus {} exceeds the 2^54 coefficient-arithmetic cap",
                    q
                )));
            }
            // Each modulus needs enough headroom over t for the rounding in
            // decode and decrypt to be exact.
            if (q as u128) <= 2 * t * t {
                return Err(BgvError::InvalidParameters(format!(
                    "modulus {} must exceed 2*t^2 = {}",
                    q,
                    2 * t * t
                )));
            }
        }
        if params.relin_base < 2 {
            return Err(BgvError::InvalidParameters(format!(
                "relin_base {} must be at least 2",
                params.relin_base
            )));
        }
        if params.error == ErrorDistribution::Gaussian && params.sigma <= 0.0 {
            return Err(BgvError::InvalidParameters(format!(
                "sigma {} must be positive for Gaussian errors",
                params.sigma
            )));
        }

        let t = params.plain_modulus;
        let deltas = params.moduli.iter().map(|&q| q / t).collect();

        Ok(Self { params, deltas })
    }

    /// The underlying parameter set
    pub fn params(&self) -> &BgvParams {
        &self.params
    }

    /// Ring degree n
    pub fn ring_dim(&self) -> usize {
        self.params.ring_dim
    }

    /// Plaintext modulus t
    pub fn plain_modulus(&self) -> u64 {
        self.params.plain_modulus
    }

    /// Modulus chain
    pub fn moduli(&self) -> &[u64] {
        &self.params.moduli
    }

    /// Maximum multiplicative depth: chain length minus one
    pub fn depth(&self) -> usize {
        self.params.moduli.len() - 1
    }

    /// Level of a fresh ciphertext
    pub fn top_level(&self) -> usize {
        self.depth()
    }

    /// Modulus in effect at the given level (level counts down to 0)
    pub fn modulus_at_level(&self, level: usize) -> u64 {
        assert!(level <= self.depth(), "level {} out of range", level);
        self.params.moduli[self.depth() - level]
    }

    /// Scaling factor Δ = ⌊q_level / t⌋ at the given level
    pub fn delta_at_level(&self, level: usize) -> u64 {
        assert!(level <= self.depth(), "level {} out of range", level);
        self.deltas[self.depth() - level]
    }

    /// Correctness bound q_level / (2t): decryption is reliable while the
    /// noise magnitude stays below this value.
    pub fn noise_bound(&self, level: usize) -> f64 {
        self.modulus_at_level(level) as f64 / (2.0 * self.params.plain_modulus as f64)
    }

    /// Effective per-coefficient magnitude of one error sample.
    pub fn error_width(&self) -> f64 {
        match self.params.error {
            ErrorDistribution::Gaussian => self.params.sigma,
            ErrorDistribution::Ternary => 1.0,
        }
    }

    /// Estimated noise magnitude of a fresh encryption.
    ///
    /// A fresh ciphertext carries e1 + u*e_pk + s*e2 with ternary u and s;
    /// the two convolutions of n terms at density 2/3 dominate, giving the
    /// sqrt(2n/3) factor per convolution.
    pub fn fresh_noise(&self) -> f64 {
        let n = self.params.ring_dim as f64;
        self.error_width() * (1.0 + 2.0 * (2.0 * n / 3.0).sqrt())
    }

    /// Number of digits of q_j in the relinearization base
    pub fn relin_digits(&self, modulus: u64) -> usize {
        let base = self.params.relin_base;
        let mut digits = 0;
        let mut value = modulus;
        while value > 0 {
            value /= base;
            digits += 1;
        }
        digits
    }
}

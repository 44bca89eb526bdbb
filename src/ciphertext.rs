//! Plaintext and ciphertext value types.
//!
//! Both are plain value objects: encode/encrypt and the evaluator produce
//! them, nothing mutates them in place, and the caller drops them when done.
//! A ciphertext is tagged with its modulus-chain level and a running noise
//! estimate; the estimate is what `decrypt` checks against the correctness
//! bound and what `noise_budget` reports.

use crate::math::RingElement;
use crate::params::BgvContext;
use serde::{Deserialize, Serialize};

/// Unencrypted message polynomial at the scheme's scale.
///
/// Coefficients carry the encoded values multiplied by Δ = ⌊q/t⌋ under the
/// modulus of the level the plaintext belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plaintext {
    /// Scaled message polynomial.
    pub poly: RingElement,
}

impl Plaintext {
    /// Wrap a scaled message polynomial
    pub fn from_poly(poly: RingElement) -> Self {
        Self { poly }
    }

    /// Ring degree
    pub fn ring_dim(&self) -> usize {
        self.poly.dimension()
    }

    /// Modulus the plaintext is scaled under
    pub fn modulus(&self) -> u64 {
        self.poly.modulus()
    }
}

/// Ciphertext: two ring elements, or three transiently after multiplication
/// until relinearization collapses the quadratic component.
///
/// Decryption computes `c0 + c1*s (+ c2*s^2)` under the modulus of the
/// tagged level and is reliable while `noise` stays below `q_level / (2t)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ciphertext {
    /// Polynomial components c0, c1 and, post-multiplication, c2.
    pub components: Vec<RingElement>,
    /// Position in the modulus chain; 0 is the bottom.
    pub level: usize,
    /// Estimated magnitude of the accumulated error term.
    pub noise: f64,
}

impl Ciphertext {
    /// Create a ciphertext from its component polynomials
    pub fn new(components: Vec<RingElement>, level: usize, noise: f64) -> Self {
        debug_assert!(
            components.len() == 2 || components.len() == 3,
            "Ciphertext must have 2 or 3 components"
        );
        debug_assert!(
            components
                .windows(2)
                .all(|w| w[0].dimension() == w[1].dimension()
                    && w[0].modulus() == w[1].modulus()),
            "Ciphertext components must share dimension and modulus"
        );
        Self {
            components,
            level,
            noise,
        }
    }

    /// Trivial (noiseless, insecure) encryption of a plaintext: `(Δm, 0)`.
    ///
    /// Decrypts correctly under any secret key. The message is visible to
    /// anyone; useful only as a carrier for known values in homomorphic
    /// expressions.
    pub fn trivial(plaintext: &Plaintext, ctx: &BgvContext) -> Self {
        debug_assert_eq!(
            plaintext.modulus(),
            ctx.moduli()[0],
            "Trivial encryption expects a top-level plaintext"
        );
        let level = ctx.top_level();
        let zero = RingElement::zero(plaintext.ring_dim(), plaintext.modulus());
        Self::new(vec![plaintext.poly.clone(), zero], level, 0.5)
    }

    /// Whether the ciphertext is back to two components
    pub fn is_linear(&self) -> bool {
        self.components.len() == 2
    }

    /// Ring degree
    pub fn ring_dim(&self) -> usize {
        self.components[0].dimension()
    }

    /// Modulus of the ciphertext's current level
    pub fn modulus(&self) -> u64 {
        self.components[0].modulus()
    }
}

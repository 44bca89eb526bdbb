//! Key material: secret, public, and relinearization keys.
//!
//! Keys are generated once from an explicit [`Sampler`] and are immutable
//! afterward; any number of encrypt or evaluate calls may read them
//! concurrently. The secret key is never written out by the general
//! persistence path; see `serialize_secret_key` for the explicit-intent
//! escape hatch.
//!
//! The relinearization key carries one digit row-set per chain modulus so
//! products formed after any number of modulus switches can still be
//! collapsed back to two components.

use crate::ciphertext::Ciphertext;
use crate::math::{RingElement, Sampler};
use crate::params::BgvContext;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Secret key: a ternary ring element, generated once per context.
///
/// Owned exclusively by whoever decrypts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SecretKey {
    /// Secret polynomial with coefficients in {-1, 0, 1}, stored under the
    /// top modulus.
    pub s: RingElement,
}

impl SecretKey {
    /// Draw a fresh ternary secret key
    pub fn generate(ctx: &BgvContext, sampler: &mut Sampler) -> Self {
        let q0 = ctx.moduli()[0];
        let s = RingElement::sample_ternary(ctx.ring_dim(), q0, sampler);
        Self { s }
    }

    /// The secret polynomial re-centered under the given chain modulus
    pub fn at_modulus(&self, q: u64) -> RingElement {
        if self.s.modulus() == q {
            self.s.clone()
        } else {
            self.s.recenter_to(q)
        }
    }
}

/// Public key: a pair `(b, a)` encrypting zero under the secret key,
/// with `b = -(a*s) + e` at the top modulus.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicKey {
    /// Masked component b = -(a*s) + e.
    pub b: RingElement,
    /// Uniformly random component a.
    pub a: RingElement,
}

impl PublicKey {
    /// Generate the public key for a secret key
    pub fn generate(sk: &SecretKey, ctx: &BgvContext, sampler: &mut Sampler) -> Self {
        let n = ctx.ring_dim();
        let q0 = ctx.moduli()[0];

        let a = RingElement::sample_uniform(n, q0, sampler);
        let e = RingElement::sample_error(n, q0, sampler);
        let b = &(-a.mul(&sk.s)) + &e;

        Self { b, a }
    }
}

/// Digit rows of the relinearization key at one chain modulus.
///
/// Row i is `(b_i = -(a_i*s) + e_i + B^i * s^2, a_i)`: a ciphertext-like
/// pair encrypting the i-th base-B digit weight of the squared secret key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelinLevelKey {
    /// One `(b_i, a_i)` pair per digit of the modulus in base B.
    pub rows: Vec<(RingElement, RingElement)>,
}

/// Relinearization key: digit row-sets for every modulus in the chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelinearizationKey {
    /// Digit-decomposition base B.
    pub base: u64,
    /// Row-sets indexed by chain position (0 is the top modulus).
    pub levels: Vec<RelinLevelKey>,
}

impl RelinearizationKey {
    /// Generate digit row-sets for every chain modulus
    pub fn generate(sk: &SecretKey, ctx: &BgvContext, sampler: &mut Sampler) -> Self {
        let n = ctx.ring_dim();
        let base = ctx.params().relin_base;

        let levels = ctx
            .moduli()
            .iter()
            .map(|&q| {
                let s = sk.at_modulus(q);
                let s_squared = s.mul(&s);
                let digits = ctx.relin_digits(q);

                let mut rows = Vec::with_capacity(digits);
                let mut power: u64 = 1;
                for _ in 0..digits {
                    let a = RingElement::sample_uniform(n, q, sampler);
                    let e = RingElement::sample_error(n, q, sampler);
                    let b = &(&(-a.mul(&s)) + &e) + &s_squared.scalar_mul(power);
                    rows.push((b, a));
                    power = ((power as u128 * base as u128) % q as u128) as u64;
                }
                RelinLevelKey { rows }
            })
            .collect();

        Self { base, levels }
    }

    /// Digit rows for the chain modulus a ciphertext currently sits at
    pub fn rows_for(&self, ct: &Ciphertext, ctx: &BgvContext) -> &RelinLevelKey {
        let chain_index = ctx.depth() - ct.level;
        &self.levels[chain_index]
    }
}

/// The full key material for one context.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeySet {
    pub secret: SecretKey,
    pub public: PublicKey,
    pub relin: RelinearizationKey,
}

/// One-shot generation of secret, public, and relinearization keys.
pub struct KeyGenerator;

impl KeyGenerator {
    /// Generate a complete key set from the given randomness source
    pub fn generate(ctx: &BgvContext, sampler: &mut Sampler) -> KeySet {
        let secret = SecretKey::generate(ctx, sampler);
        debug!(ring_dim = ctx.ring_dim(), "generated secret key");

        let public = PublicKey::generate(&secret, ctx, sampler);
        debug!("generated public key");

        let relin = RelinearizationKey::generate(&secret, ctx, sampler);
        debug!(
            levels = relin.levels.len(),
            base = relin.base,
            "generated relinearization key"
        );

        KeySet {
            secret,
            public,
            relin,
        }
    }
}

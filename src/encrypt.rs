//! Encryption and decryption.
//!
//! Encryption: `(c0 = b*u + e1 + Δm, c1 = a*u + e2)` with ternary `u` and
//! fresh error terms, at the top modulus. Decryption computes
//! `c0 + c1*s (+ c2*s^2)`, divides the scale back out with exact rounding,
//! and reports whether the tracked noise estimate exceeded the correctness
//! bound. It never fails silently: the result is always produced, with the
//! overflow diagnostic alongside.

use crate::ciphertext::{Ciphertext, Plaintext};
use crate::keys::{PublicKey, SecretKey};
use crate::math::{RingElement, Sampler};
use crate::params::BgvContext;
use tracing::trace;

/// Decryption result: the recovered plaintext plus the noise diagnostic.
///
/// When `noise_overflow` is set, the tracked noise estimate exceeded
/// `q_level / (2t)` and the plaintext may be garbage; the caller decides
/// whether to trust it.
#[derive(Clone, Debug)]
pub struct Decryption {
    pub plaintext: Plaintext,
    pub noise_overflow: bool,
}

/// Encrypt a plaintext under the public key.
///
/// The ciphertext starts at the top of the modulus chain, tagged with the
/// context's fresh-noise estimate.
///
/// # Panics
///
/// Panics if the plaintext is not scaled under the top modulus.
pub fn encrypt(
    pk: &PublicKey,
    plaintext: &Plaintext,
    ctx: &BgvContext,
    sampler: &mut Sampler,
) -> Ciphertext {
    let n = ctx.ring_dim();
    let q0 = ctx.moduli()[0];
    assert_eq!(
        plaintext.modulus(),
        q0,
        "Plaintext must be encoded at the top modulus"
    );

    let u = RingElement::sample_ternary(n, q0, sampler);
    let e1 = RingElement::sample_error(n, q0, sampler);
    let e2 = RingElement::sample_error(n, q0, sampler);

    let c0 = &(&pk.b.mul(&u) + &e1) + &plaintext.poly;
    let c1 = &pk.a.mul(&u) + &e2;

    let noise = ctx.fresh_noise();
    trace!(noise, "encrypted at top level");
    Ciphertext::new(vec![c0, c1], ctx.top_level(), noise)
}

/// Decrypt a ciphertext with the secret key.
///
/// Handles both linear ciphertexts and three-component products that were
/// never relinearized; the quadratic component is folded in via `s^2`.
pub fn decrypt(sk: &SecretKey, ct: &Ciphertext, ctx: &BgvContext) -> Decryption {
    let q = ct.modulus();
    let t = ctx.plain_modulus();
    debug_assert_eq!(
        q,
        ctx.modulus_at_level(ct.level),
        "Ciphertext modulus inconsistent with its level"
    );

    let s = sk.at_modulus(q);

    // c0 + c1*s (+ c2*s^2) = Δm + e
    let mut noisy = &ct.components[0] + &ct.components[1].mul(&s);
    if ct.components.len() == 3 {
        let s_squared = s.mul(&s);
        noisy += &ct.components[2].mul(&s_squared);
    }

    // Round each coefficient to its message residue, then re-scale so the
    // plaintext sits at the ciphertext's level.
    let delta = ctx.delta_at_level(ct.level);
    let coeffs: Vec<u64> = noisy
        .coeffs()
        .iter()
        .map(|&c| {
            let m = ((c as u128 * t as u128 + q as u128 / 2) / q as u128) % t as u128;
            ((m * delta as u128) % q as u128) as u64
        })
        .collect();

    let bound = ctx.noise_bound(ct.level);
    let noise_overflow = ct.noise >= bound;
    if noise_overflow {
        trace!(noise = ct.noise, bound, "noise estimate exceeds bound");
    }

    Decryption {
        plaintext: Plaintext::from_poly(RingElement::from_coeffs(coeffs, q)),
        noise_overflow,
    }
}

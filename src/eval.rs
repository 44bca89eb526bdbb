//! Homomorphic evaluation: addition, multiplication, relinearization, and
//! modulus switching, with noise-estimate bookkeeping on every operation.
//!
//! Each ciphertext carries an estimated error magnitude. The estimates are
//! deliberately conservative: the overflow diagnostic may fire on a
//! ciphertext that still decrypts correctly, but a quiet estimate means the
//! result is trustworthy. `noise_budget` reports the remaining headroom in
//! bits; it never increases under any operation here and strictly shrinks
//! on multiplication.
//!
//! Multiplication is the tensor product of two linear ciphertexts computed
//! exactly over the integers in centered representation, rescaled by `t/q`
//! per component before reduction. Skipping that rescale is precisely what
//! makes naive implementations decrypt to garbage.

use crate::ciphertext::Ciphertext;
use crate::error::{BgvError, Result};
use crate::keys::RelinearizationKey;
use crate::math::RingElement;
use crate::params::BgvContext;
use tracing::trace;

/// Homomorphic addition.
///
/// Requires both operands at the same level. A three-component operand
/// (an un-relinearized product) is padded against a linear one.
pub fn add(ct1: &Ciphertext, ct2: &Ciphertext, ctx: &BgvContext) -> Result<Ciphertext> {
    combine(ct1, ct2, ctx, false)
}

/// Homomorphic subtraction; same shape and noise behavior as [`add`].
pub fn sub(ct1: &Ciphertext, ct2: &Ciphertext, ctx: &BgvContext) -> Result<Ciphertext> {
    combine(ct1, ct2, ctx, true)
}

fn combine(
    ct1: &Ciphertext,
    ct2: &Ciphertext,
    ctx: &BgvContext,
    subtract: bool,
) -> Result<Ciphertext> {
    if ct1.level != ct2.level {
        return Err(BgvError::LevelMismatch {
            left: ct1.level,
            right: ct2.level,
        });
    }
    debug_assert_eq!(
        ct1.modulus(),
        ctx.modulus_at_level(ct1.level),
        "Ciphertext modulus inconsistent with its level"
    );

    let n = ct1.ring_dim();
    let q = ct1.modulus();
    let width = ct1.components.len().max(ct2.components.len());
    let zero = RingElement::zero(n, q);

    let components = (0..width)
        .map(|i| {
            let a = ct1.components.get(i).unwrap_or(&zero);
            let b = ct2.components.get(i).unwrap_or(&zero);
            if subtract {
                a - b
            } else {
                a + b
            }
        })
        .collect();

    let noise = ct1.noise + ct2.noise;
    trace!(op = if subtract { "sub" } else { "add" }, noise, "combined");
    Ok(Ciphertext::new(components, ct1.level, noise))
}

/// Multiply a ciphertext by a plaintext scalar; decrypts to `k*m mod t`.
pub fn scalar_mul(ct: &Ciphertext, k: i64, ctx: &BgvContext) -> Ciphertext {
    let q = ct.modulus();
    debug_assert_eq!(
        q,
        ctx.modulus_at_level(ct.level),
        "Ciphertext modulus inconsistent with its level"
    );
    let k_mod = crate::math::ModQ::from_signed(k, q);

    let components = ct
        .components
        .iter()
        .map(|c| c.scalar_mul(k_mod))
        .collect();

    let noise = ct.noise * (k.unsigned_abs().max(1) as f64);
    Ciphertext::new(components, ct.level, noise)
}

/// Homomorphic multiplication.
///
/// Produces a three-component ciphertext, quadratic in the secret key;
/// [`relinearize`] collapses it back to two components. The result stays at
/// the operands' level. Fails with [`BgvError::LevelExhausted`] at level 0
/// and [`BgvError::LevelMismatch`] across levels.
///
/// # Panics
///
/// Panics if either operand still has three components; relinearize first.
pub fn multiply(ct1: &Ciphertext, ct2: &Ciphertext, ctx: &BgvContext) -> Result<Ciphertext> {
    assert!(
        ct1.is_linear() && ct2.is_linear(),
        "Multiply requires two-component ciphertexts"
    );
    if ct1.level != ct2.level {
        return Err(BgvError::LevelMismatch {
            left: ct1.level,
            right: ct2.level,
        });
    }
    if ct1.level == 0 {
        return Err(BgvError::LevelExhausted);
    }

    let q = ct1.modulus();
    let t = ctx.plain_modulus();

    let (p0, p1) = (&ct1.components[0], &ct1.components[1]);
    let (r0, r1) = (&ct2.components[0], &ct2.components[1]);

    // Tensor product over the integers: (p0 + p1*s)(r0 + r1*s) expands to
    // d0 + d1*s + d2*s^2. Each component is rescaled by t/q so the product
    // of two Δ-scaled messages lands back at scale Δ.
    let d0 = p0.conv_centered(r0);
    let d1: Vec<i128> = p0
        .conv_centered(r1)
        .iter()
        .zip(p1.conv_centered(r0).iter())
        .map(|(&a, &b)| a + b)
        .collect();
    let d2 = p1.conv_centered(r1);

    let components = vec![
        rescale_tensor(&d0, t, q),
        rescale_tensor(&d1, t, q),
        rescale_tensor(&d2, t, q),
    ];

    let noise = multiply_noise(ct1, ct2, ctx);
    trace!(noise, level = ct1.level, "multiplied");
    Ok(Ciphertext::new(components, ct1.level, noise))
}

/// Round `x * t / q` exactly for un-reduced tensor coefficients, then
/// reduce into [0, q).
fn rescale_tensor(values: &[i128], t: u64, q: u64) -> RingElement {
    let q_wide = q as i128;
    let t_wide = t as i128;

    let coeffs = values
        .iter()
        .map(|&x| {
            // Split x = d*q + r with 0 <= r < q so the rounding division
            // never overflows i128.
            let d = x.div_euclid(q_wide);
            let r = x.rem_euclid(q_wide);
            let rounded = d * t_wide + (r * t_wide + q_wide / 2) / q_wide;
            rounded.rem_euclid(q_wide) as u64
        })
        .collect();

    RingElement::from_coeffs(coeffs, q)
}

fn multiply_noise(ct1: &Ciphertext, ct2: &Ciphertext, ctx: &BgvContext) -> f64 {
    let n = ctx.ring_dim() as f64;
    let t = ctx.plain_modulus() as f64;
    let delta = ctx.delta_at_level(ct1.level) as f64;

    let product_term = ct1.noise * ct2.noise * n * t / delta;
    let cross_term = 2.0 * (ct1.noise + ct2.noise);
    product_term.max(cross_term)
}

/// Collapse a three-component product back to two components.
///
/// Decomposes the quadratic component into base-B digits and folds them
/// against the key rows for the ciphertext's modulus:
/// `c0' = c0 + Σ dᵢ·bᵢ`, `c1' = c1 + Σ dᵢ·aᵢ`. Adds a bounded
/// key-switching noise term proportional to the decomposition base.
///
/// # Panics
///
/// Panics if the ciphertext does not have exactly three components.
pub fn relinearize(
    ct: &Ciphertext,
    rk: &RelinearizationKey,
    ctx: &BgvContext,
) -> Ciphertext {
    assert_eq!(
        ct.components.len(),
        3,
        "Relinearization requires a three-component ciphertext"
    );

    let rows = &rk.rows_for(ct, ctx).rows;
    let digits = decompose_digits(&ct.components[2], rk.base, rows.len());

    let mut c0 = ct.components[0].clone();
    let mut c1 = ct.components[1].clone();
    for (digit, (b, a)) in digits.iter().zip(rows.iter()) {
        c0 += &digit.mul(b);
        c1 += &digit.mul(a);
    }

    let n = ctx.ring_dim() as f64;
    let switch_noise =
        rows.len() as f64 * (rk.base as f64 / 2.0).max(1.0) * ctx.error_width() * n.sqrt();
    let noise = ct.noise + switch_noise;
    trace!(noise, level = ct.level, "relinearized");
    Ciphertext::new(vec![c0, c1], ct.level, noise)
}

/// Decompose a polynomial coefficient-wise into base-B digits.
///
/// For each coefficient c, digits [c0, ..., c_{ℓ-1}] in [0, B) satisfy
/// `c = Σ cᵢ·Bⁱ` exactly.
fn decompose_digits(poly: &RingElement, base: u64, count: usize) -> Vec<RingElement> {
    let n = poly.dimension();
    let q = poly.modulus();

    let mut digits = vec![RingElement::zero(n, q); count];
    for j in 0..n {
        let mut value = poly.coeff(j);
        for digit in digits.iter_mut() {
            digit.set_coeff(j, value % base);
            value /= base;
        }
        debug_assert_eq!(value, 0, "coefficient outlived its digit budget");
    }
    digits
}

/// Switch a ciphertext to the next smaller modulus in the chain.
///
/// Every component is rescaled proportionally; the plaintext, carried at
/// scale Δ, survives the rescaling. Costs one level; fails with
/// [`BgvError::LevelExhausted`] at the bottom of the chain.
pub fn mod_switch(ct: &Ciphertext, ctx: &BgvContext) -> Result<Ciphertext> {
    if ct.level == 0 {
        return Err(BgvError::LevelExhausted);
    }

    let new_level = ct.level - 1;
    let old_q = ct.modulus();
    let new_q = ctx.modulus_at_level(new_level);

    let components = ct
        .components
        .iter()
        .map(|c| c.rescale(new_q))
        .collect();

    // Rounding error propagates through the ternary secret key.
    let n = ctx.ring_dim() as f64;
    let rounding = 0.5 * (1.0 + (2.0 * n / 3.0).sqrt());
    let noise = ct.noise * (new_q as f64 / old_q as f64) + rounding;
    trace!(noise, level = new_level, "switched modulus");
    Ok(Ciphertext::new(components, new_level, noise))
}

/// Remaining noise headroom in bits before the correctness bound.
///
/// Zero means the tracked estimate has reached `q_level / (2t)` and
/// decryption will raise the overflow diagnostic.
pub fn noise_budget(ct: &Ciphertext, ctx: &BgvContext) -> f64 {
    let bound = ctx.noise_bound(ct.level);
    if ct.noise <= 0.0 {
        return bound.log2();
    }
    (bound / ct.noise).log2().max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{decode, encode};
    use crate::encrypt::{decrypt, encrypt};
    use crate::keys::KeyGenerator;
    use crate::math::{ErrorDistribution, Sampler};
    use crate::params::BgvParams;

    fn test_ctx() -> BgvContext {
        BgvContext::new(BgvParams {
            ring_dim: 8,
            moduli: vec![12289, 1153],
            plain_modulus: 17,
            sigma: 3.2,
            error: ErrorDistribution::Gaussian,
            relin_base: 2,
        })
        .unwrap()
    }

    fn setup(seed: u64) -> (BgvContext, crate::keys::KeySet, Sampler) {
        let ctx = test_ctx();
        let mut sampler = Sampler::with_seed(ErrorDistribution::Gaussian, 3.2, seed);
        let keys = KeyGenerator::generate(&ctx, &mut sampler);
        (ctx, keys, sampler)
    }

    #[test]
    fn test_add_homomorphism() {
        let (ctx, keys, mut sampler) = setup(30);

        let ct1 = encrypt(&keys.public, &encode(&[3], &ctx).unwrap(), &ctx, &mut sampler);
        let ct2 = encrypt(&keys.public, &encode(&[5], &ctx).unwrap(), &ctx, &mut sampler);

        let sum = add(&ct1, &ct2, &ctx).unwrap();
        let dec = decrypt(&keys.secret, &sum, &ctx);
        assert_eq!(decode(&dec.plaintext, &ctx)[0], 8);
    }

    #[test]
    fn test_sub_homomorphism() {
        let (ctx, keys, mut sampler) = setup(31);

        let ct1 = encrypt(&keys.public, &encode(&[3], &ctx).unwrap(), &ctx, &mut sampler);
        let ct2 = encrypt(&keys.public, &encode(&[5], &ctx).unwrap(), &ctx, &mut sampler);

        let diff = sub(&ct1, &ct2, &ctx).unwrap();
        let dec = decrypt(&keys.secret, &diff, &ctx);
        assert_eq!(decode(&dec.plaintext, &ctx)[0], -2);
    }

    #[test]
    fn test_scalar_mul() {
        let (ctx, keys, mut sampler) = setup(32);

        let ct = encrypt(&keys.public, &encode(&[4], &ctx).unwrap(), &ctx, &mut sampler);
        let scaled = scalar_mul(&ct, 2, &ctx);
        let dec = decrypt(&keys.secret, &scaled, &ctx);
        assert_eq!(decode(&dec.plaintext, &ctx)[0], 8);
    }

    #[test]
    fn test_multiply_then_relinearize() {
        let (ctx, keys, mut sampler) = setup(33);

        let ct1 = encrypt(&keys.public, &encode(&[3], &ctx).unwrap(), &ctx, &mut sampler);
        let ct2 = encrypt(&keys.public, &encode(&[5], &ctx).unwrap(), &ctx, &mut sampler);

        let product = multiply(&ct1, &ct2, &ctx).unwrap();
        assert_eq!(product.components.len(), 3);

        let relined = relinearize(&product, &keys.relin, &ctx);
        assert!(relined.is_linear());

        let dec = decrypt(&keys.secret, &relined, &ctx);
        // 3 * 5 = 15 ≡ -2 (mod 17) in signed representatives
        assert_eq!(decode(&dec.plaintext, &ctx)[0].rem_euclid(17), 15);
    }

    #[test]
    fn test_three_component_decrypt_matches_relinearized() {
        let (ctx, keys, mut sampler) = setup(34);

        let ct1 = encrypt(&keys.public, &encode(&[2], &ctx).unwrap(), &ctx, &mut sampler);
        let ct2 = encrypt(&keys.public, &encode(&[6], &ctx).unwrap(), &ctx, &mut sampler);

        let product = multiply(&ct1, &ct2, &ctx).unwrap();
        let direct = decrypt(&keys.secret, &product, &ctx);
        let relined = decrypt(&keys.secret, &relinearize(&product, &keys.relin, &ctx), &ctx);

        assert_eq!(
            decode(&direct.plaintext, &ctx)[0],
            decode(&relined.plaintext, &ctx)[0]
        );
        assert_eq!(decode(&direct.plaintext, &ctx)[0].rem_euclid(17), 12);
    }

    #[test]
    fn test_add_of_unrelinearized_product() {
        let (ctx, keys, mut sampler) = setup(35);

        let ct1 = encrypt(&keys.public, &encode(&[2], &ctx).unwrap(), &ctx, &mut sampler);
        let ct2 = encrypt(&keys.public, &encode(&[3], &ctx).unwrap(), &ctx, &mut sampler);
        let ct3 = encrypt(&keys.public, &encode(&[1], &ctx).unwrap(), &ctx, &mut sampler);

        let product = multiply(&ct1, &ct2, &ctx).unwrap();
        let sum = add(&product, &ct3, &ctx).unwrap();
        assert_eq!(sum.components.len(), 3);

        let dec = decrypt(&keys.secret, &sum, &ctx);
        assert_eq!(decode(&dec.plaintext, &ctx)[0], 7);
    }

    #[test]
    fn test_level_mismatch_rejected() {
        let (ctx, keys, mut sampler) = setup(36);

        let ct1 = encrypt(&keys.public, &encode(&[1], &ctx).unwrap(), &ctx, &mut sampler);
        let ct2 = encrypt(&keys.public, &encode(&[2], &ctx).unwrap(), &ctx, &mut sampler);
        let ct2_low = mod_switch(&ct2, &ctx).unwrap();

        assert!(matches!(
            add(&ct1, &ct2_low, &ctx),
            Err(BgvError::LevelMismatch { left: 1, right: 0 })
        ));
        assert!(matches!(
            multiply(&ct1, &ct2_low, &ctx),
            Err(BgvError::LevelMismatch { .. })
        ));
    }

    #[test]
    fn test_mod_switch_preserves_plaintext() {
        let (ctx, keys, mut sampler) = setup(37);

        let ct = encrypt(&keys.public, &encode(&[6], &ctx).unwrap(), &ctx, &mut sampler);
        let before = decode(&decrypt(&keys.secret, &ct, &ctx).plaintext, &ctx);

        let switched = mod_switch(&ct, &ctx).unwrap();
        assert_eq!(switched.level, 0);
        assert_eq!(switched.modulus(), 1153);
        let after = decode(&decrypt(&keys.secret, &switched, &ctx).plaintext, &ctx);

        assert_eq!(before, after);
    }

    #[test]
    fn test_level_exhausted_exactly_at_bottom() {
        let (ctx, keys, mut sampler) = setup(38);

        let ct = encrypt(&keys.public, &encode(&[2], &ctx).unwrap(), &ctx, &mut sampler);
        // one level available: switching once succeeds, twice fails
        let low = mod_switch(&ct, &ctx).unwrap();
        assert!(matches!(mod_switch(&low, &ctx), Err(BgvError::LevelExhausted)));

        // multiply at the bottom is also out
        assert!(matches!(
            multiply(&low, &low, &ctx),
            Err(BgvError::LevelExhausted)
        ));

        // addition at the bottom still works
        let sum = add(&low, &low, &ctx).unwrap();
        let dec = decrypt(&keys.secret, &sum, &ctx);
        assert_eq!(decode(&dec.plaintext, &ctx)[0], 4);
    }

    #[test]
    fn test_noise_budget_monotone() {
        let (ctx, keys, mut sampler) = setup(39);

        let ct1 = encrypt(&keys.public, &encode(&[2], &ctx).unwrap(), &ctx, &mut sampler);
        let ct2 = encrypt(&keys.public, &encode(&[3], &ctx).unwrap(), &ctx, &mut sampler);

        let fresh_budget = noise_budget(&ct1, &ctx);
        assert!(fresh_budget > 0.0);

        let sum = add(&ct1, &ct2, &ctx).unwrap();
        assert!(noise_budget(&sum, &ctx) <= fresh_budget);

        let product = multiply(&ct1, &ct2, &ctx).unwrap();
        assert!(noise_budget(&product, &ctx) < fresh_budget);

        let relined = relinearize(&product, &keys.relin, &ctx);
        assert!(noise_budget(&relined, &ctx) <= noise_budget(&product, &ctx));

        let switched = mod_switch(&relined, &ctx).unwrap();
        assert!(noise_budget(&switched, &ctx) <= noise_budget(&relined, &ctx));
    }

    #[test]
    fn test_digit_decomposition_reconstructs() {
        let q = 12289u64;
        let poly = RingElement::from_coeffs(vec![12288, 1, 722, 6144, 0, 9000, 5, 300], q);
        let base = 2u64;
        let digits = decompose_digits(&poly, base, 14);

        let mut reconstructed = RingElement::zero(8, q);
        let mut power = 1u64;
        for digit in &digits {
            reconstructed += &digit.scalar_mul(power);
            power = ((power as u128 * base as u128) % q as u128) as u64;
        }
        assert_eq!(reconstructed, poly);
    }
}

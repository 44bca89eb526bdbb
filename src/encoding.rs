//! Encoding between integer vectors and plaintext polynomials.
//!
//! Values are placed coefficient-wise and scaled by Δ = ⌊q/t⌋; decoding
//! divides the scale back out with exact rounding. The round trip is exact
//! for every in-range vector with no encryption involved. Decoding reads
//! the modulus off the plaintext itself, so plaintexts recovered at lower
//! chain levels decode identically.
//!
//! Messages are signed representatives of Z_t: any v with 2|v| < t is
//! accepted, and decoding maps back into (-t/2, t/2].

use crate::ciphertext::Plaintext;
use crate::error::{BgvError, Result};
use crate::math::RingElement;
use crate::params::BgvContext;

/// Encode a vector of signed integers into a plaintext at the top level.
///
/// Fails with [`BgvError::ValueOutOfRange`] if any value has magnitude at
/// least t/2. Unfilled coefficients encode zero.
///
/// # Panics
///
/// Panics if more values are supplied than the ring degree holds.
pub fn encode(values: &[i64], ctx: &BgvContext) -> Result<Plaintext> {
    let n = ctx.ring_dim();
    let t = ctx.plain_modulus();
    assert!(
        values.len() <= n,
        "{} values exceed ring degree {}",
        values.len(),
        n
    );

    for &v in values {
        if v.unsigned_abs() >= t.div_ceil(2) {
            return Err(BgvError::ValueOutOfRange {
                value: v,
                plain_modulus: t,
            });
        }
    }

    let level = ctx.top_level();
    let q = ctx.modulus_at_level(level);
    let delta = ctx.delta_at_level(level);

    let mut coeffs = vec![0u64; n];
    for (i, &v) in values.iter().enumerate() {
        let residue = v.rem_euclid(t as i64) as u64;
        coeffs[i] = ((residue as u128 * delta as u128) % q as u128) as u64;
    }

    Ok(Plaintext::from_poly(RingElement::from_coeffs(coeffs, q)))
}

/// Decode a plaintext back to signed integers in (-t/2, t/2].
///
/// Computes `round(c * t / q) mod t` per coefficient under the plaintext's
/// own modulus, then maps into the signed representative range.
pub fn decode(plaintext: &Plaintext, ctx: &BgvContext) -> Vec<i64> {
    let t = ctx.plain_modulus();
    let q = plaintext.modulus();

    plaintext
        .poly
        .coeffs()
        .iter()
        .map(|&c| {
            let scaled = (c as u128 * t as u128 + q as u128 / 2) / q as u128;
            let m = (scaled % t as u128) as u64;
            if 2 * m <= t {
                m as i64
            } else {
                m as i64 - t as i64
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ErrorDistribution;
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

    #[test]
    fn test_roundtrip_full_range() {
        let ctx = test_ctx();
        // every in-range scalar: |v| < 17/2 means -8..=8
        for v in -8i64..=8 {
            let pt = encode(&[v], &ctx).unwrap();
            let decoded = decode(&pt, &ctx);
            assert_eq!(decoded[0], v, "roundtrip failed for {}", v);
        }
    }

    #[test]
    fn test_roundtrip_vector() {
        let ctx = test_ctx();
        let values = vec![3, -5, 0, 8, -8, 1, 7, -2];
        let pt = encode(&values, &ctx).unwrap();
        assert_eq!(decode(&pt, &ctx), values);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let ctx = test_ctx();
        assert!(matches!(
            encode(&[9], &ctx),
            Err(BgvError::ValueOutOfRange { value: 9, .. })
        ));
        assert!(encode(&[-9], &ctx).is_err());
        assert!(encode(&[8], &ctx).is_ok());
        assert!(encode(&[-8], &ctx).is_ok());
    }

    #[test]
    fn test_signed_unsigned_representatives_agree() {
        let ctx = test_ctx();
        // t - 1 is out of range as an input, but -1 encodes to the same
        // residue class: check 16 ≡ -1 (mod 17) through the scaled poly.
        let pt_neg = encode(&[-1], &ctx).unwrap();
        let decoded = decode(&pt_neg, &ctx);
        assert_eq!(decoded[0], -1);
        assert_eq!(decoded[0].rem_euclid(17), 16);
    }

    #[test]
    fn test_unfilled_coefficients_decode_to_zero() {
        let ctx = test_ctx();
        let pt = encode(&[5], &ctx).unwrap();
        let decoded = decode(&pt, &ctx);
        assert_eq!(decoded.len(), 8);
        assert!(decoded[1..].iter().all(|&v| v == 0));
    }
}

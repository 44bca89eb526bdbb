//! Polynomial arithmetic over R_q = Z_q[X]/(X^n + 1).
//!
//! [`RingElement`] is the coefficient-vector representation of a polynomial
//! reduced by X^n + 1 with coefficients canonical in [0, q). Multiplication
//! is an exact negacyclic schoolbook convolution; it is the dominant cost
//! and sits behind a single entry point so a transform-based kernel can be
//! substituted without touching key generation, encryption, or evaluation.
//!
//! Coefficients are canonicalized after every operation. Mismatched
//! dimensions or moduli between operands are programming errors and panic.

use super::mod_q::ModQ;
use super::sampling::Sampler;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Polynomial in R_q = Z_q[X]/(X^n + 1).
///
/// # Invariants
///
/// * `coeffs.len()` is the ring degree n and never changes
/// * every coefficient lies in `[0, q)` after every operation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingElement {
    /// Coefficients, index i holding the coefficient of X^i.
    coeffs: Vec<u64>,
    /// Modulus q.
    q: u64,
}

impl RingElement {
    /// Create the zero polynomial with given degree and modulus
    pub fn zero(dim: usize, q: u64) -> Self {
        Self {
            coeffs: vec![0; dim],
            q,
        }
    }

    /// Create a constant polynomial
    pub fn constant(value: u64, dim: usize, q: u64) -> Self {
        let mut coeffs = vec![0; dim];
        coeffs[0] = value % q;
        Self { coeffs, q }
    }

    /// Create a polynomial from a coefficient vector, reducing mod q
    pub fn from_coeffs(mut coeffs: Vec<u64>, q: u64) -> Self {
        for c in &mut coeffs {
            *c %= q;
        }
        Self { coeffs, q }
    }

    /// Create a polynomial from signed coefficients, centered into [0, q)
    pub fn from_signed_coeffs(coeffs: &[i64], q: u64) -> Self {
        let coeffs = coeffs.iter().map(|&c| ModQ::from_signed(c, q)).collect();
        Self { coeffs, q }
    }

    /// Sample a polynomial with coefficients uniform in [0, q)
    pub fn sample_uniform(dim: usize, q: u64, sampler: &mut Sampler) -> Self {
        Self {
            coeffs: sampler.uniform_vec(dim, q),
            q,
        }
    }

    /// Sample a polynomial with coefficients from the error distribution
    pub fn sample_error(dim: usize, q: u64, sampler: &mut Sampler) -> Self {
        Self::from_signed_coeffs(&sampler.error_vec(dim), q)
    }

    /// Sample a polynomial with ternary coefficients
    pub fn sample_ternary(dim: usize, q: u64, sampler: &mut Sampler) -> Self {
        Self::from_signed_coeffs(&sampler.ternary_vec(dim), q)
    }

    /// Ring degree n
    pub fn dimension(&self) -> usize {
        self.coeffs.len()
    }

    /// Modulus q
    pub fn modulus(&self) -> u64 {
        self.q
    }

    /// Coefficient of X^i
    pub fn coeff(&self, i: usize) -> u64 {
        self.coeffs[i]
    }

    /// Set the coefficient of X^i, reducing mod q
    pub fn set_coeff(&mut self, i: usize, value: u64) {
        self.coeffs[i] = value % self.q;
    }

    /// Coefficient slice
    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    /// Coefficients as centered representatives in (-q/2, q/2]
    pub fn signed_coeffs(&self) -> Vec<i64> {
        self.coeffs
            .iter()
            .map(|&c| ModQ::to_signed(c, self.q))
            .collect()
    }

    /// Whether all coefficients are zero
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|&c| c == 0)
    }

    /// Maximum absolute coefficient in centered representation
    pub fn linf_norm(&self) -> u64 {
        self.coeffs
            .iter()
            .map(|&c| if c <= self.q / 2 { c } else { self.q - c })
            .max()
            .unwrap_or(0)
    }

    /// Scalar multiplication
    pub fn scalar_mul(&self, scalar: u64) -> Self {
        let scalar = scalar % self.q;
        let coeffs = self
            .coeffs
            .iter()
            .map(|&c| ModQ::mul(c, scalar, self.q))
            .collect();
        Self {
            coeffs,
            q: self.q,
        }
    }

    /// Polynomial multiplication in R_q.
    ///
    /// Exact negacyclic schoolbook convolution: X^n = -1, every product
    /// accumulated in u128 before a single reduction per coefficient.
    /// Output coefficients are computed independently, in parallel.
    pub fn mul(&self, other: &Self) -> Self {
        assert_eq!(self.q, other.q, "Moduli must match");
        assert_eq!(
            self.coeffs.len(),
            other.coeffs.len(),
            "Dimensions must match"
        );

        let n = self.coeffs.len();
        let q = self.q as u128;
        let a = &self.coeffs;
        let b = &other.coeffs;

        let coeffs: Vec<u64> = (0..n)
            .into_par_iter()
            .map(|k| {
                let mut pos: u128 = 0;
                let mut neg: u128 = 0;
                for i in 0..=k {
                    pos += (a[i] as u128) * (b[k - i] as u128);
                }
                for i in (k + 1)..n {
                    neg += (a[i] as u128) * (b[n + k - i] as u128);
                }
                let pos = pos % q;
                let neg = neg % q;
                ((pos + q - neg) % q) as u64
            })
            .collect();

        Self {
            coeffs,
            q: self.q,
        }
    }

    /// Negacyclic convolution over the integers on centered representatives.
    ///
    /// Returns the un-reduced coefficients of `self * other` in
    /// Z[X]/(X^n + 1), each bounded by `n * (q/2)^2`. This is the exact
    /// kernel the evaluator's tensor product scales by t/q before reducing;
    /// keeping it un-reduced is what makes that rescaling exact.
    pub fn conv_centered(&self, other: &Self) -> Vec<i128> {
        assert_eq!(self.q, other.q, "Moduli must match");
        assert_eq!(
            self.coeffs.len(),
            other.coeffs.len(),
            "Dimensions must match"
        );

        let n = self.coeffs.len();
        let a: Vec<i128> = self
            .coeffs
            .iter()
            .map(|&c| ModQ::to_signed(c, self.q) as i128)
            .collect();
        let b: Vec<i128> = other
            .coeffs
            .iter()
            .map(|&c| ModQ::to_signed(c, other.q) as i128)
            .collect();

        (0..n)
            .into_par_iter()
            .map(|k| {
                let mut acc: i128 = 0;
                for i in 0..=k {
                    acc += a[i] * b[k - i];
                }
                for i in (k + 1)..n {
                    acc -= a[i] * b[n + k - i];
                }
                acc
            })
            .collect()
    }

    /// Rescale coefficients proportionally from q to `new_q`.
    ///
    /// Computes `c' = round(c * new_q / q)` per coefficient, then reduces
    /// into [0, new_q). Values carried at scale Δ = ⌊q/t⌋ land at the
    /// corresponding scale under the new modulus, up to rounding.
    pub fn rescale(&self, new_q: u64) -> Self {
        let q_old = self.q as u128;
        let q_new = new_q as u128;

        let coeffs = self
            .coeffs
            .iter()
            .map(|&c| {
                let numerator = (c as u128) * q_new + q_old / 2;
                ((numerator / q_old) % q_new) as u64
            })
            .collect();

        Self {
            coeffs,
            q: new_q,
        }
    }

    /// Re-center the same small polynomial under a different modulus.
    ///
    /// Meaningful only for small-norm elements such as secret keys and
    /// errors, whose centered representatives are identical under any
    /// modulus in the chain.
    pub fn recenter_to(&self, new_q: u64) -> Self {
        Self::from_signed_coeffs(&self.signed_coeffs(), new_q)
    }
}

impl Add for &RingElement {
    type Output = RingElement;

    fn add(self, rhs: Self) -> RingElement {
        assert_eq!(self.q, rhs.q, "Moduli must match");
        assert_eq!(
            self.coeffs.len(),
            rhs.coeffs.len(),
            "Dimensions must match"
        );

        let coeffs = self
            .coeffs
            .iter()
            .zip(rhs.coeffs.iter())
            .map(|(&a, &b)| {
                let sum = a + b;
                if sum >= self.q {
                    sum - self.q
                } else {
                    sum
                }
            })
            .collect();

        RingElement {
            coeffs,
            q: self.q,
        }
    }
}

impl Add for RingElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        &self + &rhs
    }
}

impl AddAssign<&RingElement> for RingElement {
    fn add_assign(&mut self, rhs: &Self) {
        *self = &*self + rhs;
    }
}

impl AddAssign for RingElement {
    fn add_assign(&mut self, rhs: Self) {
        *self = &*self + &rhs;
    }
}

impl Sub for &RingElement {
    type Output = RingElement;

    fn sub(self, rhs: Self) -> RingElement {
        assert_eq!(self.q, rhs.q, "Moduli must match");
        assert_eq!(
            self.coeffs.len(),
            rhs.coeffs.len(),
            "Dimensions must match"
        );

        let coeffs = self
            .coeffs
            .iter()
            .zip(rhs.coeffs.iter())
            .map(|(&a, &b)| if a >= b { a - b } else { self.q - b + a })
            .collect();

        RingElement {
            coeffs,
            q: self.q,
        }
    }
}

impl Sub for RingElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        &self - &rhs
    }
}

impl SubAssign<&RingElement> for RingElement {
    fn sub_assign(&mut self, rhs: &Self) {
        *self = &*self - rhs;
    }
}

impl Neg for &RingElement {
    type Output = RingElement;

    fn neg(self) -> RingElement {
        let coeffs = self
            .coeffs
            .iter()
            .map(|&c| if c == 0 { 0 } else { self.q - c })
            .collect();

        RingElement {
            coeffs,
            q: self.q,
        }
    }
}

impl Neg for RingElement {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

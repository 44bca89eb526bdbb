//! Leveled homomorphic encryption of BGV type over Z_q[X]/(X^n + 1).
//!
//! The crate covers key generation, plaintext encoding, encryption and
//! decryption, and homomorphic addition and multiplication with noise
//! control over a decreasing modulus chain.
//!
//! Key components:
//! - [`RingElement`]: exact negacyclic polynomial arithmetic over Z_q
//! - [`BgvContext`]: validated, immutable cryptographic parameters
//! - [`KeyGenerator`]: secret, public, and relinearization keys
//! - [`encode`]/[`decode`]: integer vectors ↔ scaled plaintext polynomials
//! - [`encrypt`]/[`decrypt`]: public-key encryption with a noise-overflow
//!   diagnostic on decryption
//! - evaluator operations: [`add`], [`sub`], [`scalar_mul`], [`multiply`],
//!   [`relinearize`], [`mod_switch`], [`noise_budget`]
//!
//! Every ciphertext carries its modulus-chain level and a running noise
//! estimate; the evaluator refuses operations past the bottom of the chain
//! and decryption reports when the estimate has outgrown the correctness
//! bound instead of silently returning garbage. All randomness flows
//! through an explicit, seedable [`Sampler`].
//!
//! # Example
//!
//! ```
//! use leveled_bgv::{
//!     add, decode, decrypt, encode, encrypt, multiply, relinearize,
//!     BgvContext, BgvParams, ErrorDistribution, KeyGenerator, Sampler,
//! };
//!
//! let ctx = BgvContext::new(BgvParams {
//!     ring_dim: 8,
//!     moduli: vec![12289, 1153],
//!     plain_modulus: 17,
//!     sigma: 3.2,
//!     error: ErrorDistribution::Gaussian,
//!     relin_base: 2,
//! })
//! .unwrap();
//!
//! let mut sampler = Sampler::with_seed(ErrorDistribution::Gaussian, 3.2, 1);
//! let keys = KeyGenerator::generate(&ctx, &mut sampler);
//!
//! let ct1 = encrypt(&keys.public, &encode(&[3], &ctx).unwrap(), &ctx, &mut sampler);
//! let ct2 = encrypt(&keys.public, &encode(&[5], &ctx).unwrap(), &ctx, &mut sampler);
//!
//! let sum = add(&ct1, &ct2, &ctx).unwrap();
//! let dec = decrypt(&keys.secret, &sum, &ctx);
//! assert_eq!(decode(&dec.plaintext, &ctx)[0], 8);
//!
//! let product = relinearize(&multiply(&ct1, &ct2, &ctx).unwrap(), &keys.relin, &ctx);
//! let dec = decrypt(&keys.secret, &product, &ctx);
//! assert_eq!(decode(&dec.plaintext, &ctx)[0].rem_euclid(17), 15);
//! ```

pub mod ciphertext;
pub mod encoding;
pub mod encrypt;
pub mod error;
pub mod eval;
pub mod keys;
pub mod math;
pub mod params;
pub mod serialize;

pub use ciphertext::{Ciphertext, Plaintext};
pub use encoding::{decode, encode};
pub use encrypt::{decrypt, encrypt, Decryption};
pub use error::{BgvError, Result};
pub use eval::{add, mod_switch, multiply, noise_budget, relinearize, scalar_mul, sub};
pub use keys::{KeyGenerator, KeySet, PublicKey, RelinearizationKey, SecretKey};
pub use math::{ErrorDistribution, RingElement, Sampler};
pub use params::{BgvContext, BgvParams};

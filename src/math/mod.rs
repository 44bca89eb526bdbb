//! Mathematical primitives for the scheme.
//!
//! - **Modular arithmetic** over Z_q
//! - **Ring arithmetic** over R_q = Z_q[X]/(X^n + 1)
//! - **Sampling** of uniform, ternary, and discrete Gaussian values through
//!   an explicit, seedable randomness source

pub mod mod_q;
pub mod ring;
pub mod sampling;

pub use mod_q::ModQ;
pub use ring::RingElement;
pub use sampling::{ErrorDistribution, Sampler};

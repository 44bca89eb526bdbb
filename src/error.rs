//! Error types for the scheme.
//!
//! Recoverable conditions are returned as [`BgvError`] values so callers can
//! branch on them. Noise overflow is not an error: decryption always
//! completes and reports the overflow as a diagnostic flag on its result.
//! Dimension or modulus mismatches inside ring arithmetic are programming
//! errors and panic.

use thiserror::Error;

/// Error type for context construction and scheme operations
#[derive(Debug, Error)]
pub enum BgvError {
    /// Malformed ring degree, modulus chain, or related configuration.
    /// Fatal for the given configuration; the caller must fix it.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Encode input outside the plaintext range. Recoverable; the input
    /// value itself is at fault.
    #[error("value {value} outside plaintext range (|v| < {plain_modulus}/2)")]
    ValueOutOfRange { value: i64, plain_modulus: u64 },

    /// Operands sit at different modulus-chain levels.
    #[error("ciphertext levels differ ({left} vs {right})")]
    LevelMismatch { left: usize, right: usize },

    /// Multiply or modulus-switch attempted at the bottom of the chain.
    /// Recoverable by choosing a deeper parameter set or fewer operations.
    #[error("modulus chain exhausted")]
    LevelExhausted,

    /// Serialized header does not match the active context.
    #[error("serialized parameters do not match the active context: {0}")]
    ParameterMismatch(String),

    /// Byte-level encoding or decoding failure.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for BgvError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, BgvError>;

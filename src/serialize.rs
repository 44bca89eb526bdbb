//! Persistence for keys and ciphertexts.
//!
//! Every serialized object is wrapped in a versioned header identifying the
//! parameters it was produced under (ring degree, modulus chain, plaintext
//! modulus). Deserialization verifies the header against the active context
//! before touching the payload and fails with a parameter-mismatch error
//! otherwise. The byte format is bincode's fixed-width little-endian
//! encoding throughout.
//!
//! The secret key has its own entry points so writing it out is always an
//! explicit act, never a side effect of persisting "the keys".

use crate::ciphertext::Ciphertext;
use crate::error::{BgvError, Result};
use crate::keys::{PublicKey, RelinearizationKey, SecretKey};
use crate::params::BgvContext;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Current on-disk format version.
const FORMAT_VERSION: u16 = 1;

/// Parameter fingerprint stored ahead of every payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamsHeader {
    version: u16,
    ring_dim: u64,
    moduli: Vec<u64>,
    plain_modulus: u64,
}

impl ParamsHeader {
    /// Header describing the given context
    pub fn for_context(ctx: &BgvContext) -> Self {
        Self {
            version: FORMAT_VERSION,
            ring_dim: ctx.ring_dim() as u64,
            moduli: ctx.moduli().to_vec(),
            plain_modulus: ctx.plain_modulus(),
        }
    }

    fn verify(&self, ctx: &BgvContext) -> Result<()> {
        if self.version != FORMAT_VERSION {
            return Err(BgvError::ParameterMismatch(format!(
                "format version {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        if self.ring_dim != ctx.ring_dim() as u64 {
            return Err(BgvError::ParameterMismatch(format!(
                "ring_dim {} (context has {})",
                self.ring_dim,
                ctx.ring_dim()
            )));
        }
        if self.moduli != ctx.moduli() {
            return Err(BgvError::ParameterMismatch(format!(
                "modulus chain {:?} (context has {:?})",
                self.moduli,
                ctx.moduli()
            )));
        }
        if self.plain_modulus != ctx.plain_modulus() {
            return Err(BgvError::ParameterMismatch(format!(
                "plain_modulus {} (context has {})",
                self.plain_modulus,
                ctx.plain_modulus()
            )));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    header: ParamsHeader,
    payload: T,
}

fn seal<T: Serialize>(payload: &T, ctx: &BgvContext) -> Result<Vec<u8>> {
    let envelope = Envelope {
        header: ParamsHeader::for_context(ctx),
        payload,
    };
    Ok(bincode::serialize(&envelope)?)
}

fn open<T: DeserializeOwned>(bytes: &[u8], ctx: &BgvContext) -> Result<T> {
    let envelope: Envelope<T> = bincode::deserialize(bytes)?;
    envelope.header.verify(ctx)?;
    Ok(envelope.payload)
}

/// Serialize a ciphertext with its parameter header
pub fn serialize_ciphertext(ct: &Ciphertext, ctx: &BgvContext) -> Result<Vec<u8>> {
    seal(ct, ctx)
}

/// Deserialize a ciphertext, verifying the header against the context
pub fn deserialize_ciphertext(bytes: &[u8], ctx: &BgvContext) -> Result<Ciphertext> {
    open(bytes, ctx)
}

/// Serialize a public key with its parameter header
pub fn serialize_public_key(pk: &PublicKey, ctx: &BgvContext) -> Result<Vec<u8>> {
    seal(pk, ctx)
}

/// Deserialize a public key, verifying the header against the context
pub fn deserialize_public_key(bytes: &[u8], ctx: &BgvContext) -> Result<PublicKey> {
    open(bytes, ctx)
}

/// Serialize a relinearization key with its parameter header
pub fn serialize_relin_key(rk: &RelinearizationKey, ctx: &BgvContext) -> Result<Vec<u8>> {
    seal(rk, ctx)
}

/// Deserialize a relinearization key, verifying the header against the context
pub fn deserialize_relin_key(bytes: &[u8], ctx: &BgvContext) -> Result<RelinearizationKey> {
    open(bytes, ctx)
}

/// Serialize the secret key.
///
/// Deliberately separate from the other entry points: the secret key leaves
/// the process only when the caller asks for exactly that.
pub fn serialize_secret_key(sk: &SecretKey, ctx: &BgvContext) -> Result<Vec<u8>> {
    seal(sk, ctx)
}

/// Deserialize a secret key, verifying the header against the context
pub fn deserialize_secret_key(bytes: &[u8], ctx: &BgvContext) -> Result<SecretKey> {
    open(bytes, ctx)
}

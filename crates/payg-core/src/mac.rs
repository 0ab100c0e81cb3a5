//! Keyed hash used to sign the period and counter of a code
//!
//! Code derivation only needs "key bytes + message bytes -> digest". Keeping
//! that behind [`KeyedHash`] lets the primitive change without touching the
//! bit packing. Changing it changes every code, so a new implementation is a
//! format break, not a refactor.

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::{Error, Result};

/// Length of the digest consumed by code derivation
pub const MAC_OUTPUT_LEN: usize = 20;

/// Digest bytes consumed by code derivation
pub type MacOutput = [u8; MAC_OUTPUT_LEN];

/// A keyed hash with at least 160 bits of output
pub trait KeyedHash {
    /// Compute the digest of `message` under `key`
    fn keyed_digest(&self, key: &[u8], message: &[u8]) -> Result<MacOutput>;
}

/// HMAC with SHA-1, the reference primitive
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha1;

impl KeyedHash for HmacSha1 {
    fn keyed_digest(&self, key: &[u8], message: &[u8]) -> Result<MacOutput> {
        let mut mac =
            <Hmac<Sha1> as Mac>::new_from_slice(key).map_err(|e| Error::Mac(e.to_string()))?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().into())
    }
}

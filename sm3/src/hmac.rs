//! HMAC-SM3 as defined in [RFC 2104].
//!
//! ```text
//! HMAC(K, m) = H((K' ^ opad) || H((K' ^ ipad) || m))
//! ```
//!
//! where `K'` is `K` zero padded to the block size, or `H(K)` zero padded
//! when `K` is longer than a block.
//!
//! [RFC 2104]: https://datatracker.ietf.org/doc/html/rfc2104

use crate::{BLOCK_SIZE, DIGEST_SIZE, Hash, Sm3, sm3};
use core::fmt;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Compute HMAC-SM3 of `msg` under `key` in one shot.
pub fn hmac(key: &[u8], msg: &[u8]) -> Hash {
    Hmac::new(key).chain(msg).finalize()
}

/// Incremental HMAC-SM3.
///
/// Both the inner and the outer hash states are keyed up front, so cloning a
/// keyed [`Hmac`] is a cheap way to MAC many messages under one key.
#[derive(Clone)]
pub struct Hmac {
    inner: Sm3,
    outer: Sm3,
}

impl Hmac {
    /// Key a new HMAC-SM3 instance.
    pub fn new(key: &[u8]) -> Self {
        let mut block = [0u8; BLOCK_SIZE];
        if key.len() > BLOCK_SIZE {
            block[..DIGEST_SIZE].copy_from_slice(&sm3(key));
        } else {
            block[..key.len()].copy_from_slice(key);
        }

        Self {
            inner: Sm3::new().chain(block.map(|b| b ^ IPAD)),
            outer: Sm3::new().chain(block.map(|b| b ^ OPAD)),
        }
    }

    /// Absorb message data.
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        self.inner.update(data);
    }

    /// Absorb message data, returning the updated instance.
    #[must_use]
    pub fn chain(mut self, data: impl AsRef<[u8]>) -> Self {
        self.update(data);
        self
    }

    /// Compute the tag over everything absorbed so far.
    pub fn finalize(&self) -> Hash {
        self.outer.clone().chain(self.inner.finalize()).finalize()
    }
}

impl fmt::Debug for Hmac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hmac").finish_non_exhaustive()
    }
}

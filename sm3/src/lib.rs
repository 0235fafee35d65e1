#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::checked_conversions,
    clippy::implicit_saturating_sub,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod compress;
mod consts;
mod hmac;
mod padding;

#[cfg(feature = "alloc")]
pub mod merkle;

pub use crate::{
    consts::{BLOCK_SIZE, DIGEST_SIZE},
    hmac::{Hmac, hmac},
    padding::Padding,
};
pub use digest;

use crate::{compress::compress, consts::IV};
use core::fmt;
use digest::{
    FixedOutput, FixedOutputReset, HashMarker, Output, OutputSizeUser, Reset, Update,
    consts::{U32, U64},
    core_api::BlockSizeUser,
};

/// SM3 digest.
pub type Hash = [u8; DIGEST_SIZE];

/// Error returned when a hash state cannot be resumed from the given length.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Error;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sm3 error: processed length is not a multiple of the block size")
    }
}

impl core::error::Error for Error {}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;

/// Compute the SM3 digest of `data` in one shot.
pub fn sm3(data: impl AsRef<[u8]>) -> Hash {
    let mut hasher = Sm3::new();
    hasher.update(data);
    hasher.finalize()
}

/// Incremental SM3 hash state.
///
/// The state holds the eight-word chaining value, a partial block buffer and
/// the number of bytes absorbed so far. Full blocks are compressed as soon as
/// they are available.
///
/// [`Sm3::finalize`] borrows the state: padding is applied to a copy, so the
/// same state can keep absorbing data afterwards. This makes intermediate
/// digests of a stream cheap:
///
/// ```
/// use shangmi_sm3::{Sm3, sm3};
///
/// let mut hasher = Sm3::new();
/// hasher.update(b"hello");
/// let partial = hasher.finalize();
/// hasher.update(b" world");
///
/// assert_eq!(partial, sm3(b"hello"));
/// assert_eq!(hasher.finalize(), sm3(b"hello world"));
/// ```
#[derive(Clone)]
pub struct Sm3 {
    state: [u32; 8],
    buffer: [u8; BLOCK_SIZE],
    buffer_len: usize,
    len: u64,
}

impl Sm3 {
    /// Create a new hash state seeded with the SM3 initial value.
    pub const fn new() -> Self {
        Self {
            state: IV,
            buffer: [0; BLOCK_SIZE],
            buffer_len: 0,
            len: 0,
        }
    }

    /// Reconstruct the state of a hash computation which has absorbed
    /// `processed_len` bytes and whose chaining value is `digest`.
    ///
    /// A digest is the chaining value after the padded message has been
    /// compressed, so `processed_len` is the length of the original message
    /// plus its [`Padding`]. It must be a multiple of [`BLOCK_SIZE`].
    ///
    /// Data fed to the resumed state is hashed as if it had been appended
    /// to the padded original message.
    pub fn resume(digest: &Hash, processed_len: u64) -> Result<Self> {
        if processed_len % BLOCK_SIZE as u64 != 0 {
            return Err(Error);
        }

        let mut state = [0u32; 8];
        for (word, bytes) in state.iter_mut().zip(digest.chunks_exact(4)) {
            *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }

        Ok(Self {
            state,
            buffer: [0; BLOCK_SIZE],
            buffer_len: 0,
            len: processed_len,
        })
    }

    /// Absorb `data`.
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        let data = data.as_ref();
        self.len = self.len.wrapping_add(data.len() as u64);
        self.absorb(data);
    }

    /// Absorb `data`, returning the updated state.
    #[must_use]
    pub fn chain(mut self, data: impl AsRef<[u8]>) -> Self {
        self.update(data);
        self
    }

    /// Number of bytes absorbed so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Has nothing been absorbed yet?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Compute the digest of everything absorbed so far.
    ///
    /// The state is left untouched.
    pub fn finalize(&self) -> Hash {
        let mut tail = self.clone();
        tail.absorb(Padding::new(self.len).as_ref());
        debug_assert_eq!(tail.buffer_len, 0);

        let mut out = [0u8; DIGEST_SIZE];
        for (bytes, word) in out.chunks_exact_mut(4).zip(tail.state) {
            bytes.copy_from_slice(&word.to_be_bytes());
        }
        out
    }

    /// Buffer and compress `data` without touching the length counter.
    fn absorb(&mut self, mut data: &[u8]) {
        if self.buffer_len > 0 {
            let take = (BLOCK_SIZE - self.buffer_len).min(data.len());
            let (head, rest) = data.split_at(take);
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(head);
            self.buffer_len += take;
            data = rest;

            if self.buffer_len < BLOCK_SIZE {
                return;
            }

            compress(&mut self.state, &self.buffer);
            self.buffer_len = 0;
        }

        while let Some((block, rest)) = data.split_first_chunk::<BLOCK_SIZE>() {
            compress(&mut self.state, block);
            data = rest;
        }

        self.buffer[..data.len()].copy_from_slice(data);
        self.buffer_len = data.len();
    }
}

impl Default for Sm3 {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Sm3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sm3").field("len", &self.len).finish_non_exhaustive()
    }
}

//
// `digest` trait impls
//

impl HashMarker for Sm3 {}

impl OutputSizeUser for Sm3 {
    type OutputSize = U32;
}

impl BlockSizeUser for Sm3 {
    type BlockSize = U64;
}

impl Update for Sm3 {
    fn update(&mut self, data: &[u8]) {
        Sm3::update(self, data);
    }
}

impl FixedOutput for Sm3 {
    fn finalize_into(self, out: &mut Output<Self>) {
        out.copy_from_slice(&Sm3::finalize(&self));
    }
}

impl FixedOutputReset for Sm3 {
    fn finalize_into_reset(&mut self, out: &mut Output<Self>) {
        out.copy_from_slice(&Sm3::finalize(self));
        Reset::reset(self);
    }
}

impl Reset for Sm3 {
    fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::{Sm3, sm3};
    use hex_literal::hex;

    #[test]
    fn split_updates_match_one_shot() {
        let data = [0x5au8; 200];
        for split in [0, 1, 63, 64, 65, 128, 199, 200] {
            let mut hasher = Sm3::new();
            hasher.update(&data[..split]);
            hasher.update(&data[split..]);
            assert_eq!(hasher.finalize(), sm3(data), "split at {split}");
            assert_eq!(hasher.len(), 200);
        }
    }

    #[test]
    fn finalize_leaves_state_usable() {
        let mut hasher = Sm3::new();
        hasher.update(b"ab");
        let _ = hasher.finalize();
        hasher.update(b"c");
        assert_eq!(
            hasher.finalize(),
            hex!("66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0")
        );
    }

    #[test]
    fn resume_rejects_unaligned_length() {
        let digest = sm3(b"abc");
        assert!(Sm3::resume(&digest, 63).is_err());
        assert!(Sm3::resume(&digest, 64).is_ok());
    }
}

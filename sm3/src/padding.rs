//! Merkle-Damgård strengthening.

use crate::consts::BLOCK_SIZE;
use core::fmt;

/// Largest possible padding: `0x80`, 63 zero bytes and the 8-byte length.
const MAX_PADDING: usize = BLOCK_SIZE + 8;

/// Padding appended to a message of a given length before the final
/// compression.
///
/// The padding is a single `0x80` byte, zero bytes up to a length congruent
/// to 56 modulo 64, then the message length in bits as a 64-bit big endian
/// integer. It is between 9 and 72 bytes long.
///
/// Knowing only the length of a message is enough to compute its padding,
/// which is why a digest can be resumed (see [`Sm3::resume`][crate::Sm3::resume]).
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Padding {
    bytes: [u8; MAX_PADDING],
    len: usize,
}

impl Padding {
    /// Compute the padding for a message of `message_len` bytes.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(message_len: u64) -> Self {
        let rem = (message_len % BLOCK_SIZE as u64) as usize;
        let zeros = (2 * BLOCK_SIZE - 9 - rem) % BLOCK_SIZE;
        let len = 1 + zeros + 8;

        let mut bytes = [0u8; MAX_PADDING];
        bytes[0] = 0x80;
        bytes[len - 8..len].copy_from_slice(&message_len.wrapping_mul(8).to_be_bytes());

        Self { bytes, len }
    }

    /// Length of the padding in bytes.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }
}

impl AsRef<[u8]> for Padding {
    fn as_ref(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl fmt::Debug for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Padding(")?;

        for byte in self.as_ref() {
            write!(f, "{:02x}", byte)?;
        }

        write!(f, ")")
    }
}

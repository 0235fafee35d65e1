//! SM3 constants.

/// Size of an SM3 message block in bytes.
pub const BLOCK_SIZE: usize = 64;

/// Size of an SM3 digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// Initial chaining value.
pub(crate) const IV: [u32; 8] = [
    0x7380_166f,
    0x4914_b2b9,
    0x1724_42d7,
    0xda8a_0600,
    0xa96f_30bc,
    0x1631_38aa,
    0xe38d_ee4d,
    0xb0fb_0e4e,
];

/// Round constant `T_j` for `0 <= j < 16`.
pub(crate) const T_LOW: u32 = 0x79cc_4519;

/// Round constant `T_j` for `16 <= j < 64`.
pub(crate) const T_HIGH: u32 = 0x7a87_9d8a;

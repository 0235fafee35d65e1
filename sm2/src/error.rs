//! Error types.

use core::fmt;

/// Error type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Attempted to invert a value which is zero modulo the modulus (or
    /// otherwise shares a factor with it).
    ///
    /// This never happens for valid keys and nonces and indicates corrupted
    /// parameters or a logic error.
    NotInvertible,

    /// Distinguishing identifier is longer than 8191 bytes, so its bit
    /// length does not fit the 16-bit `ENTL` prefix.
    IdentityTooLong,

    /// Malformed domain parameters or a singular curve.
    InvalidParams,

    /// Secret scalar outside `[1, n-2]`.
    InvalidScalar,

    /// Point is the identity, is not on the curve, or is badly encoded.
    InvalidPoint,

    /// Malformed signature encoding.
    InvalidSignature,

    /// The random number generator failed.
    Rng,

    /// A rejection sampling loop exhausted its iteration cap.
    RetryLimit,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::NotInvertible => "value is not invertible modulo the given modulus",
            Error::IdentityTooLong => "distinguishing identifier too long",
            Error::InvalidParams => "invalid domain parameters",
            Error::InvalidScalar => "invalid secret scalar",
            Error::InvalidPoint => "invalid curve point",
            Error::InvalidSignature => "invalid signature encoding",
            Error::Rng => "random number generator failure",
            Error::RetryLimit => "retry limit exceeded",
        };
        write!(f, "sm2 error: {msg}")
    }
}

impl core::error::Error for Error {}

impl From<Error> for signature::Error {
    fn from(_: Error) -> signature::Error {
        signature::Error::new()
    }
}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;

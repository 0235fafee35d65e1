//! Modular arithmetic over an arbitrary odd modulus.
//!
//! The same helpers serve the base field (modulo `p`) and the scalar field
//! (modulo `n`); nothing here is tied to one modulus.

use crate::{Error, FieldBytes, Result};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Size of a serialized field element or scalar in bytes.
pub const FIELD_SIZE: usize = 32;

/// Compute `x⁻¹ mod modulus` with the extended Euclidean algorithm.
///
/// Returns [`Error::NotInvertible`] when `x ≡ 0 (mod modulus)` or, more
/// generally, when `gcd(x, modulus) ≠ 1`.
pub fn mod_inverse(x: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::NotInvertible);
    }

    let x = x % modulus;
    if x.is_zero() {
        return Err(Error::NotInvertible);
    }

    let m = BigInt::from(modulus.clone());
    let (mut r0, mut r1) = (m.clone(), BigInt::from(x));
    let (mut t0, mut t1) = (BigInt::zero(), BigInt::one());

    // invariant: r_i ≡ t_i · x (mod m)
    while !r1.is_zero() {
        let q = &r0 / &r1;
        let r2 = &r0 - &q * &r1;
        r0 = core::mem::replace(&mut r1, r2);
        let t2 = &t0 - &q * &t1;
        t0 = core::mem::replace(&mut t1, t2);
    }

    if !r0.is_one() {
        return Err(Error::NotInvertible);
    }

    t0.mod_floor(&m).to_biguint().ok_or(Error::NotInvertible)
}

/// `(a + b) mod m`
pub(crate) fn add(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a + b) % m
}

/// `(a - b) mod m`, for any `a` and `b`.
pub(crate) fn sub(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    if a >= b {
        (a - b) % m
    } else {
        let diff = (b - a) % m;
        if diff.is_zero() { diff } else { m - diff }
    }
}

/// `(a · b) mod m`
pub(crate) fn mul(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a * b) % m
}

/// `-a mod m`
pub(crate) fn neg(a: &BigUint, m: &BigUint) -> BigUint {
    sub(&BigUint::zero(), a, m)
}

/// Serialize as [`FIELD_SIZE`] big endian bytes.
///
/// Values are expected to be reduced modulo a 256-bit modulus; anything
/// larger keeps only its low 256 bits.
pub(crate) fn to_bytes(x: &BigUint) -> FieldBytes {
    let bytes = x.to_bytes_be();
    let tail = &bytes[bytes.len().saturating_sub(FIELD_SIZE)..];
    let mut out = [0u8; FIELD_SIZE];
    out[FIELD_SIZE - tail.len()..].copy_from_slice(tail);
    out
}

/// Parse big endian bytes of any length.
pub(crate) fn from_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

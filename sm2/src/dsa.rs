//! SM2 Digital Signature Algorithm (SM2DSA) as defined in [draft-shen-sm2-ecdsa § 5].
//!
//! ## Usage
//!
//! NOTE: requires the `getrandom` crate feature for `OsRng`.
//!
#![cfg_attr(all(feature = "std", feature = "getrandom"), doc = "```")]
#![cfg_attr(not(all(feature = "std", feature = "getrandom")), doc = "```ignore")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use rand_core::OsRng; // requires 'getrandom` feature
//! use shangmi_sm2::{
//!     CurveParams,
//!     dsa::{Signature, SigningKey, signature::Signer},
//! };
//!
//! // Signing
//! let curve = CurveParams::sm2();
//! let distid = b"example@rustcrypto.org"; // distinguishing identifier
//! let signing_key = SigningKey::random(curve, distid, &mut OsRng)?;
//! let verifying_key_bytes = signing_key.verifying_key().to_sec1_bytes();
//! let message = b"test message";
//! let signature: Signature = signing_key.sign(message);
//!
//! // Verifying
//! use shangmi_sm2::dsa::{VerifyingKey, signature::Verifier};
//!
//! let verifying_key = VerifyingKey::from_sec1_bytes(curve, distid, &verifying_key_bytes)?;
//! verifying_key.verify(message, &signature)?;
//! # Ok(())
//! # }
//! ```
//!
//! The same operations are available as free functions over raw scalars
//! and points, see [`sign`] and [`verify`].
//!
//! [draft-shen-sm2-ecdsa § 5]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5

mod nonce;
mod signing;
mod verifying;

pub use signature;

pub use self::{
    nonce::{NonceGenerator, derive_nonce},
    signing::SigningKey,
    verifying::VerifyingKey,
};

use crate::{
    AffinePoint, CurveParams, Error, FieldBytes, Hash, MAX_ATTEMPTS, Result,
    arithmetic::field::{self, FIELD_SIZE},
    distid::{hash_msg, hash_z},
};
use alloc::vec::Vec;
use core::fmt::{self, Debug};
use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::CryptoRngCore;
use signature::SignatureEncoding;

/// Maximum number of nonce candidates tried by [`sign`] before giving up
/// with [`Error::RetryLimit`].
///
/// A candidate is rejected with probability around `2^-255`, so in practice
/// signing always succeeds on the first attempt.
pub const MAX_SIGN_ATTEMPTS: usize = MAX_ATTEMPTS;

/// SM2DSA signature serialized as bytes.
pub type SignatureBytes = [u8; Signature::BYTE_SIZE];

/// SM2DSA signature.
///
/// Parsing only checks that `r` and `s` are non-zero and fit in 32 bytes.
/// The range check against the curve order happens at verification time.
#[derive(Clone, Eq, PartialEq)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {
    /// Size of an encoded SM2DSA signature in bytes.
    pub const BYTE_SIZE: usize = 2 * FIELD_SIZE;

    /// Create a [`Signature`] from its `r` and `s` components.
    pub fn from_scalars(r: BigUint, s: BigUint) -> Result<Self> {
        for component in [&r, &s] {
            if component.is_zero() || component.bits() > 256 {
                return Err(Error::InvalidSignature);
            }
        }

        Ok(Self { r, s })
    }

    /// Parse an SM2DSA signature from a byte array.
    pub fn from_bytes(bytes: &SignatureBytes) -> Result<Self> {
        let (r_bytes, s_bytes) = bytes.split_at(FIELD_SIZE);
        Self::from_scalars(field::from_bytes(r_bytes), field::from_bytes(s_bytes))
    }

    /// Parse an SM2DSA signature from a byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        SignatureBytes::try_from(bytes)
            .map_err(|_| Error::InvalidSignature)?
            .try_into()
    }

    /// Serialize this signature as bytes.
    pub fn to_bytes(&self) -> SignatureBytes {
        let mut ret = [0; Self::BYTE_SIZE];
        let (r_bytes, s_bytes) = ret.split_at_mut(FIELD_SIZE);
        r_bytes.copy_from_slice(&self.r_bytes());
        s_bytes.copy_from_slice(&self.s_bytes());
        ret
    }

    /// Bytes for the `r` component of a signature.
    pub fn r_bytes(&self) -> FieldBytes {
        field::to_bytes(&self.r)
    }

    /// Bytes for the `s` component of a signature.
    pub fn s_bytes(&self) -> FieldBytes {
        field::to_bytes(&self.s)
    }

    /// Get the `r` component of this signature.
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// Get the `s` component of this signature.
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Convert this signature into a byte vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shangmi_sm2::dsa::Signature(")?;

        for byte in self.to_bytes() {
            write!(f, "{:02X}", byte)?;
        }

        write!(f, ")")
    }
}

impl From<Signature> for SignatureBytes {
    fn from(signature: Signature) -> SignatureBytes {
        signature.to_bytes()
    }
}

impl From<&Signature> for SignatureBytes {
    fn from(signature: &Signature) -> SignatureBytes {
        signature.to_bytes()
    }
}

impl SignatureEncoding for Signature {
    type Repr = SignatureBytes;

    fn to_bytes(&self) -> Self::Repr {
        self.into()
    }

    fn encoded_len(&self) -> usize {
        Self::BYTE_SIZE
    }
}

impl TryFrom<SignatureBytes> for Signature {
    type Error = Error;

    fn try_from(signature: SignatureBytes) -> Result<Signature> {
        Signature::from_bytes(&signature)
    }
}

impl TryFrom<&SignatureBytes> for Signature {
    type Error = Error;

    fn try_from(signature: &SignatureBytes) -> Result<Signature> {
        Signature::from_bytes(signature)
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Signature> {
        Signature::from_slice(bytes)
    }
}

/// Source of the per-signature nonce `k`.
pub enum NonceMode<'a> {
    /// Derive `k` from the secret key and message digest with HMAC-SM3,
    /// see [`NonceGenerator`]. Signing the same message twice yields the
    /// same signature.
    Deterministic,

    /// Draw `k` uniformly from `[1, n-1]` using a cryptographically secure
    /// random number generator.
    Random(&'a mut dyn CryptoRngCore),
}

impl Debug for NonceMode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonceMode::Deterministic => f.write_str("Deterministic"),
            NonceMode::Random(_) => f.debug_tuple("Random").finish_non_exhaustive(),
        }
    }
}

/// A [`NonceMode`] bound to a particular key and digest.
enum Nonces<'c, 'r> {
    Deterministic(NonceGenerator<'c>),
    Random(&'c CurveParams, &'r mut dyn CryptoRngCore),
}

impl Nonces<'_, '_> {
    fn next(&mut self) -> Result<BigUint> {
        match self {
            Nonces::Deterministic(generator) => generator.next_nonce(),
            Nonces::Random(curve, rng) => curve.random_scalar(&mut **rng),
        }
    }
}

/// Generate a key pair `(d, P = [d]G)` with `d` uniform in `[1, n-2]`.
pub fn keygen<R: CryptoRngCore + ?Sized>(
    curve: &CurveParams,
    rng: &mut R,
) -> Result<(BigUint, AffinePoint)> {
    for _ in 0..MAX_ATTEMPTS {
        let d = curve.random_scalar(rng)?;
        if curve.check_secret_scalar(&d).is_ok() {
            let public_key = curve.mul_generator(&d)?;
            return Ok((d, public_key));
        }
    }

    Err(Error::RetryLimit)
}

/// Compute the public key `P = [d]G` for a secret scalar `d ∈ [1, n-2]`.
pub fn public_key(curve: &CurveParams, d: &BigUint) -> Result<AffinePoint> {
    curve.check_secret_scalar(d)?;
    curve.mul_generator(d)
}

/// Sign `message` on behalf of `identity` with secret scalar `d`.
///
/// `public_key` must be `[d]G`; it enters the identity hash `ZA` and is not
/// recomputed here.
pub fn sign(
    curve: &CurveParams,
    d: &BigUint,
    identity: &[u8],
    message: &[u8],
    public_key: &AffinePoint,
    mode: NonceMode<'_>,
) -> Result<Signature> {
    // A1: set M~=ZA || M
    let z = hash_z(curve, identity, public_key)?;

    // A2: calculate e=Hv(M~)
    let e = hash_msg(&z, message);
    sign_digest(curve, d, &e, mode)
}

/// Sign a precomputed message digest `e = H256(ZA || M)`.
///
/// ## Algorithm
///
/// ```text
/// A3: pick a random number k in [1, n-1] via a random number generator
/// A4: calculate the elliptic curve point (x1, y1)=[k]G
/// A5: calculate r=(e+x1) modn, return to A3 if r=0 or r+k=n
/// A6: calculate s=((1+dA)^(-1)*(k-r*dA)) modn, return to A3 if s=0
/// A7: the digital signature of M is (r, s)
/// ```
pub fn sign_digest(
    curve: &CurveParams,
    d: &BigUint,
    digest: &Hash,
    mode: NonceMode<'_>,
) -> Result<Signature> {
    curve.check_secret_scalar(d)?;

    let n = curve.order();
    let e = field::from_bytes(digest) % n;
    let d_plus_1_inv = field::mod_inverse(&(d + 1u8), n)?;

    let mut nonces = match mode {
        NonceMode::Deterministic => Nonces::Deterministic(NonceGenerator::new(curve, d, digest)),
        NonceMode::Random(rng) => Nonces::Random(curve, rng),
    };

    for _ in 0..MAX_SIGN_ATTEMPTS {
        // A3: pick a random number k in [1, n-1]
        let k = nonces.next()?;

        // A4: calculate the elliptic curve point (x1, y1)=[k]G
        let x1 = curve.mul_generator(&k)?.x() % n;

        // A5: calculate r=(e+x1) modn, return to A3 if r=0 or r+k=n
        let r = field::add(&e, &x1, n);
        if r.is_zero() || &r + &k == *n {
            continue;
        }

        // A6: calculate s=((1+dA)^(-1)*(k-r*dA)) modn, return to A3 if s=0
        let s = field::mul(&d_plus_1_inv, &field::sub(&k, &field::mul(&r, d, n), n), n);
        if s.is_zero() {
            continue;
        }

        // A7: the digital signature of M is (r, s)
        return Signature::from_scalars(r, s);
    }

    Err(Error::RetryLimit)
}

/// Verify `signature` over `message` from `identity` with public key
/// `public_key`.
///
/// Returns `false` for any malformed input, including a public key which is
/// not on the curve or an identity too long to have been signed.
pub fn verify(
    curve: &CurveParams,
    public_key: &AffinePoint,
    identity: &[u8],
    message: &[u8],
    signature: &Signature,
) -> bool {
    // B3: set M'~=ZA || M'
    let Ok(z) = hash_z(curve, identity, public_key) else {
        return false;
    };

    // B4: calculate e'=Hv(M'~)
    let e = hash_msg(&z, message);
    verify_digest(curve, public_key, &e, signature)
}

/// Verify `signature` over a precomputed message digest `e = H256(ZA || M)`.
///
/// ## Algorithm
///
/// ```text
/// B1: verify whether r' in [1,n-1], verification failed if not
/// B2: verify whether s' in [1,n-1], verification failed if not
/// B5: calculate t = (r' + s') modn, verification failed if t=0
/// B6: calculate the point (x1', y1')=[s']G + [t]PA
/// B7: calculate R=(e'+x1') modn, verification pass if yes, otherwise failed
/// ```
pub fn verify_digest(
    curve: &CurveParams,
    public_key: &AffinePoint,
    digest: &Hash,
    signature: &Signature,
) -> bool {
    let n = curve.order();
    let (r, s) = (signature.r(), signature.s());

    // B1, B2
    if r.is_zero() || r >= n || s.is_zero() || s >= n {
        return false;
    }

    if !curve.is_on_curve(public_key) {
        return false;
    }

    // B5: calculate t = (r' + s') modn, verification failed if t=0
    let t = field::add(r, s, n);
    if t.is_zero() {
        return false;
    }

    // B6: calculate the point (x1', y1')=[s']G + [t]PA
    let (u, v) = match (curve.mul_generator(s), curve.mul(public_key, &t)) {
        (Ok(u), Ok(v)) if !u.is_identity() && !v.is_identity() => (u, v),
        _ => return false,
    };

    let point = match curve.add_affine(&u, &v) {
        Ok(point) if !point.is_identity() => point,
        _ => return false,
    };

    // B7: calculate R=(e'+x1') modn, verification pass if yes, otherwise failed
    let e = field::from_bytes(digest);
    field::add(&e, point.x(), n) == *r
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use hex_literal::hex;

    #[test]
    fn signature_rejects_zero_components() {
        let mut bytes = [0x11; Signature::BYTE_SIZE];
        assert!(Signature::from_bytes(&bytes).is_ok());

        bytes[..FIELD_SIZE].fill(0);
        assert_eq!(Signature::from_bytes(&bytes), Err(Error::InvalidSignature));
    }

    #[test]
    fn signature_rejects_wrong_length() {
        assert_eq!(Signature::from_slice(&[1; 63]), Err(Error::InvalidSignature));
        assert_eq!(Signature::from_slice(&[1; 65]), Err(Error::InvalidSignature));
    }

    #[test]
    fn signature_encoding() {
        let bytes = hex!(
            "0000000000000000000000000000000000000000000000000000000000000001"
            "00000000000000000000000000000000000000000000000000000000000000ff"
        );
        let signature = Signature::from_bytes(&bytes).unwrap();
        assert_eq!(signature.r(), &BigUint::from(1u8));
        assert_eq!(signature.s(), &BigUint::from(0xffu8));
        assert_eq!(signature.to_bytes(), bytes);
        assert_eq!(signature.to_vec(), bytes.to_vec());
        assert!(format!("{signature:?}").ends_with("00FF)"));
    }

    #[test]
    fn secret_scalar_n_minus_one_is_rejected() {
        let curve = CurveParams::sm2();
        let d = curve.order() - 1u8;
        assert_eq!(public_key(curve, &d), Err(Error::InvalidScalar));
        assert_eq!(
            sign_digest(curve, &d, &[0; 32], NonceMode::Deterministic),
            Err(Error::InvalidScalar)
        );
    }

    #[test]
    fn out_of_range_components_do_not_verify() {
        let curve = CurveParams::sm2();
        let d = BigUint::from(7u8);
        let p = public_key(curve, &d).unwrap();
        let e = [0x42; 32];
        let sig = sign_digest(curve, &d, &e, NonceMode::Deterministic).unwrap();
        assert!(verify_digest(curve, &p, &e, &sig));

        // r + n and s + n are congruent to valid components
        let n = curve.order();
        let shifted = Signature {
            r: sig.r() + n,
            s: sig.s().clone(),
        };
        assert!(!verify_digest(curve, &p, &e, &shifted));
        let shifted = Signature {
            r: sig.r().clone(),
            s: sig.s() + n,
        };
        assert!(!verify_digest(curve, &p, &e, &shifted));
    }

    #[test]
    fn non_invertible_arithmetic_is_surfaced() {
        // 15 is odd but not prime
        let small = |v: u8| BigUint::from(v);
        let curve = CurveParams::new(
            "composite",
            small(15),
            small(1),
            small(1),
            (small(0), small(1)),
            small(7),
        )
        .unwrap();

        assert_eq!(public_key(&curve, &small(4)), Err(Error::NotInvertible));

        let g = curve.generator();
        let sig = Signature::from_scalars(small(1), small(4)).unwrap();
        assert!(!verify_digest(&curve, g, &[0; 32], &sig));
    }
}

//! Support for SM2DSA signing.
//!
//! ## Algorithm
//!
//! ```text
//! A1: set M~=ZA || M
//! A2: calculate e=Hv(M~)
//! A3: pick a random number k in [1, n-1] via a random number generator
//! A4: calculate the elliptic curve point (x1, y1)=[k]G
//! A5: calculate r=(e+x1) modn, return to A3 if r=0 or r+k=n
//! A6: calculate s=((1+dA)^(-1)*(k-r*dA)) modn, return to A3 if s=0
//! A7: the digital signature of M is (r, s)
//! ```

use super::{NonceMode, Signature, VerifyingKey, sign_digest};
use crate::{CurveParams, Error as Sm2Error, FieldBytes, Hash, arithmetic::field};
use core::fmt::{self, Debug};
use num_bigint::BigUint;
use signature::{
    Error, KeypairRef, RandomizedSigner, Result, Signer,
    hazmat::{PrehashSigner, RandomizedPrehashSigner},
    rand_core::CryptoRngCore,
};

/// SM2DSA secret key used for signing messages and producing signatures.
///
/// ## Usage
///
/// The [`signature`] crate defines the following traits which are the
/// primary API for signing:
///
/// - [`Signer`]: sign a message using this key
/// - [`RandomizedSigner`]: sign a message using this key and a random nonce
/// - [`PrehashSigner`]: sign the low-level raw output bytes of a message digest
///
/// [`Signer`] uses deterministic nonces derived with HMAC-SM3.
#[derive(Clone)]
pub struct SigningKey {
    /// Secret key.
    secret_scalar: BigUint,

    /// Verifying key for this signing key.
    verifying_key: VerifyingKey,
}

impl SigningKey {
    /// Create signing key from a signer's distinguishing identifier and
    /// secret scalar `d ∈ [1, n-2]`.
    pub fn new(
        curve: &'static CurveParams,
        distid: &[u8],
        secret_scalar: BigUint,
    ) -> crate::Result<Self> {
        let public_key = super::public_key(curve, &secret_scalar)?;
        let verifying_key = VerifyingKey::from_affine(curve, distid, public_key)?;
        Ok(Self {
            secret_scalar,
            verifying_key,
        })
    }

    /// Generate a random signing key.
    pub fn random<R: CryptoRngCore + ?Sized>(
        curve: &'static CurveParams,
        distid: &[u8],
        rng: &mut R,
    ) -> crate::Result<Self> {
        let (secret_scalar, _) = super::keygen(curve, rng)?;
        Self::new(curve, distid, secret_scalar)
    }

    /// Parse signing key from big endian-encoded bytes.
    pub fn from_bytes(
        curve: &'static CurveParams,
        distid: &[u8],
        bytes: &FieldBytes,
    ) -> crate::Result<Self> {
        Self::from_slice(curve, distid, bytes)
    }

    /// Parse signing key from big endian-encoded byte slice containing a secret
    /// scalar value.
    pub fn from_slice(
        curve: &'static CurveParams,
        distid: &[u8],
        slice: &[u8],
    ) -> crate::Result<Self> {
        if slice.len() != curve.scalar_len() {
            return Err(Sm2Error::InvalidScalar);
        }
        Self::new(curve, distid, field::from_bytes(slice))
    }

    /// Serialize as bytes.
    pub fn to_bytes(&self) -> FieldBytes {
        field::to_bytes(&self.secret_scalar)
    }

    /// Borrow the secret scalar value for this key.
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material.
    ///
    /// Please treat it with the care it deserves!
    pub fn as_scalar(&self) -> &BigUint {
        &self.secret_scalar
    }

    /// Get the [`VerifyingKey`] which corresponds to this [`SigningKey`].
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Get the distinguishing identifier for this key.
    pub fn distid(&self) -> &[u8] {
        self.verifying_key.distid()
    }

    /// Sign a message digest `e = H256(ZA || M)` with the given nonce source.
    pub fn sign_digest(&self, digest: &Hash, mode: NonceMode<'_>) -> crate::Result<Signature> {
        sign_digest(self.verifying_key.curve(), &self.secret_scalar, digest, mode)
    }

    /// Sign `msg` with the given nonce source.
    pub fn sign_with_mode(&self, msg: &[u8], mode: NonceMode<'_>) -> crate::Result<Signature> {
        // A1: set M~=ZA || M
        let hash = self.verifying_key.hash_msg(msg);
        self.sign_digest(&hash, mode)
    }
}

/// Check that a prehash is exactly one SM3 digest.
fn prehash_to_digest(prehash: &[u8]) -> Result<Hash> {
    Hash::try_from(prehash).map_err(|_| Error::new())
}

//
// `*Signer` trait impls
//

impl PrehashSigner<Signature> for SigningKey {
    fn sign_prehash(&self, prehash: &[u8]) -> Result<Signature> {
        let digest = prehash_to_digest(prehash)?;
        Ok(self.sign_digest(&digest, NonceMode::Deterministic)?)
    }
}

impl RandomizedPrehashSigner<Signature> for SigningKey {
    fn sign_prehash_with_rng(
        &self,
        rng: &mut impl CryptoRngCore,
        prehash: &[u8],
    ) -> Result<Signature> {
        let digest = prehash_to_digest(prehash)?;
        Ok(self.sign_digest(&digest, NonceMode::Random(rng))?)
    }
}

impl RandomizedSigner<Signature> for SigningKey {
    fn try_sign_with_rng(&self, rng: &mut impl CryptoRngCore, msg: &[u8]) -> Result<Signature> {
        Ok(self.sign_with_mode(msg, NonceMode::Random(rng))?)
    }
}

impl Signer<Signature> for SigningKey {
    fn try_sign(&self, msg: &[u8]) -> Result<Signature> {
        Ok(self.sign_with_mode(msg, NonceMode::Deterministic)?)
    }
}

//
// Other trait impls
//

impl AsRef<VerifyingKey> for SigningKey {
    fn as_ref(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("verifying_key", &self.verifying_key)
            .finish_non_exhaustive()
    }
}

impl Eq for SigningKey {}
impl PartialEq for SigningKey {
    fn eq(&self, other: &SigningKey) -> bool {
        self.secret_scalar == other.secret_scalar && self.verifying_key == other.verifying_key
    }
}

impl KeypairRef for SigningKey {
    type VerifyingKey = VerifyingKey;
}

//! Support for verifying SM2DSA signatures.
//!
//! ## Algorithm
//!
//! ```text
//! B1: verify whether r' in [1,n-1], verification failed if not
//! B2: verify whether s' in [1,n-1], verification failed if not
//! B3: set M'~=ZA || M'
//! B4: calculate e'=Hv(M'~)
//! B5: calculate t = (r' + s') modn, verification failed if t=0
//! B6: calculate the point (x1', y1')=[s']G + [t]PA
//! B7: calculate R=(e'+x1') modn, verification pass if yes, otherwise failed
//! ```

use super::{Signature, verify_digest};
use crate::{
    AffinePoint, CurveParams, Error as Sm2Error, Hash,
    arithmetic::field::{self, FIELD_SIZE},
    distid::{hash_msg, hash_z},
};
use alloc::{boxed::Box, vec::Vec};
use core::fmt;
use num_bigint::BigUint;
use signature::{Error, Result, Verifier, hazmat::PrehashVerifier};

/// Tag byte of an uncompressed SEC1 point.
const SEC1_UNCOMPRESSED: u8 = 0x04;

/// SM2DSA public key used for verifying signatures are valid for a given
/// message.
///
/// ## Usage
///
/// The [`signature`] crate defines the following traits which are the
/// primary API for verifying:
///
/// - [`Verifier`]: verify a message against a provided key and signature
/// - [`PrehashVerifier`]: verify the low-level raw output bytes of a message digest
#[derive(Clone, Eq, PartialEq)]
pub struct VerifyingKey {
    /// Domain parameters the key belongs to.
    curve: &'static CurveParams,

    /// Signer's public key.
    public_key: AffinePoint,

    /// Signer's user information hash `Z`.
    identity_hash: Hash,

    /// Distinguishing identifier used to compute `Z`.
    distid: Vec<u8>,
}

impl VerifyingKey {
    /// Initialize [`VerifyingKey`] from a signer's distinguishing identifier
    /// and the affine coordinates of the public key.
    pub fn new(
        curve: &'static CurveParams,
        distid: &[u8],
        x: BigUint,
        y: BigUint,
    ) -> crate::Result<Self> {
        let public_key = curve.point(x, y)?;
        Self::from_affine(curve, distid, public_key)
    }

    /// Initialize [`VerifyingKey`] from an affine point.
    ///
    /// Returns an error if the point is the identity or not on the curve.
    pub fn from_affine(
        curve: &'static CurveParams,
        distid: &[u8],
        public_key: AffinePoint,
    ) -> crate::Result<Self> {
        if !curve.is_on_curve(&public_key) {
            return Err(Sm2Error::InvalidPoint);
        }

        let identity_hash = hash_z(curve, distid, &public_key)?;

        Ok(Self {
            curve,
            public_key,
            identity_hash,
            distid: distid.to_vec(),
        })
    }

    /// Initialize [`VerifyingKey`] from an uncompressed SEC1-encoded public
    /// key, `0x04 || x || y`.
    pub fn from_sec1_bytes(
        curve: &'static CurveParams,
        distid: &[u8],
        bytes: &[u8],
    ) -> crate::Result<Self> {
        let coordinates = match bytes.split_first() {
            Some((&SEC1_UNCOMPRESSED, rest)) if rest.len() == 2 * FIELD_SIZE => rest,
            _ => return Err(Sm2Error::InvalidPoint),
        };

        let (x, y) = coordinates.split_at(FIELD_SIZE);
        Self::new(curve, distid, field::from_bytes(x), field::from_bytes(y))
    }

    /// Borrow the inner [`AffinePoint`] for this public key.
    pub fn as_affine(&self) -> &AffinePoint {
        &self.public_key
    }

    /// Domain parameters of this key.
    pub fn curve(&self) -> &'static CurveParams {
        self.curve
    }

    /// Get the distinguishing identifier for this key.
    pub fn distid(&self) -> &[u8] {
        &self.distid
    }

    /// User information hash `Z` binding the identifier to this key.
    pub fn identity_hash(&self) -> &Hash {
        &self.identity_hash
    }

    /// Convert this [`VerifyingKey`] into the uncompressed
    /// `Elliptic-Curve-Point-to-Octet-String` encoding described in
    /// SEC 1: Elliptic Curve Cryptography (Version 2.0) section 2.3.3
    /// (page 10).
    ///
    /// <http://www.secg.org/sec1-v2.pdf>
    pub fn to_sec1_bytes(&self) -> Box<[u8]> {
        let mut bytes = Vec::with_capacity(1 + 2 * FIELD_SIZE);
        bytes.push(SEC1_UNCOMPRESSED);
        bytes.extend_from_slice(&self.public_key.x_bytes());
        bytes.extend_from_slice(&self.public_key.y_bytes());
        bytes.into_boxed_slice()
    }

    /// Compute message hash `e` according to [draft-shen-sm2-ecdsa § 5.2.1]
    ///
    /// [draft-shen-sm2-ecdsa § 5.2.1]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5.2.1
    pub fn hash_msg(&self, msg: &[u8]) -> Hash {
        hash_msg(&self.identity_hash, msg)
    }
}

//
// `*Verifier` trait impls
//

impl PrehashVerifier<Signature> for VerifyingKey {
    fn verify_prehash(&self, prehash: &[u8], signature: &Signature) -> Result<()> {
        let digest = Hash::try_from(prehash).map_err(|_| Error::new())?;

        if verify_digest(self.curve, &self.public_key, &digest, signature) {
            Ok(())
        } else {
            Err(Error::new())
        }
    }
}

impl Verifier<Signature> for VerifyingKey {
    fn verify(&self, msg: &[u8], signature: &Signature) -> Result<()> {
        // B3: set M'~=ZA || M'
        let hash = self.hash_msg(msg);
        self.verify_prehash(&hash, signature)
    }
}

//
// Other trait impls
//

impl AsRef<AffinePoint> for VerifyingKey {
    fn as_ref(&self) -> &AffinePoint {
        self.as_affine()
    }
}

impl From<VerifyingKey> for AffinePoint {
    fn from(verifying_key: VerifyingKey) -> AffinePoint {
        verifying_key.public_key
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyingKey")
            .field("curve", &self.curve.name())
            .field("public_key", &self.public_key)
            .field("distid", &self.distid)
            .finish()
    }
}

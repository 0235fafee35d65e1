//! Distinguishing identifier support.

use crate::{AffinePoint, CurveParams, Error, Hash, Result, arithmetic::field};
use shangmi_sm3::Sm3;

/// Compute user information hash `Z` according to [draft-shen-sm2-ecdsa § 5.1.4.4].
///
/// ```text
/// ZA=H256(ENTLA || IDA || a || b || xG || yG || xA || yA)
/// ```
///
/// `ENTLA` is the bit length of `IDA` as a 16-bit big endian integer, so
/// identifiers longer than 8191 bytes are rejected.
///
/// [draft-shen-sm2-ecdsa § 5.1.4.4]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5.1.4.4
pub fn hash_z(curve: &CurveParams, distid: &[u8], public_key: &AffinePoint) -> Result<Hash> {
    let entla: u16 = distid
        .len()
        .checked_mul(8)
        .and_then(|l| l.try_into().ok())
        .ok_or(Error::IdentityTooLong)?;

    if public_key.is_identity() {
        return Err(Error::InvalidPoint);
    }

    let generator = curve.generator();
    Ok(Sm3::new()
        .chain(entla.to_be_bytes())
        .chain(distid)
        .chain(field::to_bytes(curve.a()))
        .chain(field::to_bytes(curve.b()))
        .chain(generator.x_bytes())
        .chain(generator.y_bytes())
        .chain(public_key.x_bytes())
        .chain(public_key.y_bytes())
        .finalize())
}

/// Compute the message digest `e = H256(ZA || M)`.
pub fn hash_msg(z: &Hash, msg: &[u8]) -> Hash {
    Sm3::new().chain(z).chain(msg).finalize()
}

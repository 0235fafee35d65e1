//! Deterministic nonce generation with HMAC-SM3.
//!
//! This drives the HMAC-DRBG of [RFC6979 § 3.2] instantiated with SM3,
//! except that `T` is one whole SM3 output and the candidate is
//! `int(T) mod n` rather than a rejection on `int(T) >= n`.
//!
//! ```text
//! V = 0x01 0x01 ... 0x01, K = 0x00 0x00 ... 0x00
//! K = HMAC_K(V || 0x00 || int2octets(x) || h1), V = HMAC_K(V)
//! K = HMAC_K(V || 0x01 || int2octets(x) || h1), V = HMAC_K(V)
//! loop:
//!     T = empty; while tlen < qlen: V = HMAC_K(V), T = T || V
//!     k = int(T) mod q, output k if k in [1, q-1]
//!     K = HMAC_K(V || 0x00), V = HMAC_K(V)
//! ```
//!
//! [RFC6979 § 3.2]: https://datatracker.ietf.org/doc/html/rfc6979#section-3.2

use crate::{
    CurveParams, Error, MAX_ATTEMPTS, Result,
    arithmetic::field::{self, FIELD_SIZE},
};
use core::fmt;
use num_bigint::BigUint;
use num_traits::Zero;
use rfc6979::HmacDrbg;
use shangmi_sm3::{DIGEST_SIZE, Sm3};

/// Stateful HMAC-SM3 nonce generator.
///
/// The first nonce is a pure function of the secret scalar and the message
/// digest. Every later nonce is drawn after re-keying the generator, so a
/// signer which has to reject a nonce gets a fresh candidate instead of the
/// same one again.
pub struct NonceGenerator<'a> {
    curve: &'a CurveParams,
    drbg: HmacDrbg<Sm3>,
}

impl<'a> NonceGenerator<'a> {
    /// Seed a generator from secret scalar `x` and message digest `h1`.
    pub fn new(curve: &'a CurveParams, x: &BigUint, h1: &[u8]) -> Self {
        let x = field::to_bytes(x);
        let x = &x[FIELD_SIZE.saturating_sub(curve.scalar_len())..];

        Self {
            curve,
            drbg: HmacDrbg::new(x, h1, &[]),
        }
    }

    /// Next nonce candidate in `[1, n-1]`.
    pub fn next_nonce(&mut self) -> Result<BigUint> {
        // scalars are at most one SM3 output long
        let mut t = [0u8; DIGEST_SIZE];

        for _ in 0..MAX_ATTEMPTS {
            self.drbg.fill_bytes(&mut t);

            let candidate = field::from_bytes(&t) % self.curve.order();
            if !candidate.is_zero() {
                return Ok(candidate);
            }
        }

        Err(Error::RetryLimit)
    }
}

impl Iterator for NonceGenerator<'_> {
    type Item = BigUint;

    fn next(&mut self) -> Option<BigUint> {
        self.next_nonce().ok()
    }
}

impl fmt::Debug for NonceGenerator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonceGenerator")
            .field("curve", &self.curve.name())
            .finish_non_exhaustive()
    }
}

/// Derive the deterministic nonce for secret scalar `x` and message digest
/// `h1`: the first output of a fresh [`NonceGenerator`].
pub fn derive_nonce(curve: &CurveParams, x: &BigUint, h1: &[u8]) -> Result<BigUint> {
    NonceGenerator::new(curve, x, h1).next_nonce()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use hex_literal::hex;

    const D: [u8; 32] = hex!("128B2FA8BD433C6C068C8D803DFF79792A519A55171B1B650C23661D15897263");
    const E: [u8; 32] = hex!("b524f552cd82b8b028476e005c377fb19a87e6fc682d48bb5d42e3d9b9effe76");

    #[test]
    fn first_nonce_known_answer() {
        let curve = CurveParams::sm2_example();
        let k = derive_nonce(curve, &BigUint::from_bytes_be(&D), &E).unwrap();
        assert_eq!(
            k.to_bytes_be(),
            hex!("63042bfb1087802bbdcbb25097371db325bcba46955902a2e419118924676a4d")
        );
    }

    #[test]
    fn later_nonces_differ() {
        let curve = CurveParams::sm2_example();
        let d = BigUint::from_bytes_be(&D);
        let nonces: Vec<BigUint> = NonceGenerator::new(curve, &d, &E).take(4).collect();

        assert_eq!(nonces.len(), 4);
        assert_eq!(nonces[0], derive_nonce(curve, &d, &E).unwrap());
        for (i, a) in nonces.iter().enumerate() {
            assert!(!a.is_zero() && a < curve.order());
            for b in &nonces[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn nonce_depends_on_key_and_digest() {
        let curve = CurveParams::sm2();
        let d = BigUint::from_bytes_be(&D);
        let k = derive_nonce(curve, &d, &E).unwrap();

        assert_eq!(k, derive_nonce(curve, &d, &E).unwrap());
        assert_ne!(k, derive_nonce(curve, &(&d + 1u8), &E).unwrap());
        assert_ne!(k, derive_nonce(curve, &d, &[0; 32]).unwrap());
    }

    #[test]
    fn candidates_follow_hmac_sm3_drbg() {
        use shangmi_sm3::Hmac;

        let curve = CurveParams::sm2();
        let x = D;
        let (mut k, mut v) = ([0x00; DIGEST_SIZE], [0x01; DIGEST_SIZE]);
        for sep in [0x00u8, 0x01] {
            k = Hmac::new(&k).chain(v).chain([sep]).chain(x).chain(E).finalize();
            v = Hmac::new(&k).chain(v).finalize();
        }

        let mut generator = NonceGenerator::new(curve, &BigUint::from_bytes_be(&x), &E);
        for _ in 0..4 {
            v = Hmac::new(&k).chain(v).finalize();
            let expected = BigUint::from_bytes_be(&v) % curve.order();
            assert_eq!(generator.next_nonce().unwrap(), expected);

            k = Hmac::new(&k).chain(v).chain([0x00]).finalize();
            v = Hmac::new(&k).chain(v).finalize();
        }
    }
}

//! Group operations on SM2 elliptic curves.
//!
//! Curves have the short Weierstrass form `y² = x³ + ax + b` over a prime
//! field `GF(p)` with a prime-order base point `G`. Arithmetic is carried out
//! on arbitrary-precision integers so that any 256-bit SM2 domain parameters
//! can be used, including the recommended curve from [GM/T 0003.5] and the
//! example curve from its Appendix A.
//!
//! [GM/T 0003.5]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#appendix-D

mod affine;
pub(crate) mod field;
mod projective;

pub use self::{affine::AffinePoint, projective::ProjectivePoint};

use self::field::FIELD_SIZE;
use crate::{Error, FieldBytes, MAX_ATTEMPTS, Result};
use alloc::boxed::Box;
use hex_literal::hex;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;
use once_cell::race::OnceBox;
use rand_core::CryptoRngCore;

/// Domain parameters as big endian constants.
struct Constants {
    name: &'static str,
    p: FieldBytes,
    a: FieldBytes,
    b: FieldBytes,
    gx: FieldBytes,
    gy: FieldBytes,
    n: FieldBytes,
}

/// Recommended parameters: `sm2p256v1`.
///
/// ```text
/// p  = 0xFFFFFFFE FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF 00000000 FFFFFFFF FFFFFFFF
/// a  = p - 3
/// b  = 0x28E9FA9E 9D9F5E34 4D5A9E4B CF6509A7 F39789F5 15AB8F92 DDBCBD41 4D940E93
/// Gₓ = 0x32C4AE2C 1F198119 5F990446 6A39C994 8FE30BBF F2660BE1 715A4589 334C74C7
/// Gᵧ = 0xBC3736A2 F4F6779C 59BDCEE3 6B692153 D0A9877C C62A4740 02DF32E5 2139F0A0
/// n  = 0xFFFFFFFE FFFFFFFF FFFFFFFF FFFFFFFF 7203DF6B 21C6052B 53BBF409 39D54123
/// ```
const SM2P256V1: Constants = Constants {
    name: "sm2p256v1",
    p: hex!("FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00000000FFFFFFFFFFFFFFFF"),
    a: hex!("FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00000000FFFFFFFFFFFFFFFC"),
    b: hex!("28E9FA9E9D9F5E344D5A9E4BCF6509A7F39789F515AB8F92DDBCBD414D940E93"),
    gx: hex!("32C4AE2C1F1981195F9904466A39C9948FE30BBFF2660BE1715A4589334C74C7"),
    gy: hex!("BC3736A2F4F6779C59BDCEE36B692153D0A9877CC62A474002DF32E52139F0A0"),
    n: hex!("FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFF7203DF6B21C6052B53BBF40939D54123"),
};

/// Example curve over `GF(p)` with 256-bit `p`, GM/T 0003.5 Appendix A.
const SM2_EXAMPLE: Constants = Constants {
    name: "sm2-example-fp256",
    p: hex!("8542D69E4C044F18E8B92435BF6FF7DE457283915C45517D722EDB8B08F1DFC3"),
    a: hex!("787968B4FA32C3FD2417842E73BBFEFF2F3C848B6831D7E0EC65228B3937E498"),
    b: hex!("63E4C6D3B23B0C849CF84241484BFE48F61D59A5B16BA06E6E12D1DA27C5249A"),
    gx: hex!("421DEBD61B62EAB6746434EBC3CC315E32220B3BADD50BDC4C4E6C147FEDD43D"),
    gy: hex!("0680512BCBB42C07D47349D2153B70C4E5D7FDFCBFA36EA1A85841B9E46E09A2"),
    n: hex!("8542D69E4C044F18E8B92435BF6FF7DD297720630485628D5AE74EE7C32E79B7"),
};

/// SM2 elliptic curve domain parameters.
///
/// Values are immutable once built. The named parameter sets are built on
/// first use and shared as `&'static` references.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CurveParams {
    name: &'static str,
    p: BigUint,
    a: BigUint,
    b: BigUint,
    generator: AffinePoint,
    n: BigUint,
}

impl CurveParams {
    /// Validate and build a set of domain parameters.
    ///
    /// `p` and `n` must be odd, greater than 3 and at most 256 bits long;
    /// `a` and `b` must be reduced modulo `p` and describe a non-singular
    /// curve; the generator must lie on it.
    pub fn new(
        name: &'static str,
        p: BigUint,
        a: BigUint,
        b: BigUint,
        generator: (BigUint, BigUint),
        n: BigUint,
    ) -> Result<Self> {
        let three = BigUint::from(3u8);
        for modulus in [&p, &n] {
            if modulus <= &three || modulus.is_even() || modulus.bits() > 256 {
                return Err(Error::InvalidParams);
            }
        }

        if a >= p || b >= p {
            return Err(Error::InvalidParams);
        }

        // 4a³ + 27b² ≢ 0 (mod p)
        let disc = field::add(
            &field::mul(&BigUint::from(4u8), &a.modpow(&three, &p), &p),
            &field::mul(&BigUint::from(27u8), &field::mul(&b, &b, &p), &p),
            &p,
        );
        if disc.is_zero() {
            return Err(Error::InvalidParams);
        }

        let (gx, gy) = generator;
        let curve = Self {
            name,
            p,
            a,
            b,
            generator: AffinePoint::new(gx, gy),
            n,
        };

        if !curve.is_on_curve(&curve.generator) {
            return Err(Error::InvalidPoint);
        }

        Ok(curve)
    }

    /// The recommended SM2 curve `sm2p256v1` (used by OpenSSL and GmSSL).
    pub fn sm2() -> &'static Self {
        static CURVE: OnceBox<CurveParams> = OnceBox::new();
        CURVE.get_or_init(|| Box::new(Self::from_constants(&SM2P256V1)))
    }

    /// The 256-bit prime field example curve from GM/T 0003.5 Appendix A.
    ///
    /// This curve reproduces the worked examples in the standard. It is not
    /// meant for production use.
    pub fn sm2_example() -> &'static Self {
        static CURVE: OnceBox<CurveParams> = OnceBox::new();
        CURVE.get_or_init(|| Box::new(Self::from_constants(&SM2_EXAMPLE)))
    }

    fn from_constants(c: &Constants) -> Self {
        Self {
            name: c.name,
            p: field::from_bytes(&c.p),
            a: field::from_bytes(&c.a),
            b: field::from_bytes(&c.b),
            generator: AffinePoint::new(field::from_bytes(&c.gx), field::from_bytes(&c.gy)),
            n: field::from_bytes(&c.n),
        }
    }

    /// Name of this parameter set.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Field modulus `p`.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Curve coefficient `a`.
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// Curve coefficient `b`.
    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// Base point `G`.
    pub fn generator(&self) -> &AffinePoint {
        &self.generator
    }

    /// Order `n` of the base point (the scalar modulus).
    pub fn order(&self) -> &BigUint {
        &self.n
    }

    /// Number of bytes needed to encode a scalar, `ceil(qlen / 8)`.
    pub fn scalar_len(&self) -> usize {
        self.n.to_bytes_be().len()
    }

    /// Check that `d` is usable as an SM2 secret key: `d ∈ [1, n-2]`.
    ///
    /// `d = n-1` is excluded because signing needs `(1 + d)⁻¹ mod n`.
    pub fn check_secret_scalar(&self, d: &BigUint) -> Result<()> {
        if d.is_zero() || d + 1u8 >= self.n {
            return Err(Error::InvalidScalar);
        }
        Ok(())
    }

    /// Sample a scalar uniformly from `[1, n-1]` by rejection.
    pub fn random_scalar<R: CryptoRngCore + ?Sized>(&self, rng: &mut R) -> Result<BigUint> {
        let order = self.n.to_bytes_be();
        let len = order.len();
        let mask = order.first().map_or(0, |top| 0xffu8 >> top.leading_zeros());
        let mut buf = [0u8; FIELD_SIZE];

        for _ in 0..MAX_ATTEMPTS {
            let bytes = &mut buf[..len];
            rng.try_fill_bytes(bytes).map_err(|_| Error::Rng)?;
            if let Some(top) = bytes.first_mut() {
                *top &= mask;
            }

            let k = field::from_bytes(bytes);
            if !k.is_zero() && k < self.n {
                return Ok(k);
            }
        }

        Err(Error::RetryLimit)
    }
}

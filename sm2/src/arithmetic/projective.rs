//! Jacobian projective points and scalar multiplication.

use super::{AffinePoint, CurveParams, field};
use crate::Result;
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Point in Jacobian coordinates `(X, Y, Z)`, standing for the affine point
/// `(X/Z², Y/Z³)`.
///
/// `Z = 0` is the point at infinity. Coordinates are kept reduced modulo
/// `p`. Representations are not unique, so compare points after
/// [`CurveParams::to_affine`].
#[derive(Clone, Debug)]
pub struct ProjectivePoint {
    x: BigUint,
    y: BigUint,
    z: BigUint,
}

impl ProjectivePoint {
    /// The point at infinity, `(1, 1, 0)`.
    pub fn identity() -> Self {
        Self {
            x: BigUint::one(),
            y: BigUint::one(),
            z: BigUint::zero(),
        }
    }

    /// Is this the point at infinity?
    pub fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    /// Jacobian `X` coordinate.
    pub fn x(&self) -> &BigUint {
        &self.x
    }

    /// Jacobian `Y` coordinate.
    pub fn y(&self) -> &BigUint {
        &self.y
    }

    /// Jacobian `Z` coordinate.
    pub fn z(&self) -> &BigUint {
        &self.z
    }
}

impl From<&AffinePoint> for ProjectivePoint {
    fn from(point: &AffinePoint) -> Self {
        if point.is_identity() {
            return Self::identity();
        }

        Self {
            x: point.x().clone(),
            y: point.y().clone(),
            z: BigUint::one(),
        }
    }
}

impl From<AffinePoint> for ProjectivePoint {
    fn from(point: AffinePoint) -> Self {
        Self::from(&point)
    }
}

impl CurveParams {
    /// Point doubling `2P`.
    ///
    /// Uses the `dbl-2007-bl` formulas, which hold for any coefficient `a`.
    pub fn double(&self, point: &ProjectivePoint) -> ProjectivePoint {
        let p = &self.p;
        let ProjectivePoint { x, y, z } = point;

        if z.is_zero() || (y % p).is_zero() {
            return ProjectivePoint::identity();
        }

        let xx = field::mul(x, x, p);
        let yy = field::mul(y, y, p);
        let yyyy = field::mul(&yy, &yy, p);
        let zz = field::mul(z, z, p);

        // S = 4·X·YY
        let s = field::mul(&BigUint::from(4u8), &field::mul(x, &yy, p), p);
        // M = 3·XX + a·ZZ²
        let m = field::add(
            &field::mul(&BigUint::from(3u8), &xx, p),
            &field::mul(&self.a, &field::mul(&zz, &zz, p), p),
            p,
        );

        // X₃ = M² - 2S
        let x3 = field::sub(&field::mul(&m, &m, p), &field::add(&s, &s, p), p);
        // Y₃ = M·(S - X₃) - 8·YYYY
        let y3 = field::sub(
            &field::mul(&m, &field::sub(&s, &x3, p), p),
            &field::mul(&BigUint::from(8u8), &yyyy, p),
            p,
        );
        // Z₃ = 2·Y·Z
        let z3 = field::mul(&BigUint::from(2u8), &field::mul(y, z, p), p);

        ProjectivePoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Point addition `P + Q`.
    ///
    /// Uses the `add-2007-bl` formulas. Falls back to [`CurveParams::double`]
    /// when both inputs are the same affine point, and returns the identity
    /// when they are inverses of each other.
    pub fn add(&self, lhs: &ProjectivePoint, rhs: &ProjectivePoint) -> ProjectivePoint {
        if lhs.is_identity() {
            return rhs.clone();
        }
        if rhs.is_identity() {
            return lhs.clone();
        }

        let p = &self.p;
        let z1z1 = field::mul(&lhs.z, &lhs.z, p);
        let z2z2 = field::mul(&rhs.z, &rhs.z, p);
        let u1 = field::mul(&lhs.x, &z2z2, p);
        let u2 = field::mul(&rhs.x, &z1z1, p);
        let s1 = field::mul(&field::mul(&lhs.y, &rhs.z, p), &z2z2, p);
        let s2 = field::mul(&field::mul(&rhs.y, &lhs.z, p), &z1z1, p);

        let h = field::sub(&u2, &u1, p);
        if h.is_zero() {
            return if s1 == s2 {
                self.double(lhs)
            } else {
                ProjectivePoint::identity()
            };
        }

        // I = (2H)², J = H·I, r = 2(S₂ - S₁), V = U₁·I
        let h2 = field::add(&h, &h, p);
        let i = field::mul(&h2, &h2, p);
        let j = field::mul(&h, &i, p);
        let r = field::mul(&BigUint::from(2u8), &field::sub(&s2, &s1, p), p);
        let v = field::mul(&u1, &i, p);

        // X₃ = r² - J - 2V
        let x3 = field::sub(
            &field::sub(&field::mul(&r, &r, p), &j, p),
            &field::add(&v, &v, p),
            p,
        );
        // Y₃ = r·(V - X₃) - 2·S₁·J
        let s1j = field::mul(&s1, &j, p);
        let y3 = field::sub(
            &field::mul(&r, &field::sub(&v, &x3, p), p),
            &field::add(&s1j, &s1j, p),
            p,
        );
        // Z₃ = 2·Z₁·Z₂·H
        let z3 = field::mul(&field::mul(&lhs.z, &rhs.z, p), &h2, p);

        ProjectivePoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Convert to affine coordinates with a single inversion modulo `p`.
    ///
    /// Returns [`Error::NotInvertible`][crate::Error::NotInvertible] when a
    /// non-zero `Z` has no inverse modulo `p`, which needs a composite `p`.
    pub fn to_affine(&self, point: &ProjectivePoint) -> Result<AffinePoint> {
        if point.is_identity() {
            return Ok(AffinePoint::identity());
        }

        let p = &self.p;
        let z_inv = field::mod_inverse(&point.z, p)?;
        let z_inv2 = field::mul(&z_inv, &z_inv, p);
        let z_inv3 = field::mul(&z_inv2, &z_inv, p);
        Ok(AffinePoint::new(
            field::mul(&point.x, &z_inv2, p),
            field::mul(&point.y, &z_inv3, p),
        ))
    }

    /// Scalar multiplication `[k]P` in Jacobian coordinates.
    ///
    /// Binary double-and-add from the least significant bit of `k mod n`.
    /// Not constant time.
    pub fn mul_projective(&self, point: &ProjectivePoint, k: &BigUint) -> ProjectivePoint {
        let k = k % &self.n;
        let mut acc = ProjectivePoint::identity();
        if k.is_zero() || point.is_identity() {
            return acc;
        }

        let bits = k.bits();
        let mut addend = point.clone();
        for i in 0..bits {
            if k.bit(i) {
                acc = self.add(&acc, &addend);
            }
            if i + 1 < bits {
                addend = self.double(&addend);
            }
        }

        acc
    }

    /// Scalar multiplication `[k]P`, returned in affine coordinates.
    ///
    /// The identity is returned when `k ≡ 0 (mod n)` or `P` is the identity.
    pub fn mul(&self, point: &AffinePoint, k: &BigUint) -> Result<AffinePoint> {
        self.to_affine(&self.mul_projective(&ProjectivePoint::from(point), k))
    }

    /// Scalar multiplication by the base point, `[k]G`.
    pub fn mul_generator(&self, k: &BigUint) -> Result<AffinePoint> {
        self.mul(&self.generator, k)
    }
}

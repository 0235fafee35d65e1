//! Affine curve points.

use super::{CurveParams, field};
use crate::{Error, FieldBytes, Result};
use num_bigint::BigUint;
use num_traits::Zero;

/// Point on an SM2 curve in affine coordinates, or the point at infinity.
///
/// The point at infinity is represented with zeroed coordinates and an
/// explicit flag, so equal points always compare equal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AffinePoint {
    x: BigUint,
    y: BigUint,
    infinity: bool,
}

impl AffinePoint {
    /// The point at infinity, the identity of the group.
    pub fn identity() -> Self {
        Self {
            x: BigUint::zero(),
            y: BigUint::zero(),
            infinity: true,
        }
    }

    /// Finite point from coordinates. Not checked against any curve.
    pub(crate) fn new(x: BigUint, y: BigUint) -> Self {
        Self {
            x,
            y,
            infinity: false,
        }
    }

    /// Is this the point at infinity?
    pub fn is_identity(&self) -> bool {
        self.infinity
    }

    /// Affine `x` coordinate (zero for the identity).
    pub fn x(&self) -> &BigUint {
        &self.x
    }

    /// Affine `y` coordinate (zero for the identity).
    pub fn y(&self) -> &BigUint {
        &self.y
    }

    /// Big endian encoding of the `x` coordinate.
    pub fn x_bytes(&self) -> FieldBytes {
        field::to_bytes(&self.x)
    }

    /// Big endian encoding of the `y` coordinate.
    pub fn y_bytes(&self) -> FieldBytes {
        field::to_bytes(&self.y)
    }
}

impl CurveParams {
    /// Build a point from affine coordinates, checking that it is on the curve.
    pub fn point(&self, x: BigUint, y: BigUint) -> Result<AffinePoint> {
        let point = AffinePoint::new(x, y);
        if self.is_on_curve(&point) {
            Ok(point)
        } else {
            Err(Error::InvalidPoint)
        }
    }

    /// Does `point` satisfy `y² ≡ x³ + ax + b (mod p)` with reduced
    /// coordinates?
    ///
    /// The identity has no affine coordinates and is reported as not on the
    /// curve.
    pub fn is_on_curve(&self, point: &AffinePoint) -> bool {
        if point.infinity || point.x >= self.p || point.y >= self.p {
            return false;
        }

        let p = &self.p;
        let (x, y) = (&point.x, &point.y);
        let lhs = field::mul(y, y, p);
        let x3 = field::mul(&field::mul(x, x, p), x, p);
        let rhs = field::add(&field::add(&x3, &field::mul(&self.a, x, p), p), &self.b, p);
        lhs == rhs
    }

    /// `-P = (x, -y)`.
    pub fn neg(&self, point: &AffinePoint) -> AffinePoint {
        if point.infinity {
            return AffinePoint::identity();
        }
        AffinePoint::new(point.x.clone(), field::neg(&point.y, &self.p))
    }

    /// Affine chord-and-tangent addition `P + Q`.
    ///
    /// Costs one inversion modulo `p`. Points with equal `x` and opposite `y`
    /// sum to the identity; equal points use the tangent slope.
    pub fn add_affine(&self, lhs: &AffinePoint, rhs: &AffinePoint) -> Result<AffinePoint> {
        if lhs.infinity {
            return Ok(rhs.clone());
        }
        if rhs.infinity {
            return Ok(lhs.clone());
        }

        let p = &self.p;
        let (x1, y1) = (&lhs.x, &lhs.y);
        let (x2, y2) = (&rhs.x, &rhs.y);

        let lambda = if field::sub(x1, x2, p).is_zero() {
            if field::add(y1, y2, p).is_zero() {
                return Ok(AffinePoint::identity());
            }

            // λ = (3x₁² + a) / 2y₁
            let xx = field::mul(x1, x1, p);
            let num = field::add(&field::mul(&BigUint::from(3u8), &xx, p), &self.a, p);
            let den = field::add(y1, y1, p);
            field::mul(&num, &field::mod_inverse(&den, p)?, p)
        } else {
            // λ = (y₂ - y₁) / (x₂ - x₁)
            let num = field::sub(y2, y1, p);
            let den = field::sub(x2, x1, p);
            field::mul(&num, &field::mod_inverse(&den, p)?, p)
        };

        // x₃ = λ² - x₁ - x₂, y₃ = λ(x₁ - x₃) - y₁
        let x3 = field::sub(&field::sub(&field::mul(&lambda, &lambda, p), x1, p), x2, p);
        let y3 = field::sub(&field::mul(&lambda, &field::sub(x1, &x3, p), p), y1, p);
        Ok(AffinePoint::new(x3, y3))
    }
}

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Affine point with arbitrary-precision coordinates.
///
/// The curve a point lives on is not part of the value; every operation goes
/// through a curve (see [`crate::CurveArithmetic`]). For short Weierstrass
/// curves `is_infinity` marks the identity, twisted Edwards curves use the
/// regular point `(0, 1)` instead and never set the flag.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Affine {
    /// The x-coordinate, reduced modulo the base field.
    pub x: BigUint,
    /// The y-coordinate, reduced modulo the base field.
    pub y: BigUint,
    /// Whether this point is the point at infinity (identity element)
    pub is_infinity: bool,
}

impl Affine {
    /// Create a new finite affine point.
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Affine {
            x,
            y,
            is_infinity: false,
        }
    }

    /// The point at infinity. Its coordinates are `(0, 0)`.
    pub fn infinity() -> Self {
        Affine {
            x: BigUint::zero(),
            y: BigUint::zero(),
            is_infinity: true,
        }
    }

    /// Build a point from small coordinates; mostly useful in tests.
    pub fn from_u64(x: u64, y: u64) -> Self {
        Affine::new(BigUint::from(x), BigUint::from(y))
    }

    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.is_infinity
    }
}

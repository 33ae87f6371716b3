use curve::{random_point, Affine, CurveArithmetic};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::Rng;

use crate::engine::ConstraintSystem;
use crate::error::Result;
use crate::field::Field;
use crate::limbs::Field3;
use crate::provable::{check_len, Provable};

/// An affine point with foreign coordinates.
///
/// Gadgets never produce the Weierstrass point at infinity. The constant
/// `(0, 0)` stands in for it when converting from and to [`Affine`], and as
/// the placeholder entry of a point table.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub x: Field3,
    pub y: Field3,
}

impl Point {
    pub fn new(x: Field3, y: Field3) -> Self {
        Point { x, y }
    }

    /// Constant point. Infinity maps to `(0, 0)`.
    pub fn from_affine(p: &Affine) -> Result<Self> {
        if p.is_infinity() {
            return Ok(Point::new(Field3::zero(), Field3::zero()));
        }
        Ok(Point::new(Field3::from_bigint(&p.x)?, Field3::from_bigint(&p.y)?))
    }

    /// The constant value, or `None` for a variable point.
    pub fn to_affine(&self) -> Option<Affine> {
        Some(to_affine(self.x.to_bigint()?, self.y.to_bigint()?))
    }

    /// Value under the current witness.
    pub fn value<CS: ConstraintSystem>(&self, cs: &CS) -> Affine {
        to_affine(self.x.value(cs), self.y.value(cs))
    }

    /// Witnesses both coordinates without range checks.
    pub fn witness<CS: ConstraintSystem>(cs: &mut CS, compute: impl FnOnce(&CS) -> Affine) -> Self {
        let [x, y] = Field3::witness_many(cs, |cs| {
            let p = compute(cs);
            [p.x, p.y]
        });
        Point { x, y }
    }

    /// A random point of the prime-order subgroup, as a constant.
    pub fn random<C: CurveArithmetic + ?Sized, R: Rng + ?Sized>(curve: &C, rng: &mut R) -> Result<Self> {
        Point::from_affine(&random_point(curve, rng))
    }

    pub fn is_constant(&self) -> bool {
        self.x.is_constant() && self.y.is_constant()
    }
}

fn to_affine(x: BigUint, y: BigUint) -> Affine {
    if x.is_zero() && y.is_zero() {
        Affine::infinity()
    } else {
        Affine::new(x, y)
    }
}

impl Provable for Point {
    const SIZE: usize = 6;

    fn to_fields(&self) -> Vec<Field> {
        self.x.0.iter().chain(self.y.0.iter()).cloned().collect()
    }

    fn from_fields(fields: &[Field]) -> Result<Self> {
        check_len(fields, Self::SIZE)?;
        Ok(Point {
            x: Field3::from_fields(&fields[..3])?,
            y: Field3::from_fields(&fields[3..])?,
        })
    }

    fn is_constant(&self) -> bool {
        Point::is_constant(self)
    }
}

//! Point gadgets for short Weierstrass curves `y² = x³ + a·x + b`.
//!
//! Points are affine and never the point at infinity. Addition and doubling
//! witness the slope `m` and the result, then prove three identities modulo
//! `f`:
//!
//! ```text
//! add:    (x1 - x2)·m = y1 - y2     m² = x1 + x2 + x3     (x1 - x3)·m = y1 + y3
//! double:      2y1·m = 3x1² + a     m² = 2x1 + x3         (x1 - x3)·m = y1 + y3
//! ```

use curve::{initial_aggregator, Affine, CurveArithmetic, Endomorphism, WeierstrassCurve};
use ff::Field as _;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::basic::{assert_not_equals, assert_not_vector_equals};
use crate::config::MsmMode;
use crate::engine::ConstraintSystem;
use crate::error::{GadgetError, Result};
use crate::field::{fp_from_biguint, Fp};
use crate::foreign_field::{self, assert_almost_reduced, assert_mul};
use crate::limbs::{Field3, TWO_LIMB_BITS, TWO_LIMB_MASK};
use crate::msm::CurveGadget;
use crate::point::Point;
use crate::sum::ForeignSum;

/// Curve gadgets compare limbs against `f` and `2f` and need `f > 2^176`.
pub(crate) fn check_curve_modulus(f: &BigUint) -> Result<()> {
    if f.bits() <= TWO_LIMB_BITS as u64 {
        return Err(GadgetError::ModulusTooSmall);
    }
    Ok(())
}

/// `p1 + p2`.
///
/// Requires `x1 ≠ x2`; use [`double`] for equal points. `p1 = -p2` leaves
/// the circuit unsatisfiable, since `x1 - x2` is proven to be none of `0`,
/// `f` and `2f`.
pub fn add<CS: ConstraintSystem>(
    cs: &mut CS,
    curve: &WeierstrassCurve,
    p1: &Point,
    p2: &Point,
) -> Result<Point> {
    if let (Some(a), Some(b)) = (p1.to_affine(), p2.to_affine()) {
        return Point::from_affine(&curve.add(&a, &b));
    }
    let f = curve.modulus();
    check_curve_modulus(f)?;
    let field = curve.base_field();
    let Point { x: x1, y: y1 } = p1;
    let Point { x: x2, y: y2 } = p2;

    let [m, x3, y3] = Field3::witness_many(cs, |cs| {
        let (x1, y1) = (x1.value(cs), y1.value(cs));
        let (x2, y2) = (x2.value(cs), y2.value(cs));
        let m = field
            .div(&field.sub(&y1, &y2), &field.sub(&x1, &x2))
            .unwrap_or_default();
        let x3 = field.sub(&field.sub(&field.square(&m), &x1), &x2);
        let y3 = field.sub(&field.mul(&m, &field.sub(&x1, &x3)), &y1);
        [m, x3, y3]
    });
    assert_almost_reduced(cs, &[m.clone(), x3.clone(), y3.clone()], f, false)?;

    // x1, x2 almost reduced, so x1 - x2 + f < 3f
    let delta_x = foreign_field::sub(cs, x1, x2, f)?;
    let low = [delta_x.low(), delta_x.0[2].clone()];
    let f01 = fp_from_biguint(&(f & &*TWO_LIMB_MASK));
    let f2 = fp_from_biguint(&(f >> TWO_LIMB_BITS));
    let two_f2 = fp_from_biguint(&((f * 2u32) >> TWO_LIMB_BITS));
    assert_not_vector_equals(cs, &low, &[Fp::ZERO; 2])?;
    assert_not_vector_equals(cs, &low, &[f01, f2])?;
    assert_not_equals(cs, &delta_x.0[2], two_f2)?;

    let delta_y = ForeignSum::new(y1.clone()).sub(y2.clone());
    assert_mul(cs, &delta_x, &m, delta_y, f, None)?;

    let x_sum = ForeignSum::new(x1.clone()).add(x2.clone()).add(x3.clone());
    assert_mul(cs, &m, &m, x_sum, f, None)?;

    let delta_x13 = ForeignSum::new(x1.clone()).sub(x3.clone());
    let y_sum = ForeignSum::new(y1.clone()).add(y3.clone());
    assert_mul(cs, delta_x13, &m, y_sum, f, None)?;

    Ok(Point::new(x3, y3))
}

/// `2·p`. Requires `y ≠ 0`, which holds for points of odd order.
pub fn double<CS: ConstraintSystem>(cs: &mut CS, curve: &WeierstrassCurve, p: &Point) -> Result<Point> {
    if let Some(a) = p.to_affine() {
        return Point::from_affine(&curve.double(&a));
    }
    let f = curve.modulus();
    check_curve_modulus(f)?;
    let field = curve.base_field();
    let Point { x: x1, y: y1 } = p;

    let [m, x3, y3] = Field3::witness_many(cs, |cs| {
        let (x1, y1) = (x1.value(cs), y1.value(cs));
        let numerator = field.add(&field.mul(&BigUint::from(3u32), &field.square(&x1)), &curve.a);
        let m = field
            .div(&numerator, &field.add(&y1, &y1))
            .unwrap_or_default();
        let x3 = field.sub(&field.square(&m), &field.add(&x1, &x1));
        let y3 = field.sub(&field.mul(&m, &field.sub(&x1, &x3)), &y1);
        [m, x3, y3]
    });
    assert_almost_reduced(cs, &[m.clone(), x3.clone(), y3.clone()], f, false)?;

    let x1x1 = foreign_field::mul(cs, x1, x1, f)?;

    let two_y1 = ForeignSum::new(y1.clone()).add(y1.clone());
    let mut rhs = ForeignSum::new(x1x1.clone()).add(x1x1.clone()).add(x1x1);
    if !curve.a.is_zero() {
        rhs = rhs.add(Field3::from_bigint(&curve.a)?);
    }
    assert_mul(cs, two_y1, &m, rhs, f, None)?;

    let x_sum = ForeignSum::new(x1.clone()).add(x1.clone()).add(x3.clone());
    assert_mul(cs, &m, &m, x_sum, f, None)?;

    let delta_x13 = ForeignSum::new(x1.clone()).sub(x3.clone());
    let y_sum = ForeignSum::new(y1.clone()).add(y3.clone());
    assert_mul(cs, delta_x13, &m, y_sum, f, None)?;

    Ok(Point::new(x3, y3))
}

pub fn negate<CS: ConstraintSystem>(cs: &mut CS, curve: &WeierstrassCurve, p: &Point) -> Result<Point> {
    let y = foreign_field::negate(cs, &p.y, curve.modulus())?;
    Ok(Point::new(p.x.clone(), y))
}

/// Proves `(x² + a)·x = y² - b`.
///
/// `x²`, `x` and `y` are proven almost reduced first; otherwise the identity
/// could be met modulo a larger multiple of `f`.
pub fn assert_on_curve<CS: ConstraintSystem>(
    cs: &mut CS,
    curve: &WeierstrassCurve,
    p: &Point,
) -> Result<()> {
    let f = curve.modulus();
    let Point { x, y } = p;
    let x2 = foreign_field::mul(cs, x, x, f)?;
    assert_almost_reduced(cs, &[x2.clone(), x.clone(), y.clone()], f, false)?;

    let y2 = foreign_field::mul(cs, y, y, f)?;
    let y2_minus_b = ForeignSum::new(y2).sub(Field3::from_bigint(&curve.b)?);
    let mut x2_plus_a = ForeignSum::new(x2);
    if !curve.a.is_zero() {
        x2_plus_a = x2_plus_a.add(Field3::from_bigint(&curve.a)?);
    }

    let message = p.to_affine().map(|a| {
        format!(
            "assert_on_curve: ({:#x}, {:#x}) is not on the curve",
            a.x, a.y
        )
    });
    assert_mul(cs, x2_plus_a, x, y2_minus_b, f, message.as_deref())
}

impl CurveGadget for WeierstrassCurve {
    fn add_gadget<CS: ConstraintSystem>(&self, cs: &mut CS, p: &Point, q: &Point) -> Result<Point> {
        add(cs, self, p, q)
    }

    fn double_gadget<CS: ConstraintSystem>(&self, cs: &mut CS, p: &Point) -> Result<Point> {
        double(cs, self, p)
    }

    fn negate_gadget<CS: ConstraintSystem>(&self, cs: &mut CS, p: &Point) -> Result<Point> {
        negate(cs, self, p)
    }

    fn assert_on_curve_gadget<CS: ConstraintSystem>(&self, cs: &mut CS, p: &Point) -> Result<()> {
        assert_on_curve(cs, self, p)
    }

    fn msm_start(&self, ia: Option<&Affine>) -> Option<Affine> {
        Some(ia.cloned().unwrap_or_else(|| initial_aggregator(self)))
    }

    fn default_mode(&self) -> Option<MsmMode> {
        Some(MsmMode::AssertNonZero)
    }

    fn endomorphism(&self) -> Option<&Endomorphism> {
        self.endomorphism.as_ref()
    }

    fn scale_constant(&self, p: &Affine, k: &BigUint) -> Affine {
        self.scale_projective(p, k)
    }
}

//! Point gadgets for twisted Edwards curves `a·x² + y² = 1 + d·x²·y²`.
//!
//! The addition law is complete, so a sum is computed directly with foreign
//! multiplications and two divisions:
//!
//! ```text
//! x3 = (x1·y2 + y1·x2) / (1 + d·x1·x2·y1·y2)
//! y3 = (y1·y2 - a·x1·x2) / (1 - d·x1·x2·y1·y2)
//! ```

use curve::{Affine, CurveArithmetic, TwistedEdwardsCurve};

use crate::config::MsmMode;
use crate::elliptic_curve::check_curve_modulus;
use crate::engine::ConstraintSystem;
use crate::error::Result;
use crate::foreign_field::{self, assert_almost_reduced, assert_mul, div, mul};
use crate::limbs::Field3;
use crate::msm::CurveGadget;
use crate::point::Point;

pub fn add<CS: ConstraintSystem>(
    cs: &mut CS,
    curve: &TwistedEdwardsCurve,
    p1: &Point,
    p2: &Point,
) -> Result<Point> {
    if let (Some(a), Some(b)) = (p1.to_affine(), p2.to_affine()) {
        return Point::from_affine(&curve.add(&a, &b));
    }
    let f = curve.modulus();
    check_curve_modulus(f)?;
    let Point { x: x1, y: y1 } = p1;
    let Point { x: x2, y: y2 } = p2;
    let a = Field3::from_bigint(&curve.a)?;
    let d = Field3::from_bigint(&curve.d)?;
    let one = Field3::one();

    let x1x2 = mul(cs, x1, x2, f)?;
    let y1y2 = mul(cs, y1, y2, f)?;
    let x1y2 = mul(cs, x1, y2, f)?;
    let y1x2 = mul(cs, y1, x2, f)?;
    let a_x1x2 = mul(cs, &a, &x1x2, f)?;

    let x3_num = foreign_field::add(cs, &x1y2, &y1x2, f)?;
    let y3_num = foreign_field::sub(cs, &y1y2, &a_x1x2, f)?;

    let x1x2y1y2 = mul(cs, &x1x2, &y1y2, f)?;
    let d_x1x2y1y2 = mul(cs, &d, &x1x2y1y2, f)?;
    let x3_den = foreign_field::add(cs, &one, &d_x1x2y1y2, f)?;
    let y3_den = foreign_field::sub(cs, &one, &d_x1x2y1y2, f)?;

    let x3 = div(cs, &x3_num, &x3_den, f, false)?;
    let y3 = div(cs, &y3_num, &y3_den, f, false)?;

    assert_almost_reduced(
        cs,
        &[x1x2, y1y2, x3_num, y3_num, x1x2y1y2, x3_den, y3_den, x3.clone(), y3.clone()],
        f,
        false,
    )?;
    Ok(Point::new(x3, y3))
}

/// `2·p`, the addition formula with both inputs equal.
pub fn double<CS: ConstraintSystem>(cs: &mut CS, curve: &TwistedEdwardsCurve, p: &Point) -> Result<Point> {
    if let Some(a) = p.to_affine() {
        return Point::from_affine(&curve.double(&a));
    }
    let f = curve.modulus();
    check_curve_modulus(f)?;
    let Point { x: x1, y: y1 } = p;
    let a = Field3::from_bigint(&curve.a)?;
    let d = Field3::from_bigint(&curve.d)?;
    let one = Field3::one();

    let x1x1 = mul(cs, x1, x1, f)?;
    let y1y1 = mul(cs, y1, y1, f)?;
    let x1y1 = mul(cs, x1, y1, f)?;
    let a_x1x1 = mul(cs, &a, &x1x1, f)?;

    let x3_num = foreign_field::add(cs, &x1y1, &x1y1, f)?;
    let y3_num = foreign_field::sub(cs, &y1y1, &a_x1x1, f)?;

    let x1x1y1y1 = mul(cs, &x1x1, &y1y1, f)?;
    let d_x1x1y1y1 = mul(cs, &d, &x1x1y1y1, f)?;
    let x3_den = foreign_field::add(cs, &one, &d_x1x1y1y1, f)?;
    let y3_den = foreign_field::sub(cs, &one, &d_x1x1y1y1, f)?;

    let x3 = div(cs, &x3_num, &x3_den, f, false)?;
    let y3 = div(cs, &y3_num, &y3_den, f, false)?;

    assert_almost_reduced(
        cs,
        &[x1x1, y1y1, x3_num, y3_num, x1x1y1y1, x3_den, y3_den, x3.clone(), y3.clone()],
        f,
        false,
    )?;
    Ok(Point::new(x3, y3))
}

/// `(-x, y)`
pub fn negate<CS: ConstraintSystem>(cs: &mut CS, curve: &TwistedEdwardsCurve, p: &Point) -> Result<Point> {
    let x = foreign_field::negate(cs, &p.x, curve.modulus())?;
    Ok(Point::new(x, p.y.clone()))
}

/// Proves `(d·x²)·y² = a·x² + y² - 1`.
pub fn assert_on_curve<CS: ConstraintSystem>(
    cs: &mut CS,
    curve: &TwistedEdwardsCurve,
    p: &Point,
) -> Result<()> {
    let f = curve.modulus();
    let Point { x, y } = p;
    let a = Field3::from_bigint(&curve.a)?;
    let d = Field3::from_bigint(&curve.d)?;

    let x2 = mul(cs, x, x, f)?;
    let y2 = mul(cs, y, y, f)?;
    let a_x2 = mul(cs, &a, &x2, f)?;
    let lhs = foreign_field::add(cs, &a_x2, &y2, f)?;
    let minus_one = foreign_field::sub(cs, &lhs, &Field3::one(), f)?;
    let d_x2 = mul(cs, &d, &x2, f)?;

    assert_almost_reduced(cs, &[x2, x.clone(), y.clone()], f, false)?;
    assert_almost_reduced(cs, &[y2.clone(), minus_one.clone(), d_x2.clone()], f, false)?;

    let message = p.to_affine().map(|a| {
        format!(
            "assert_on_curve: ({:#x}, {:#x}) is not on the curve",
            a.x, a.y
        )
    });
    assert_mul(cs, &d_x2, &y2, &minus_one, f, message.as_deref())
}

impl CurveGadget for TwistedEdwardsCurve {
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

    fn msm_start(&self, _ia: Option<&Affine>) -> Option<Affine> {
        None
    }

    fn default_mode(&self) -> Option<MsmMode> {
        None
    }
}

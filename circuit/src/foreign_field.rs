//! Arithmetic modulo a foreign prime `f`.
//!
//! Elements are [`Field3`] values. Multiplication proves `x·y = q·f + r` over
//! the integers by checking it modulo `2^264` (limb equations with bounded
//! carries) and modulo the native modulus. Both checks together pin down the
//! integer identity as long as neither side can exceed `2^264 · p_native`,
//! which is verified from static operand bounds when the circuit is built:
//!
//! - a constant operand is bounded by its value,
//! - a variable operand is assumed almost reduced, `x2 <= f2`,
//! - a sum is bounded by its summands, every subtraction adding one `f`.
//!
//! Products are not almost reduced by themselves. Callers that feed a
//! product into another multiplication prove the bound with
//! [`assert_almost_reduced`].

use curve::FiniteField;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};
use tracing::trace;

use crate::basic::{self, mul as native_mul};
use crate::engine::ConstraintSystem;
use crate::error::{GadgetError, Result};
use crate::field::{fp_from_biguint, Bool, Field, NATIVE_MODULUS};
use crate::limbs::{
    combine, split, Field3, LIMB_BITS, LIMB_MASK, TWO_LIMB_BITS, TWO_LIMB_MASK, TWO_POW_264,
    TWO_2L, TWO_L,
};
use crate::range_check::{multi_range_check, range_check_batched, range_check_bits, range_check_field3};
use crate::sum::{almost_reduced_bound, operand_bound, single_add, sum, ForeignSum, Sign};

/// Moduli up to this many bits are supported.
pub const MAX_MODULUS_BITS: u64 = 259;

pub(crate) fn check_modulus(f: &BigUint) -> Result<()> {
    if f.is_zero() {
        return Err(GadgetError::OutOfRange("modulus must be positive".to_string()));
    }
    if f.bits() > MAX_MODULUS_BITS {
        return Err(GadgetError::ModulusTooLarge);
    }
    Ok(())
}

pub fn add<CS: ConstraintSystem>(cs: &mut CS, x: &Field3, y: &Field3, f: &BigUint) -> Result<Field3> {
    sum(cs, &[x.clone(), y.clone()], &[Sign::Plus], f)
}

pub fn sub<CS: ConstraintSystem>(cs: &mut CS, x: &Field3, y: &Field3, f: &BigUint) -> Result<Field3> {
    sum(cs, &[x.clone(), y.clone()], &[Sign::Minus], f)
}

pub fn negate<CS: ConstraintSystem>(cs: &mut CS, x: &Field3, f: &BigUint) -> Result<Field3> {
    sub(cs, &Field3::zero(), x, f)
}

/// `x · y mod f`.
///
/// Both operands must be almost reduced. The result is range checked and
/// canonical for an honest prover, but only bounded by `2^264`.
pub fn mul<CS: ConstraintSystem>(cs: &mut CS, x: &Field3, y: &Field3, f: &BigUint) -> Result<Field3> {
    check_modulus(f)?;
    if let (Some(a), Some(b)) = (x.to_bigint(), y.to_bigint()) {
        return Field3::from_bigint(&((a * b) % f));
    }
    let x_bound = operand_bound(x, f);
    let y_bound = operand_bound(y, f);
    mul_constraints(cs, x, y, Remainder::Witness, f, &x_bound, &y_bound)
}

/// `x mod f` for any range-checked `x < 2^264`, as a multiplication by one.
pub(crate) fn reduce<CS: ConstraintSystem>(cs: &mut CS, x: &Field3, f: &BigUint) -> Result<Field3> {
    check_modulus(f)?;
    if let Some(v) = x.to_bigint() {
        return Field3::from_bigint(&(v % f));
    }
    mul_constraints(
        cs,
        x,
        &Field3::one(),
        Remainder::Witness,
        f,
        &TWO_POW_264,
        &BigUint::from(2u32),
    )
}

enum Remainder<'a> {
    /// Witness `r = x·y mod f` and range check it.
    Witness,
    /// Prove the product equals this value, which the caller range checked.
    Given(&'a Field3),
}

/// The multiplication gadget.
///
/// With `f' = 2^264 - f`, the identity `x·y - q·f - r = 0 (mod 2^264)` reads
/// `x·y + q·f' - r`, whose limb products are
///
/// ```text
/// p0 = x0 y0 + q0 f'0
/// p1 = x0 y1 + x1 y0 + q0 f'1 + q1 f'0
/// p2 = x0 y2 + x1 y1 + x2 y0 + q0 f'2 + q1 f'1 + q2 f'0
/// ```
///
/// `p1` is split as `p10 + 2^88 p110 + 2^176 p111` and the two carry
/// equations are
///
/// ```text
/// p0 + 2^88 p10 - r0 - 2^88 r1             = 2^176 c0
/// p2 + p110 + 2^88 p111 + c0 - r2          = 2^88 (c10 + 2^88 c11)
/// ```
///
/// with `p111`, `c0` two-bit values, `c11` a three-bit value and
/// `p10, p110, c10` range checked together. `q` is range checked, with its
/// top limb cut down to the bits the static bound allows.
fn mul_constraints<CS: ConstraintSystem>(
    cs: &mut CS,
    x: &Field3,
    y: &Field3,
    remainder: Remainder<'_>,
    f: &BigUint,
    x_bound: &BigUint,
    y_bound: &BigUint,
) -> Result<Field3> {
    check_modulus(f)?;
    let native_bound = &*TWO_POW_264 * &*NATIVE_MODULUS;
    let product_bound = x_bound * y_bound;
    if product_bound > native_bound {
        return Err(GadgetError::ModulusTooLarge);
    }
    let q_max = (product_bound.max(BigUint::one()) - 1u32) / f;
    let q_bits = q_max.bits() as usize;
    let q2_bits = q_bits.saturating_sub(TWO_LIMB_BITS);
    if q2_bits > LIMB_BITS {
        return Err(GadgetError::ModulusTooLarge);
    }
    let r_bound = match &remainder {
        Remainder::Given(z) => z.to_bigint().map_or_else(|| TWO_POW_264.clone(), |v| v + 1u32),
        Remainder::Witness => TWO_POW_264.clone(),
    };
    let q_bound = BigUint::one() << (TWO_LIMB_BITS + q2_bits);
    if q_bound * f + r_bound > native_bound {
        return Err(GadgetError::ModulusTooLarge);
    }
    trace!(q_bits, q2_bits, "foreign multiplication bounds");

    let f_prime = &*TWO_POW_264 - f;
    let f_limbs = split(&f_prime);

    let r = match remainder {
        Remainder::Witness => {
            let r = Field3::witness(cs, |cs| (x.value(cs) * y.value(cs)) % f);
            range_check_field3(cs, &r)?;
            r
        }
        Remainder::Given(z) => z.clone(),
    };

    let [q0, q1, q2, p10, p110, p111_0, p111_1, c0_0, c0_1, c10, c11_0, c11_1, c11_2] =
        cs.exists(|cs| {
            let a = x.limb_values(cs);
            let b = y.limb_values(cs);
            let rl = r.limb_values(cs);
            let ab = combine(&a) * combine(&b);
            let rv = combine(&rl);
            let q = if ab >= rv { (ab - rv) / f } else { BigUint::zero() };
            let qs = split(&q);
            let fp = &f_limbs;

            let p0 = &a[0] * &b[0] + &qs[0] * &fp[0];
            let p1 = &a[0] * &b[1] + &a[1] * &b[0] + &qs[0] * &fp[1] + &qs[1] * &fp[0];
            let p2 = &a[0] * &b[2] + &a[1] * &b[1] + &a[2] * &b[0]
                + &qs[0] * &fp[2]
                + &qs[1] * &fp[1]
                + &qs[2] * &fp[0];
            let p10 = &p1 & &*LIMB_MASK;
            let p110 = (&p1 >> LIMB_BITS) & &*LIMB_MASK;
            let p111 = &p1 >> TWO_LIMB_BITS;

            let r01 = BigInt::from(&rl[0] + (&rl[1] << LIMB_BITS));
            let c0 = (BigInt::from(p0) + BigInt::from(&p10 << LIMB_BITS) - r01) >> TWO_LIMB_BITS;
            let c1 = (BigInt::from(p2)
                + BigInt::from(p110.clone())
                + BigInt::from(&p111 << LIMB_BITS)
                + &c0
                - BigInt::from(rl[2].clone()))
                >> LIMB_BITS;
            let c0 = c0.to_biguint().unwrap_or_default();
            let c1 = c1.to_biguint().unwrap_or_default();
            let c10 = &c1 & &*LIMB_MASK;
            let c11 = &c1 >> LIMB_BITS;
            let bit = |v: &BigUint, i: u64| BigInt::from(u8::from(v.bit(i)));

            [
                BigInt::from(qs[0].clone()),
                BigInt::from(qs[1].clone()),
                BigInt::from(qs[2].clone()),
                BigInt::from(p10),
                BigInt::from(p110),
                bit(&p111, 0),
                bit(&p111, 1),
                bit(&c0, 0),
                bit(&c0, 1),
                BigInt::from(c10),
                bit(&c11, 0),
                bit(&c11, 1),
                bit(&c11, 2),
            ]
        });

    for b in [&p111_0, &p111_1, &c0_0, &c0_1, &c11_0, &c11_1, &c11_2] {
        cs.enforce_boolean(b.lc());
    }
    let two = fp_from_biguint(&BigUint::from(2u32));
    let four = fp_from_biguint(&BigUint::from(4u32));
    let p111 = &p111_0 + &p111_1.scale(two);
    let c0 = &c0_0 + &c0_1.scale(two);
    let c11 = &c11_0 + &c11_1.scale(two) + c11_2.scale(four);

    let t = |cs: &mut CS, i: usize, j: usize| native_mul(cs, &x.0[i], &y.0[j]);
    let t00 = t(cs, 0, 0);
    let t01 = t(cs, 0, 1);
    let t10 = t(cs, 1, 0);
    let t02 = t(cs, 0, 2);
    let t11 = t(cs, 1, 1);
    let t20 = t(cs, 2, 0);
    let [fp0, fp1, fp2] = f_limbs.each_ref().map(fp_from_biguint);

    let p0 = t00 + q0.scale(fp0);
    let p1 = t01 + t10 + q0.scale(fp1) + q1.scale(fp0);
    let p2 = t02 + t11 + t20 + q0.scale(fp2) + q1.scale(fp1) + q2.scale(fp0);

    let p1_split = &p10 + &p110.scale(*TWO_L) + p111.scale(*TWO_2L);
    cs.enforce_equal(p1.lc(), p1_split.lc());

    let low = p0 + p10.scale(*TWO_L) - &r.0[0] - r.0[1].scale(*TWO_L);
    cs.enforce_equal(low.lc(), c0.scale(*TWO_2L).lc());

    let high = p2 + &p110 + p111.scale(*TWO_L) + &c0 - &r.0[2];
    let carry = &c10 + &c11.scale(*TWO_L);
    cs.enforce_equal(high.lc(), carry.scale(*TWO_L).lc());

    multi_range_check(cs, &[q0.clone(), q1.clone(), q2.clone()])?;
    multi_range_check(cs, &[p10, p110, c10])?;
    if q2_bits < LIMB_BITS {
        range_check_bits(cs, &q2, q2_bits)?;
    }

    // the same identity modulo the native field
    let q = Field3([q0, q1, q2]);
    let f_native = fp_from_biguint(f);
    let rhs = q.native().scale(f_native) + r.native();
    basic::assert_mul(cs, &x.native(), &y.native(), &rhs)?;

    Ok(r)
}

/// Asserts `x · y = xy (mod f)`.
///
/// Each argument may be a [`Field3`] or an unfinished [`ForeignSum`]; the
/// sums are finished here and their bounds feed the overflow check. `xy`
/// must be the canonical product for an honest prover. On constants a
/// failure is reported with `message`.
pub fn assert_mul<CS: ConstraintSystem>(
    cs: &mut CS,
    x: impl Into<ForeignSum>,
    y: impl Into<ForeignSum>,
    xy: impl Into<ForeignSum>,
    f: &BigUint,
    message: Option<&str>,
) -> Result<()> {
    check_modulus(f)?;
    let (mut x, mut y, mut xy) = (x.into(), y.into(), xy.into());
    let x0 = x.finish(cs, f)?;
    let y0 = y.finish(cs, f)?;
    let xy0 = xy.finish(cs, f)?;

    if let (Some(a), Some(b), Some(c)) = (x0.to_bigint(), y0.to_bigint(), xy0.to_bigint()) {
        if (a * b) % f != c % f {
            return Err(GadgetError::ConstantAssertion(
                message
                    .unwrap_or("assert_mul: incorrect multiplication result")
                    .to_string(),
            ));
        }
        return Ok(());
    }

    let x_bound = x.bound(f);
    let y_bound = y.bound(f);
    mul_constraints(cs, &x0, &y0, Remainder::Given(&xy0), f, &x_bound, &y_bound)?;
    Ok(())
}

/// `x2 + 2^88 - 1 - f2`, which is below `2^88` iff `x2 <= f2`.
///
/// When the low 176 bits of `f` are zero the offset is one larger, so the
/// check becomes `x2 < f2`.
pub fn weak_bound(x2: &Field, f: &BigUint) -> Field {
    let f2 = f >> TWO_LIMB_BITS;
    let mut offset = (BigUint::one() << LIMB_BITS) - f2;
    if !(f & &*TWO_LIMB_MASK).is_zero() {
        offset -= 1u32;
    }
    x2 + &Field::from_biguint(&offset)
}

/// Proves every value is almost reduced: limbs range checked (unless
/// `skip_mrc`) and `x2 <= f2`, with the bounds batched three per gate.
pub fn assert_almost_reduced<CS: ConstraintSystem>(
    cs: &mut CS,
    xs: &[Field3],
    f: &BigUint,
    skip_mrc: bool,
) -> Result<()> {
    let mut bounds = Vec::with_capacity(xs.len());
    for x in xs {
        if !skip_mrc {
            range_check_field3(cs, x)?;
        }
        bounds.push(weak_bound(&x.0[2], f));
    }
    range_check_batched(cs, &bounds)
}

/// `x⁻¹ mod f`; unsatisfiable when `x = 0 (mod f)`.
pub fn inv<CS: ConstraintSystem>(cs: &mut CS, x: &Field3, f: &BigUint) -> Result<Field3> {
    check_modulus(f)?;
    let field = FiniteField::new(f.clone());
    if let Some(v) = x.to_bigint() {
        let inverse = field.inverse(&v).ok_or(GadgetError::NotInvertible)?;
        return Field3::from_bigint(&inverse);
    }

    let x_inv = Field3::witness(cs, |cs| field.inverse(&x.value(cs)).unwrap_or_default());
    range_check_field3(cs, &x_inv)?;
    let bound = weak_bound(&x_inv.0[2], f);

    let x_bound = operand_bound(x, f);
    let one = Field3::one();
    mul_constraints(
        cs,
        x,
        &x_inv,
        Remainder::Given(&one),
        f,
        &x_bound,
        &almost_reduced_bound(f),
    )?;
    range_check_bits(cs, &bound, LIMB_BITS)?;
    Ok(x_inv)
}

/// `x / y mod f`.
///
/// Unless `allow_zero_over_zero` is set, `y = 0` makes the circuit
/// unsatisfiable; with it, `0 / 0` may return anything.
pub fn div<CS: ConstraintSystem>(
    cs: &mut CS,
    x: &Field3,
    y: &Field3,
    f: &BigUint,
    allow_zero_over_zero: bool,
) -> Result<Field3> {
    check_modulus(f)?;
    let field = FiniteField::new(f.clone());
    if let (Some(a), Some(b)) = (x.to_bigint(), y.to_bigint()) {
        return match field.div(&a, &b) {
            Some(z) => Field3::from_bigint(&z),
            None if allow_zero_over_zero && (&a % f).is_zero() => Ok(Field3::zero()),
            None => Err(GadgetError::NotInvertible),
        };
    }

    let z = Field3::witness(cs, |cs| field.div(&x.value(cs), &y.value(cs)).unwrap_or_default());
    range_check_field3(cs, &z)?;
    let bound = weak_bound(&z.0[2], f);

    let y_bound = operand_bound(y, f);
    mul_constraints(
        cs,
        &z,
        y,
        Remainder::Given(x),
        f,
        &almost_reduced_bound(f),
        &y_bound,
    )?;
    range_check_bits(cs, &bound, LIMB_BITS)?;

    if !allow_zero_over_zero {
        let y_is_zero = equals(cs, y, &BigUint::zero(), f)?;
        y_is_zero.assert_false(cs)?;
    }
    Ok(z)
}

/// Whether the almost reduced `x` represents the constant `c ∈ [0, f)`.
///
/// For `f >= 2^176` an almost reduced value is below `2f`, so it is either
/// `c` or `c + f`; both are compared limb-wise. Smaller moduli first prove
/// `x < f` and then compare natively.
pub fn equals<CS: ConstraintSystem>(cs: &mut CS, x: &Field3, c: &BigUint, f: &BigUint) -> Result<Bool> {
    check_modulus(f)?;
    if c >= f {
        return Err(GadgetError::OutOfRange(format!("{c:#x} is not reduced")));
    }
    if let Some(v) = x.to_bigint() {
        return Ok(Bool::constant(&(v % f) == c));
    }

    if f.bits() > TWO_LIMB_BITS as u64 {
        let x01 = x.low();
        let x2 = &x.0[2];
        let matches = |cs: &mut CS, target: &BigUint| {
            let t01 = Field::from_biguint(&(target & &*TWO_LIMB_MASK));
            let t2 = Field::from_biguint(&(target >> TWO_LIMB_BITS));
            let low = basic::equals(cs, &x01, &t01);
            let high = basic::equals(cs, x2, &t2);
            low.and(cs, &high)
        };
        let is_c = matches(cs, c);
        let is_c_plus_f = matches(cs, &(c + f));
        return Ok(is_c.or(cs, &is_c_plus_f));
    }

    assert_less_than(cs, x, f)?;
    Ok(basic::equals(cs, &x.native(), &Field::from_biguint(c)))
}

/// Proves `x < y` for a constant `y`, assuming range-checked limbs.
pub fn assert_less_than<CS: ConstraintSystem>(cs: &mut CS, x: &Field3, y: &BigUint) -> Result<()> {
    if y.is_zero() {
        return Err(GadgetError::OutOfRange("nothing is less than zero".to_string()));
    }
    if let Some(v) = x.to_bigint() {
        if &v >= y {
            return Err(GadgetError::ConstantAssertion(format!(
                "assert_less_than: {v:#x} >= {y:#x}"
            )));
        }
        return Ok(());
    }
    // (y - 1) - x >= 0 as an integer
    let y_minus_one = Field3::from_bigint(&(y - 1u32))?;
    single_add(cs, &y_minus_one, x, Sign::Minus, &BigUint::zero())?;
    Ok(())
}

/// Proves `x < y` for two variable values.
pub fn assert_less_than_field3<CS: ConstraintSystem>(cs: &mut CS, x: &Field3, y: &Field3) -> Result<()> {
    if let Some(bound) = y.to_bigint() {
        return assert_less_than(cs, x, &bound);
    }
    sum(cs, &[y.clone(), x.clone(), Field3::one()], &[Sign::Minus, Sign::Minus], &BigUint::zero())?;
    Ok(())
}

/// Proves `x <= y` for a constant `y`.
pub fn assert_less_than_or_equal<CS: ConstraintSystem>(cs: &mut CS, x: &Field3, y: &BigUint) -> Result<()> {
    if let Some(v) = x.to_bigint() {
        if &v > y {
            return Err(GadgetError::ConstantAssertion(format!(
                "assert_less_than_or_equal: {v:#x} > {y:#x}"
            )));
        }
        return Ok(());
    }
    let bound = Field3::from_bigint(y)?;
    single_add(cs, &bound, x, Sign::Minus, &BigUint::zero())?;
    Ok(())
}

/// The canonical representative of `x` in `[0, f)`.
pub fn to_canonical<CS: ConstraintSystem>(cs: &mut CS, x: &Field3, f: &BigUint) -> Result<Field3> {
    let r = reduce(cs, x, f)?;
    if !r.is_constant() {
        assert_less_than(cs, &r, f)?;
    }
    Ok(r)
}

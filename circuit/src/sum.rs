//! Foreign field addition chains.
//!
//! A chain `x0 ± x1 ± … ± xn (mod f)` is computed one term at a time. Each
//! step witnesses the result `z`, an overflow bit `o` and a carry `c`, and
//! proves
//!
//! ```text
//! x01 + s·y01 - o·f01 - z01 = c·2^176
//! x2  + s·y2  - o·f2  - z2  = -c
//! ```
//!
//! with `s = ±1`, `o ∈ {0, s}` and `c ∈ {-1, 0, 1}`. With `f = 0` the
//! overflow is fixed to zero, which turns the step into a plain integer
//! addition that fails on negative results.
//!
//! Unlike a bare addition gate, every step range checks its own result: a
//! chain of `n` terms costs `n - 1` range-check gates on top of the addition
//! constraints, and callers receive `z` with 88-bit limbs. Terms that are
//! already constant on both sides of a step emit nothing.

use std::cmp::Ordering;

use ff::Field as _;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::basic::mul;
use crate::engine::ConstraintSystem;
use crate::error::{GadgetError, Result};
use crate::field::{fp_from_biguint, Field, Fp};
use crate::limbs::{combine, constant_mod, split, Field3, TWO_LIMB_MASK, TWO_POW_264, TWO_2L};
use crate::range_check::range_check_field3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    fn native(self) -> Fp {
        match self {
            Sign::Plus => Fp::ONE,
            Sign::Minus => -Fp::ONE,
        }
    }
}

/// Bound on a variable operand that is only known to be almost reduced:
/// `(f2 + 1) · 2^176`, which covers every `x` with `x2 <= f2`.
pub(crate) fn almost_reduced_bound(f: &BigUint) -> BigUint {
    ((f >> 176u32) + 1u32) << 176u32
}

/// Static bound on a single operand: `value + 1` for constants, the almost
/// reduced bound otherwise.
pub(crate) fn operand_bound(x: &Field3, f: &BigUint) -> BigUint {
    match x.to_bigint() {
        Some(v) => v + 1u32,
        None => almost_reduced_bound(f),
    }
}

fn signed(x: &BigUint) -> BigInt {
    BigInt::from(x.clone())
}

/// A lazily evaluated sum of foreign field elements.
///
/// Gadgets take sums wherever a multiplication operand may be a small
/// linear expression; the sum is only materialised when it is used.
#[derive(Clone, Debug)]
pub struct ForeignSum {
    summands: Vec<Field3>,
    signs: Vec<Sign>,
    result: Option<Field3>,
}

impl ForeignSum {
    pub fn new(x: Field3) -> Self {
        Self {
            summands: vec![x],
            signs: Vec::new(),
            result: None,
        }
    }

    #[must_use]
    pub fn add(mut self, y: Field3) -> Self {
        self.summands.push(y);
        self.signs.push(Sign::Plus);
        self.result = None;
        self
    }

    #[must_use]
    pub fn sub(mut self, y: Field3) -> Self {
        self.summands.push(y);
        self.signs.push(Sign::Minus);
        self.result = None;
        self
    }

    pub fn num_summands(&self) -> usize {
        self.summands.len()
    }

    pub fn is_constant(&self) -> bool {
        self.summands.iter().all(Field3::is_constant)
    }

    /// Evaluates the chain modulo `f`, emitting its constraints once.
    pub fn finish<CS: ConstraintSystem>(&mut self, cs: &mut CS, f: &BigUint) -> Result<Field3> {
        if let Some(result) = &self.result {
            return Ok(result.clone());
        }
        let result = sum(cs, &self.summands, &self.signs, f)?;
        self.result = Some(result.clone());
        Ok(result)
    }

    /// Upper bound on the integer the finished sum represents.
    ///
    /// Every subtraction can add at most one `f`, so the bound is the first
    /// summand's bound plus, per term, the summand's bound or `f`.
    pub(crate) fn bound(&self, f: &BigUint) -> BigUint {
        if let Some(v) = self.result.as_ref().and_then(Field3::to_bigint) {
            return v + 1u32;
        }
        if self.summands.len() == 1 {
            return operand_bound(&self.summands[0], f);
        }
        let mut bound = operand_bound(&self.summands[0], f);
        for (x, sign) in self.summands[1..].iter().zip(&self.signs) {
            bound += match sign {
                Sign::Plus => operand_bound(x, f),
                Sign::Minus => f.clone(),
            };
        }
        bound.min(TWO_POW_264.clone())
    }
}

impl From<Field3> for ForeignSum {
    fn from(x: Field3) -> Self {
        ForeignSum::new(x)
    }
}

impl From<&Field3> for ForeignSum {
    fn from(x: &Field3) -> Self {
        ForeignSum::new(x.clone())
    }
}

/// `x0 ± x1 ± … (mod f)`; `signs` has one entry per summand after the first.
pub fn sum<CS: ConstraintSystem>(
    cs: &mut CS,
    xs: &[Field3],
    signs: &[Sign],
    f: &BigUint,
) -> Result<Field3> {
    let (first, rest) = xs.split_first().ok_or(GadgetError::EmptyInput)?;
    if rest.len() != signs.len() {
        return Err(GadgetError::LengthMismatch {
            expected: rest.len(),
            actual: signs.len(),
        });
    }
    if rest.is_empty() {
        return Ok(first.clone());
    }

    if xs.iter().all(Field3::is_constant) {
        let mut acc = BigInt::zero();
        for (x, sign) in xs.iter().zip(std::iter::once(&Sign::Plus).chain(signs)) {
            let v = signed(&x.to_bigint().unwrap_or_default());
            match sign {
                Sign::Plus => acc += v,
                Sign::Minus => acc -= v,
            }
        }
        return constant_sum(&acc, f);
    }

    let mut acc = first.clone();
    for (x, sign) in rest.iter().zip(signs) {
        acc = single_add(cs, &acc, x, *sign, f)?;
    }
    Ok(acc)
}

fn constant_sum(value: &BigInt, f: &BigUint) -> Result<Field3> {
    if f.is_zero() {
        let v = value.to_biguint().ok_or_else(|| {
            GadgetError::ConstantAssertion(format!("sum: negative result {value}"))
        })?;
        return Field3::from_bigint(&v);
    }
    let reduced = value.mod_floor(&signed(f));
    constant_mod(reduced.magnitude(), f)
}

/// One step of a chain: `z = x + s·y - o·f`.
pub fn single_add<CS: ConstraintSystem>(
    cs: &mut CS,
    x: &Field3,
    y: &Field3,
    sign: Sign,
    f: &BigUint,
) -> Result<Field3> {
    if let (Some(xv), Some(yv)) = (x.to_bigint(), y.to_bigint()) {
        let v = match sign {
            Sign::Plus => signed(&xv) + signed(&yv),
            Sign::Minus => signed(&xv) - signed(&yv),
        };
        return constant_sum(&v, f);
    }

    let f_signed = signed(f);
    let overflow = |cs: &CS| -> BigInt {
        if f.is_zero() {
            return BigInt::zero();
        }
        let r = match sign {
            Sign::Plus => signed(&x.value(cs)) + signed(&y.value(cs)),
            Sign::Minus => signed(&x.value(cs)) - signed(&y.value(cs)),
        };
        match (sign, r.cmp(&BigInt::zero()), r >= f_signed) {
            (Sign::Plus, _, true) => BigInt::one(),
            (Sign::Minus, Ordering::Less, _) => -BigInt::one(),
            _ => BigInt::zero(),
        }
    };

    let o = if f.is_zero() {
        Field::zero()
    } else {
        let [o] = cs.exists(|cs| [overflow(cs)]);
        o
    };

    let f01 = f & &*TWO_LIMB_MASK;
    let f2 = f >> 176u32;
    let s = sign.native();

    let [z0, z1, z2, c] = cs.exists(|cs| {
        let xl = x.limb_values(cs);
        let yl = y.limb_values(cs);
        let o = overflow(cs);

        let xv = signed(&combine(&xl));
        let yv = signed(&combine(&yl));
        let r = match sign {
            Sign::Plus => xv + yv,
            Sign::Minus => xv - yv,
        } - &o * &f_signed;
        let z = r.to_biguint().unwrap_or_default();
        let [z0, z1, z2] = split(&z);

        let x01 = signed(&xl[0]) + (signed(&xl[1]) << 88u32);
        let y01 = signed(&yl[0]) + (signed(&yl[1]) << 88u32);
        let z01 = signed(&z0) + (signed(&z1) << 88u32);
        let low = match sign {
            Sign::Plus => x01 + y01,
            Sign::Minus => x01 - y01,
        } - &o * signed(&f01)
            - z01;
        let carry = low.div_floor(&(BigInt::one() << 176u32));
        [signed(&z0), signed(&z1), signed(&z2), carry]
    });
    let z = Field3([z0, z1, z2]);

    // o is 0 or s
    let o_over_s = o.scale(s);
    cs.enforce_boolean(o_over_s.lc());

    // c ∈ {-1, 0, 1} via c³ = c
    let c_squared = mul(cs, &c, &c);
    cs.enforce_mul(c.lc(), c_squared.lc(), c.lc());

    let low = x.low() + y.low().scale(s) - o.scale(fp_from_biguint(&f01)) - z.low();
    cs.enforce_equal(low.lc(), c.scale(*TWO_2L).lc());

    let top = &x.0[2] + &y.0[2].scale(s) - o.scale(fp_from_biguint(&f2)) + &c;
    cs.enforce_equal(top.lc(), z.0[2].lc());

    range_check_field3(cs, &z)?;
    Ok(z)
}

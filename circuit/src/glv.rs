//! GLV decomposition in the circuit.
//!
//! On curves with an endomorphism `φ(x, y) = (β·x, y) = λ·(x, y)` a scalar
//! multiplication `s·P` becomes `s0·P + s1·φ(P)` with `s0, s1` of about half
//! the length of `s`. The decomposition is witnessed and checked with one
//! foreign multiplication modulo the group order.

use curve::Endomorphism;
use num_bigint::{BigInt, BigUint};

use crate::basic::select;
use crate::engine::ConstraintSystem;
use crate::error::{GadgetError, Result};
use crate::field::{Bool, Field};
use crate::foreign_field::{assert_mul, mul, negate, weak_bound};
use crate::limbs::{split, Field3, TWO_LIMB_BITS};
use crate::point::Point;
use crate::range_check::range_check_batched;
use crate::sum::ForeignSum;

/// `±abs`, with `abs` in the low two limbs.
#[derive(Clone, Debug, PartialEq)]
pub struct SignedField3 {
    pub abs: Field3,
    pub is_negative: Bool,
}

/// Witnesses `s0, s1` with `s = s0 + s1·λ (mod n)`.
///
/// The halves are not range checked. Callers must bound them to
/// `decompose_max_bits` bits, which slicing them into windows does.
pub fn decompose_no_range_check<CS: ConstraintSystem>(
    cs: &mut CS,
    endo: &Endomorphism,
    order: &BigUint,
    s: &Field3,
) -> Result<[SignedField3; 2]> {
    if endo.decompose_max_bits() >= TWO_LIMB_BITS {
        return Err(GadgetError::OutOfRange(format!(
            "decomposed scalars must fit in two limbs, got {} bits",
            endo.decompose_max_bits()
        )));
    }
    if let Some(v) = s.to_bigint() {
        let [s0, s1] = endo.decompose(&(v % order));
        return Ok([
            SignedField3 {
                abs: Field3::from_bigint(&s0.abs)?,
                is_negative: Bool::constant(s0.is_negative),
            },
            SignedField3 {
                abs: Field3::from_bigint(&s1.abs)?,
                is_negative: Bool::constant(s1.is_negative),
            },
        ]);
    }

    let [s0_negative, s00, s01, s1_negative, s10, s11] = cs.exists(|cs| {
        let [s0, s1] = endo.decompose(&(s.value(cs) % order));
        let [s00, s01, _] = split(&s0.abs);
        let [s10, s11, _] = split(&s1.abs);
        [
            BigInt::from(u8::from(s0.is_negative)),
            s00.into(),
            s01.into(),
            BigInt::from(u8::from(s1.is_negative)),
            s10.into(),
            s11.into(),
        ]
    });
    cs.enforce_boolean(s0_negative.lc());
    cs.enforce_boolean(s1_negative.lc());
    let s0_negative = Bool::from_field_unchecked(s0_negative);
    let s1_negative = Bool::from_field_unchecked(s1_negative);
    let s0 = Field3([s00, s01, Field::zero()]);
    let s1 = Field3([s10, s11, Field::zero()]);

    // s1·(±λ) = s ∓ s0
    let lambda = Field3::from_bigint(&endo.scalar)?;
    let minus_lambda = Field3::from_bigint(&((order - &endo.scalar) % order))?;
    let lambda = select(cs, &s1_negative, &minus_lambda, &lambda)?;
    let plus = ForeignSum::new(s.clone()).add(s0.clone()).finish(cs, order)?;
    let minus = ForeignSum::new(s.clone()).sub(s0.clone()).finish(cs, order)?;
    let rhs = select(cs, &s0_negative, &plus, &minus)?;
    assert_mul(cs, &s1, &lambda, &rhs, order, None)?;

    Ok([
        SignedField3 {
            abs: s0,
            is_negative: s0_negative,
        },
        SignedField3 {
            abs: s1,
            is_negative: s1_negative,
        },
    ])
}

/// `φ(P) = (β·x, y)` and the weak bound of `β·x`, which the caller must
/// range check (see [`reduce_mrc_stack`]).
pub fn endomorphism<CS: ConstraintSystem>(
    cs: &mut CS,
    endo: &Endomorphism,
    f: &BigUint,
    p: &Point,
) -> Result<(Point, Field)> {
    let beta = Field3::from_bigint(&endo.base)?;
    let beta_x = mul(cs, &beta, &p.x, f)?;
    let bound = weak_bound(&beta_x.0[2], f);
    Ok((Point::new(beta_x, p.y.clone()), bound))
}

/// `cond ? -P : P` for a Weierstrass point, with the weak bound of the new
/// `y` for the caller to range check.
pub fn negate_if<CS: ConstraintSystem>(
    cs: &mut CS,
    cond: &Bool,
    p: &Point,
    f: &BigUint,
) -> Result<(Point, Field)> {
    let minus_y = negate(cs, &p.y, f)?;
    let y = select(cs, cond, &minus_y, &p.y)?;
    let bound = weak_bound(&y.0[2], f);
    Ok((Point::new(p.x.clone(), y), bound))
}

/// Range checks the collected weak bounds, three per gate.
pub fn reduce_mrc_stack<CS: ConstraintSystem>(cs: &mut CS, stack: &[Field]) -> Result<()> {
    range_check_batched(cs, stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit_slices::slice_field3;
    use crate::foreign_field::assert_almost_reduced;
    use crate::range_check::range_check_field3;
    use crate::{ShapeConstraintSystem, TestConstraintSystem};
    use curve::{secp256k1, CurveArithmetic, FiniteField};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_decompose_in_circuit() {
        let curve = secp256k1();
        let endo = curve.endomorphism.clone().unwrap();
        let n = curve.order().clone();
        let scalar_field = FiniteField::new(n.clone());
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..5 {
            let s = scalar_field.random(&mut rng);
            let mut cs = TestConstraintSystem::new();
            let sv = Field3::witness(&mut cs, |_| s.clone());
            range_check_field3(&mut cs, &sv).unwrap();
            let [s0, s1] = decompose_no_range_check(&mut cs, &endo, &n, &sv).unwrap();
            let max_bits = endo.decompose_max_bits();
            slice_field3(&mut cs, &s0.abs, max_bits, 4).unwrap();
            slice_field3(&mut cs, &s1.abs, max_bits, 4).unwrap();
            assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());

            let signed = |half: &SignedField3| {
                let abs = half.abs.value(&cs);
                if cs.value(half.is_negative.field()) == crate::field::Fp::from(1u64) {
                    scalar_field.neg(&abs)
                } else {
                    abs
                }
            };
            let recombined = scalar_field.add(&signed(&s0), &scalar_field.mul(&signed(&s1), &endo.scalar));
            assert_eq!(recombined, s);
        }
    }

    #[test]
    fn test_constant_decomposition_is_free() {
        let curve = secp256k1();
        let endo = curve.endomorphism.clone().unwrap();
        let mut cs = TestConstraintSystem::new();
        let s = Field3::from_bigint(&(curve.order() - 1u32)).unwrap();
        let [s0, s1] = decompose_no_range_check(&mut cs, &endo, curve.order(), &s).unwrap();
        assert!(s0.abs.is_constant() && s1.abs.is_constant());
        assert_eq!(cs.counts().constraints, 0);
    }

    #[test]
    fn test_endomorphism_and_negation() {
        let curve = secp256k1();
        let endo = curve.endomorphism.clone().unwrap();
        let f = curve.modulus().clone();
        let g = curve.generator().clone();

        let mut cs = TestConstraintSystem::new();
        let gv = Point::witness(&mut cs, |_| g.clone());
        assert_almost_reduced(&mut cs, &[gv.x.clone(), gv.y.clone()], &f, false).unwrap();
        let (phi, bound) = endomorphism(&mut cs, &endo, &f, &gv).unwrap();
        let yes = Bool::constant(true);
        let (neg, neg_bound) = negate_if(&mut cs, &yes, &gv, &f).unwrap();
        reduce_mrc_stack(&mut cs, &[bound, neg_bound]).unwrap();
        assert!(cs.is_satisfied());
        assert_eq!(phi.value(&cs), endo.apply(&curve, &g));
        assert_eq!(phi.value(&cs), curve.scale(&g, &endo.scalar));
        assert_eq!(neg.value(&cs), curve.negate(&g));
    }

    #[test]
    fn test_mrc_stack_gate_count() {
        fn gates(n: usize) -> usize {
            let mut cs = ShapeConstraintSystem::new();
            let stack = cs.exists_vec(n, |_| Vec::new());
            reduce_mrc_stack(&mut cs, &stack).unwrap();
            cs.counts().range_checks
        }
        assert_eq!(gates(1), 1);
        assert_eq!(gates(3), 1);
        assert_eq!(gates(4), 2);
        assert_eq!(gates(9), 3);
    }
}

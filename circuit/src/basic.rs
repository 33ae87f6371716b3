//! Gadgets over single native values.
//!
//! Each gadget folds to a constant without emitting anything when its
//! inputs are constants; a failed check on constants is reported as
//! [`GadgetError::ConstantAssertion`].

use ff::Field as _;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::engine::ConstraintSystem;
use crate::error::{GadgetError, Result};
use crate::field::{fp_to_bigint, fp_to_biguint, Bool, Field, Fp, LinearCombination};
use crate::provable::Provable;

pub fn assert_equal<CS: ConstraintSystem>(cs: &mut CS, a: &Field, b: &Field) -> Result<()> {
    match (a, b) {
        (Field::Constant(x), Field::Constant(y)) => {
            if x != y {
                return Err(GadgetError::ConstantAssertion(format!(
                    "assert_equal: {x:?} != {y:?}"
                )));
            }
            Ok(())
        }
        _ => {
            cs.enforce_equal(a.lc(), b.lc());
            Ok(())
        }
    }
}

/// `a · b = c`. Linear when either factor is a constant.
pub fn assert_mul<CS: ConstraintSystem>(cs: &mut CS, a: &Field, b: &Field, c: &Field) -> Result<()> {
    match (a, b) {
        (Field::Constant(x), Field::Constant(y)) => assert_equal(cs, &Field::Constant(*x * y), c),
        (Field::Constant(x), _) => assert_equal(cs, &b.scale(*x), c),
        (_, Field::Constant(y)) => assert_equal(cs, &a.scale(*y), c),
        _ => {
            cs.enforce_mul(a.lc(), b.lc(), c.lc());
            Ok(())
        }
    }
}

pub fn assert_boolean<CS: ConstraintSystem>(cs: &mut CS, a: &Field) -> Result<()> {
    match a {
        Field::Constant(x) => {
            if !bool::from(x.is_zero()) && *x != Fp::ONE {
                return Err(GadgetError::ConstantAssertion(format!(
                    "assert_boolean: {x:?} is not 0 or 1"
                )));
            }
            Ok(())
        }
        Field::Variable(lc) => {
            cs.enforce_boolean(lc.clone());
            Ok(())
        }
    }
}

/// `a · b`, witnessing the product when both factors are variables.
pub fn mul<CS: ConstraintSystem>(cs: &mut CS, a: &Field, b: &Field) -> Field {
    match (a, b) {
        (Field::Constant(x), _) => b.scale(*x),
        (_, Field::Constant(y)) => a.scale(*y),
        _ => {
            let [c] = cs.exists(|cs| [fp_to_bigint(&(cs.value(a) * cs.value(b)))]);
            cs.enforce_mul(a.lc(), b.lc(), c.lc());
            c
        }
    }
}

/// Witnesses a boolean without constraining it.
pub(crate) fn witness_bool<CS: ConstraintSystem>(cs: &mut CS, compute: impl FnOnce(&CS) -> bool) -> Bool {
    let [b] = cs.exists(|cs| [BigInt::from(u8::from(compute(cs)))]);
    Bool::from_field_unchecked(b)
}

pub fn is_zero<CS: ConstraintSystem>(cs: &mut CS, x: &Field) -> Bool {
    if let Field::Constant(c) = x {
        return Bool::constant(bool::from(c.is_zero()));
    }
    let [z, inv] = cs.exists(|cs| {
        let v = cs.value(x);
        match Option::<Fp>::from(v.invert()) {
            Some(inv) => [BigInt::zero(), fp_to_bigint(&inv)],
            None => [BigInt::from(1), BigInt::zero()],
        }
    });
    // x · inv = 1 - z and x · z = 0
    cs.enforce_mul(x.lc(), inv.lc(), LinearCombination::constant(Fp::ONE) - z.lc());
    cs.enforce_mul(x.lc(), z.lc(), LinearCombination::zero());
    Bool::from_field_unchecked(z)
}

pub fn equals<CS: ConstraintSystem>(cs: &mut CS, a: &Field, b: &Field) -> Bool {
    is_zero(cs, &(a - b))
}

/// `cond ? if_true : if_false`, field by field.
pub fn select<CS: ConstraintSystem, T: Provable>(
    cs: &mut CS,
    cond: &Bool,
    if_true: &T,
    if_false: &T,
) -> Result<T> {
    if let Some(c) = cond.to_constant() {
        return Ok(if c { if_true.clone() } else { if_false.clone() });
    }
    let fields: Vec<Field> = if_true
        .to_fields()
        .iter()
        .zip(if_false.to_fields())
        .map(|(t, f)| {
            if *t == f {
                return f;
            }
            let diff = t - &f;
            mul(cs, cond.field(), &diff) + f
        })
        .collect();
    T::from_fields(&fields)
}

fn constant_index(index: &Fp, len: usize) -> Result<usize> {
    fp_to_biguint(index)
        .to_usize()
        .filter(|&i| i < len)
        .ok_or_else(|| GadgetError::OutOfRange(format!("index {index:?} for array of length {len}")))
}

/// `array[index]` in `O(n)` constraints.
///
/// For every position `j` a witness `z_j` proves `z_j · (index - j) = a -
/// array[j]`, which forces `a = array[index]`. The index must be in range;
/// otherwise `a` is unconstrained.
pub fn array_get<CS: ConstraintSystem>(cs: &mut CS, array: &[Field], index: &Field) -> Result<Field> {
    if array.is_empty() {
        return Err(GadgetError::EmptyInput);
    }
    if let Field::Constant(i) = index {
        return Ok(array[constant_index(i, array.len())?].clone());
    }

    let [a] = cs.exists(|cs| {
        let i = fp_to_biguint(&cs.value(index)).to_usize();
        let value = i.and_then(|i| array.get(i)).map(|x| cs.value(x)).unwrap_or(Fp::ZERO);
        [fp_to_bigint(&value)]
    });
    for (j, entry) in array.iter().enumerate() {
        let offset = index - &Field::from_u64(j as u64);
        let [z] = cs.exists(|cs| {
            let diff = cs.value(&a) - cs.value(entry);
            let inv = Option::<Fp>::from(cs.value(&offset).invert()).unwrap_or(Fp::ZERO);
            [fp_to_bigint(&(diff * inv))]
        });
        cs.enforce_mul(z.lc(), offset.lc(), a.lc() - entry.lc());
    }
    Ok(a)
}

/// [`array_get`] for any [`Provable`] element type.
pub fn array_get_generic<CS: ConstraintSystem, T: Provable>(
    cs: &mut CS,
    array: &[T],
    index: &Field,
) -> Result<T> {
    if array.is_empty() {
        return Err(GadgetError::EmptyInput);
    }
    if let Field::Constant(i) = index {
        return Ok(array[constant_index(i, array.len())?].clone());
    }
    let flat: Vec<Vec<Field>> = array.iter().map(Provable::to_fields).collect();
    let fields = (0..T::SIZE)
        .map(|k| {
            let column: Vec<Field> = flat.iter().map(|fields| fields[k].clone()).collect();
            array_get(cs, &column, index)
        })
        .collect::<Result<Vec<_>>>()?;
    T::from_fields(&fields)
}

/// `x ∈ values`, as `Π (x - vᵢ) = 0`.
pub fn assert_one_of<CS: ConstraintSystem>(cs: &mut CS, x: &Field, values: &[Fp]) -> Result<()> {
    let (first, rest) = values.split_first().ok_or(GadgetError::EmptyInput)?;
    if let Field::Constant(c) = x {
        if !values.contains(c) {
            return Err(GadgetError::ConstantAssertion(format!(
                "assert_one_of: {c:?} is not an allowed value"
            )));
        }
        return Ok(());
    }
    let mut product = x - &Field::Constant(*first);
    for v in rest {
        let factor = x - &Field::Constant(*v);
        product = mul(cs, &product, &factor);
    }
    assert_equal(cs, &product, &Field::zero())
}

/// `x ≠ c` as vectors, i.e. at least one coordinate differs.
///
/// The prover supplies `zᵢ` with `Σ (xᵢ - cᵢ) · zᵢ = 1`.
pub fn assert_not_vector_equals<CS: ConstraintSystem>(cs: &mut CS, x: &[Field], c: &[Fp]) -> Result<()> {
    if x.len() != c.len() {
        return Err(GadgetError::LengthMismatch {
            expected: c.len(),
            actual: x.len(),
        });
    }
    if x.is_empty() {
        return Err(GadgetError::EmptyInput);
    }
    let diffs: Vec<Field> = x
        .iter()
        .zip(c)
        .map(|(xi, ci)| xi - &Field::Constant(*ci))
        .collect();
    if diffs.iter().all(Field::is_constant) {
        if diffs.iter().all(|d| d == &Field::zero()) {
            return Err(GadgetError::ConstantAssertion(
                "assert_not_vector_equals: vectors are equal".to_string(),
            ));
        }
        return Ok(());
    }

    let z = cs.exists_vec(diffs.len(), |cs| {
        let mut out = vec![BigInt::zero(); diffs.len()];
        if let Some((i, inv)) = diffs
            .iter()
            .enumerate()
            .find_map(|(i, d)| Option::<Fp>::from(cs.value(d).invert()).map(|inv| (i, inv)))
        {
            out[i] = fp_to_bigint(&inv);
        }
        out
    });

    let last = diffs.len() - 1;
    let mut partial = Field::zero();
    for (d, zi) in diffs[..last].iter().zip(&z) {
        partial = partial + mul(cs, d, zi);
    }
    assert_mul(cs, &diffs[last], &z[last], &(&Field::one() - &partial))
}

pub fn assert_not_equals<CS: ConstraintSystem>(cs: &mut CS, x: &Field, c: Fp) -> Result<()> {
    assert_not_vector_equals(cs, std::slice::from_ref(x), &[c])
}

/// Field-wise equality of two values of the same type.
pub fn equal<CS: ConstraintSystem, T: Provable>(cs: &mut CS, a: &T, b: &T) -> Result<Bool> {
    let mut acc = Bool::constant(true);
    for (x, y) in a.to_fields().iter().zip(b.to_fields()) {
        let eq = equals(cs, x, &y);
        acc = acc.and(cs, &eq);
    }
    Ok(acc)
}

impl Bool {
    pub fn and<CS: ConstraintSystem>(&self, cs: &mut CS, other: &Bool) -> Bool {
        Bool::from_field_unchecked(mul(cs, self.field(), other.field()))
    }

    /// `a + b - a·b`
    pub fn or<CS: ConstraintSystem>(&self, cs: &mut CS, other: &Bool) -> Bool {
        let product = mul(cs, self.field(), other.field());
        Bool::from_field_unchecked(self.field() + other.field() - product)
    }

    pub fn assert_true<CS: ConstraintSystem>(&self, cs: &mut CS) -> Result<()> {
        assert_equal(cs, self.field(), &Field::one())
    }

    pub fn assert_false<CS: ConstraintSystem>(&self, cs: &mut CS) -> Result<()> {
        assert_equal(cs, self.field(), &Field::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ShapeConstraintSystem, TestConstraintSystem};

    fn witness<CS: ConstraintSystem>(cs: &mut CS, v: u64) -> Field {
        let [x] = cs.exists(|_| [BigInt::from(v)]);
        x
    }

    #[test]
    fn test_is_zero() {
        let mut cs = TestConstraintSystem::new();
        let zero = witness(&mut cs, 0);
        let five = witness(&mut cs, 5);
        let a = is_zero(&mut cs, &zero);
        let b = is_zero(&mut cs, &five);
        assert_eq!(cs.value(a.field()), Fp::ONE);
        assert_eq!(cs.value(b.field()), Fp::ZERO);
        assert!(cs.is_satisfied());
        assert_eq!(is_zero(&mut cs, &Field::zero()).to_constant(), Some(true));
    }

    #[test]
    fn test_select_and_bool_logic() {
        let mut cs = TestConstraintSystem::new();
        let t = witness(&mut cs, 10);
        let f = witness(&mut cs, 20);
        let yes = Bool::from_field_unchecked(witness(&mut cs, 1));
        let no = yes.not();

        let picked = select(&mut cs, &yes, &t, &f).unwrap();
        assert_eq!(cs.value(&picked), Fp::from(10u64));
        let picked = select(&mut cs, &no, &t, &f).unwrap();
        assert_eq!(cs.value(&picked), Fp::from(20u64));

        let both = yes.and(&mut cs, &no);
        let either = yes.or(&mut cs, &no);
        assert_eq!(cs.value(both.field()), Fp::ZERO);
        assert_eq!(cs.value(either.field()), Fp::ONE);
        either.assert_true(&mut cs).unwrap();
        both.assert_false(&mut cs).unwrap();
        assert!(cs.is_satisfied());
    }

    #[test]
    fn test_array_get() {
        let mut cs = TestConstraintSystem::new();
        let array: Vec<Field> = (0..5).map(|i| witness(&mut cs, 100 + i)).collect();
        let index = witness(&mut cs, 3);
        let got = array_get(&mut cs, &array, &index).unwrap();
        assert_eq!(cs.value(&got), Fp::from(103u64));
        assert!(cs.is_satisfied());

        let constant = array_get(&mut cs, &array, &Field::from_u64(4)).unwrap();
        assert_eq!(constant, array[4]);
        assert!(matches!(
            array_get(&mut cs, &array, &Field::from_u64(5)),
            Err(GadgetError::OutOfRange(_))
        ));
        assert_eq!(array_get(&mut cs, &[], &index), Err(GadgetError::EmptyInput));
    }

    #[test]
    fn test_assert_one_of() {
        let mut cs = TestConstraintSystem::new();
        let x = witness(&mut cs, 2);
        let allowed = [Fp::ONE, Fp::from(2u64), Fp::from(3u64)];
        assert_one_of(&mut cs, &x, &allowed).unwrap();
        assert!(cs.is_satisfied());
        assert_one_of(&mut cs, &x, &[Fp::from(7u64)]).unwrap();
        assert!(!cs.is_satisfied());
        assert!(assert_one_of(&mut cs, &Field::from_u64(9), &allowed).is_err());
    }

    #[test]
    fn test_assert_not_vector_equals() {
        let mut cs = TestConstraintSystem::new();
        let x = [witness(&mut cs, 4), witness(&mut cs, 9)];
        assert_not_vector_equals(&mut cs, &x, &[Fp::from(4u64), Fp::from(8u64)]).unwrap();
        assert_not_equals(&mut cs, &x[0], Fp::from(5u64)).unwrap();
        assert!(cs.is_satisfied());

        assert_not_vector_equals(&mut cs, &x, &[Fp::from(4u64), Fp::from(9u64)]).unwrap();
        assert!(!cs.is_satisfied());

        let constants = [Field::from_u64(1), Field::from_u64(2)];
        let mut cs = TestConstraintSystem::new();
        assert!(matches!(
            assert_not_vector_equals(&mut cs, &constants, &[Fp::ONE, Fp::from(2u64)]),
            Err(GadgetError::ConstantAssertion(_))
        ));
        assert_eq!(cs.counts().constraints, 0);
    }

    #[test]
    fn test_equal_is_fieldwise() {
        let mut cs = TestConstraintSystem::new();
        let a = vec![witness(&mut cs, 1), witness(&mut cs, 2)];
        let b = vec![witness(&mut cs, 1), witness(&mut cs, 3)];
        let same = equal(&mut cs, &a[0], &b[0]).unwrap();
        let differ = equal(&mut cs, &a[1], &b[1]).unwrap();
        assert_eq!(cs.value(same.field()), Fp::ONE);
        assert_eq!(cs.value(differ.field()), Fp::ZERO);
    }

    #[test]
    fn test_shape_counts_match() {
        fn circuit<CS: ConstraintSystem>(cs: &mut CS) {
            let array: Vec<Field> = (0..4).map(|i| witness(cs, i)).collect();
            let index = witness(cs, 2);
            let x = array_get(cs, &array, &index).unwrap();
            let z = is_zero(cs, &x);
            select(cs, &z, &array[0], &array[1]).unwrap();
        }
        let mut test = TestConstraintSystem::new();
        let mut shape = ShapeConstraintSystem::new();
        circuit(&mut test);
        circuit(&mut shape);
        assert!(test.is_satisfied());
        assert_eq!(test.counts(), shape.counts());
    }
}

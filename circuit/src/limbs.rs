//! Three-limb representation of foreign field elements.
//!
//! An integer `x < 2^264` is stored as `(x0, x1, x2)` with
//! `x = x0 + x1·2^88 + x2·2^176` and each limb in `[0, 2^88)` once range
//! checked.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;

use crate::engine::ConstraintSystem;
use crate::error::{GadgetError, Result};
use crate::field::{fp_to_biguint, pow2, Field, Fp};
use crate::provable::{check_len, Provable};

pub const LIMB_BITS: usize = 88;
pub const TWO_LIMB_BITS: usize = 2 * LIMB_BITS;
pub const THREE_LIMB_BITS: usize = 3 * LIMB_BITS;

pub static LIMB_MASK: Lazy<BigUint> = Lazy::new(|| (BigUint::one() << LIMB_BITS) - 1u32);
pub(crate) static TWO_LIMB_MASK: Lazy<BigUint> = Lazy::new(|| (BigUint::one() << TWO_LIMB_BITS) - 1u32);
pub(crate) static TWO_POW_264: Lazy<BigUint> = Lazy::new(|| BigUint::one() << THREE_LIMB_BITS);

pub(crate) static TWO_L: Lazy<Fp> = Lazy::new(|| pow2(LIMB_BITS));
pub(crate) static TWO_2L: Lazy<Fp> = Lazy::new(|| pow2(TWO_LIMB_BITS));

/// Splits `x` into three 88-bit limbs.
///
/// The top limb keeps every bit above `2^176`, so `combine(split(x)) = x`
/// holds for all inputs.
pub fn split(x: &BigUint) -> [BigUint; 3] {
    [
        x & &*LIMB_MASK,
        (x >> LIMB_BITS) & &*LIMB_MASK,
        x >> TWO_LIMB_BITS,
    ]
}

pub fn combine(limbs: &[BigUint; 3]) -> BigUint {
    &limbs[0] + (&limbs[1] << LIMB_BITS) + (&limbs[2] << TWO_LIMB_BITS)
}

/// A foreign field element as three native limbs.
#[derive(Clone, Debug, PartialEq)]
pub struct Field3(pub [Field; 3]);

impl Field3 {
    /// Constant element, rejecting anything that does not fit in 264 bits.
    pub fn from_bigint(x: &BigUint) -> Result<Self> {
        if x >= &*TWO_POW_264 {
            return Err(GadgetError::OutOfRange(format!("{x:#x} does not fit in 264 bits")));
        }
        let [l0, l1, l2] = split(x);
        Ok(Field3([
            Field::from_biguint(&l0),
            Field::from_biguint(&l1),
            Field::from_biguint(&l2),
        ]))
    }

    pub fn from_u64(x: u64) -> Self {
        let x = BigUint::from(x);
        let [l0, l1, _] = split(&x);
        Field3([Field::from_biguint(&l0), Field::from_biguint(&l1), Field::zero()])
    }

    pub fn zero() -> Self {
        Self::from_u64(0)
    }

    pub fn one() -> Self {
        Self::from_u64(1)
    }

    pub fn from_limbs(limbs: [Field; 3]) -> Self {
        Field3(limbs)
    }

    #[inline]
    pub fn limbs(&self) -> &[Field; 3] {
        &self.0
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.0.iter().all(Field::is_constant)
    }

    /// The represented integer, when all limbs are constants.
    pub fn to_bigint(&self) -> Option<BigUint> {
        let [l0, l1, l2] = &self.0;
        Some(combine(&[
            fp_to_biguint(&l0.to_constant()?),
            fp_to_biguint(&l1.to_constant()?),
            fp_to_biguint(&l2.to_constant()?),
        ]))
    }

    pub fn limb_values<CS: ConstraintSystem>(&self, cs: &CS) -> [BigUint; 3] {
        std::array::from_fn(|i| fp_to_biguint(&cs.value(&self.0[i])))
    }

    /// The represented integer under the current witness.
    pub fn value<CS: ConstraintSystem>(&self, cs: &CS) -> BigUint {
        combine(&self.limb_values(cs))
    }

    /// Witnesses three limbs holding `compute(cs)`. No range check.
    pub fn witness<CS: ConstraintSystem>(cs: &mut CS, compute: impl FnOnce(&CS) -> BigUint) -> Self {
        let limbs = cs.exists(|cs| split(&compute(cs)).map(Into::into));
        Field3(limbs)
    }

    /// Witnesses several values with one closure. No range checks.
    pub fn witness_many<CS: ConstraintSystem, const N: usize>(
        cs: &mut CS,
        compute: impl FnOnce(&CS) -> [BigUint; N],
    ) -> [Self; N] {
        let fields = cs.exists_vec(3 * N, |cs| {
            compute(cs)
                .iter()
                .flat_map(|x| split(x).map(Into::into))
                .collect()
        });
        std::array::from_fn(|i| {
            Field3([
                fields[3 * i].clone(),
                fields[3 * i + 1].clone(),
                fields[3 * i + 2].clone(),
            ])
        })
    }

    /// `x0 + 2^88·x1`
    pub(crate) fn low(&self) -> Field {
        &self.0[0] + &self.0[1].scale(*TWO_L)
    }

    /// The represented integer reduced into the native field.
    pub(crate) fn native(&self) -> Field {
        self.low() + self.0[2].scale(*TWO_2L)
    }
}

impl Default for Field3 {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[Field; 3]> for Field3 {
    fn from(limbs: [Field; 3]) -> Self {
        Field3(limbs)
    }
}

impl Provable for Field3 {
    const SIZE: usize = 3;

    fn to_fields(&self) -> Vec<Field> {
        self.0.to_vec()
    }

    fn from_fields(fields: &[Field]) -> Result<Self> {
        check_len(fields, Self::SIZE)?;
        Ok(Field3([fields[0].clone(), fields[1].clone(), fields[2].clone()]))
    }

    fn is_constant(&self) -> bool {
        Field3::is_constant(self)
    }
}

/// Convenience for building the constant `x mod f` (or `x` when `f = 0`).
pub(crate) fn constant_mod(x: &BigUint, f: &BigUint) -> Result<Field3> {
    if f.is_zero() {
        Field3::from_bigint(x)
    } else {
        Field3::from_bigint(&(x % f))
    }
}

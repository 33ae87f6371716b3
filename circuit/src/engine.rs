//! The contract between gadgets and a constraint backend.
//!
//! Gadgets never see how constraints are stored or proven. They allocate
//! variables, read values back when a witness is being produced, and emit
//! four kinds of constraints: linear, multiplicative, 3-limb range checks
//! and single-value bit-length checks.

use std::future::Future;

use ff::Field as _;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::field::{fp_from_bigint, Field, Fp, LinearCombination, Variable};

/// Bit length covered by one range-check limb.
pub const RANGE_CHECK_BITS: usize = 88;

/// Counters every engine keeps, used to compare circuit shapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintCounts {
    pub variables: usize,
    pub constraints: usize,
    pub range_checks: usize,
    pub bit_checks: usize,
}

pub trait ConstraintSystem {
    /// `true` when witness closures run and variables carry values.
    fn is_witness_mode(&self) -> bool;

    fn alloc(&mut self, value: Option<Fp>) -> Variable;

    /// Value of `lc` under the current assignment.
    fn eval(&self, lc: &LinearCombination) -> Option<Fp>;

    /// `lc = 0`
    fn enforce_zero(&mut self, lc: LinearCombination);

    /// `a · b = c`
    fn enforce_mul(&mut self, a: LinearCombination, b: LinearCombination, c: LinearCombination);

    /// One gate: each of the three values lies in `[0, 2^88)`.
    fn enforce_range_check(&mut self, limbs: [LinearCombination; 3]);

    /// `lc < 2^bits` for `bits <= 88`; `bits = 0` forces zero.
    fn enforce_range_check_bits(&mut self, lc: LinearCombination, bits: usize);

    fn counts(&self) -> ConstraintCounts;

    fn enforce_equal(&mut self, a: LinearCombination, b: LinearCombination) {
        self.enforce_zero(a - b);
    }

    /// `a · (a - 1) = 0`
    fn enforce_boolean(&mut self, a: LinearCombination) {
        let minus_one = a.clone() - LinearCombination::constant(Fp::ONE);
        self.enforce_mul(a, minus_one, LinearCombination::zero());
    }

    /// Value of `x`, zero when it is not known.
    fn value(&self, x: &Field) -> Fp {
        match x {
            Field::Constant(c) => *c,
            Field::Variable(lc) => self.eval(lc).unwrap_or(Fp::ZERO),
        }
    }

    /// Allocates `n` unconstrained variables.
    ///
    /// `compute` only runs in witness mode; its results are reduced into the
    /// native field, so negative values are fine. Missing entries are zero.
    fn exists_vec<F>(&mut self, n: usize, compute: F) -> Vec<Field>
    where
        F: FnOnce(&Self) -> Vec<BigInt>,
    {
        let values: Option<Vec<Fp>> = self
            .is_witness_mode()
            .then(|| compute(self).iter().map(fp_from_bigint).collect());
        (0..n)
            .map(|i| {
                let value = values
                    .as_ref()
                    .map(|vs| vs.get(i).copied().unwrap_or(Fp::ZERO));
                Field::from(self.alloc(value))
            })
            .collect()
    }

    /// Fixed-size [`Self::exists_vec`].
    fn exists<const N: usize, F>(&mut self, compute: F) -> [Field; N]
    where
        F: FnOnce(&Self) -> [BigInt; N],
    {
        let values: Option<[Fp; N]> = self.is_witness_mode().then(|| {
            let computed = compute(self);
            std::array::from_fn(|i| fp_from_bigint(&computed[i]))
        });
        let mut out: [Field; N] = std::array::from_fn(|_| Field::zero());
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = Field::from(self.alloc(values.map(|v| v[i])));
        }
        out
    }
}

/// Witnesses `N` values produced by an asynchronous computation.
///
/// `compute` reads whatever it needs from the engine synchronously and
/// returns an owned future. The future is awaited to completion before any
/// variable is allocated, so constraint order is the same as for
/// [`ConstraintSystem::exists`]. Outside witness mode neither the closure nor
/// the future runs.
pub async fn exists_async<CS, const N: usize, F, Fut>(cs: &mut CS, compute: F) -> [Field; N]
where
    CS: ConstraintSystem,
    F: FnOnce(&CS) -> Fut,
    Fut: Future<Output = [BigInt; N]>,
{
    let values = if cs.is_witness_mode() {
        let computed = compute(cs).await;
        Some(computed)
    } else {
        None
    };
    let mut out: [Field; N] = std::array::from_fn(|_| Field::zero());
    for (i, slot) in out.iter_mut().enumerate() {
        let value = values.as_ref().map(|v| fp_from_bigint(&v[i]));
        *slot = Field::from(cs.alloc(value));
    }
    out
}

use ff::Field as _;
use tracing::warn;

use crate::engine::{ConstraintCounts, ConstraintSystem, RANGE_CHECK_BITS};
use crate::field::{fp_to_biguint, Fp, LinearCombination, Variable};

/// Witness-mode engine that checks every constraint as it is emitted.
///
/// Nothing is proven; the engine exists to run gadgets end to end in tests
/// and report the first constraint the witness violates.
#[derive(Debug, Default)]
pub struct TestConstraintSystem {
    values: Vec<Fp>,
    counts: ConstraintCounts,
    unsatisfied: Option<String>,
}

impl TestConstraintSystem {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_satisfied(&self) -> bool {
        self.unsatisfied.is_none()
    }

    /// Description of the first violated constraint.
    pub fn which_is_unsatisfied(&self) -> Option<&str> {
        self.unsatisfied.as_deref()
    }

    fn evaluate(&self, lc: &LinearCombination) -> Fp {
        lc.evaluate(|v| self.values.get(v.index()).copied())
            .unwrap_or(Fp::ZERO)
    }

    fn fail(&mut self, describe: impl FnOnce() -> String) {
        if self.unsatisfied.is_some() {
            return;
        }
        let what = describe();
        warn!(
            constraint = self.counts.constraints,
            range_check = self.counts.range_checks,
            "unsatisfied: {what}"
        );
        self.unsatisfied = Some(what);
    }
}

impl ConstraintSystem for TestConstraintSystem {
    #[inline]
    fn is_witness_mode(&self) -> bool {
        true
    }

    fn alloc(&mut self, value: Option<Fp>) -> Variable {
        let v = Variable(self.values.len());
        self.values.push(value.unwrap_or(Fp::ZERO));
        self.counts.variables += 1;
        v
    }

    fn eval(&self, lc: &LinearCombination) -> Option<Fp> {
        Some(self.evaluate(lc))
    }

    fn enforce_zero(&mut self, lc: LinearCombination) {
        self.counts.constraints += 1;
        let value = self.evaluate(&lc);
        if !bool::from(value.is_zero()) {
            let index = self.counts.constraints - 1;
            self.fail(|| format!("linear constraint #{index} evaluates to {value:?}"));
        }
    }

    fn enforce_mul(&mut self, a: LinearCombination, b: LinearCombination, c: LinearCombination) {
        self.counts.constraints += 1;
        let (a, b, c) = (self.evaluate(&a), self.evaluate(&b), self.evaluate(&c));
        if a * b != c {
            let index = self.counts.constraints - 1;
            self.fail(|| format!("multiplication #{index}: {a:?} * {b:?} != {c:?}"));
        }
    }

    fn enforce_range_check(&mut self, limbs: [LinearCombination; 3]) {
        self.counts.range_checks += 1;
        for (i, limb) in limbs.iter().enumerate() {
            let value = fp_to_biguint(&self.evaluate(limb));
            if value.bits() > RANGE_CHECK_BITS as u64 {
                let index = self.counts.range_checks - 1;
                self.fail(|| format!("range check #{index}: limb {i} = {value:#x} exceeds 88 bits"));
            }
        }
    }

    fn enforce_range_check_bits(&mut self, lc: LinearCombination, bits: usize) {
        self.counts.bit_checks += 1;
        let value = fp_to_biguint(&self.evaluate(&lc));
        if bits > RANGE_CHECK_BITS || value.bits() > bits as u64 {
            let index = self.counts.bit_checks - 1;
            self.fail(|| format!("bit check #{index}: {value:#x} exceeds {bits} bits"));
        }
    }

    fn counts(&self) -> ConstraintCounts {
        self.counts
    }
}

use crate::engine::{ConstraintCounts, ConstraintSystem};
use crate::field::{Fp, LinearCombination, Variable};

/// Engine that only records the shape of a circuit.
///
/// Witness closures never run and values are never available, which is the
/// situation a backend is in when it compiles a circuit before any input is
/// known.
#[derive(Debug, Default)]
pub struct ShapeConstraintSystem {
    counts: ConstraintCounts,
}

impl ShapeConstraintSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConstraintSystem for ShapeConstraintSystem {
    #[inline]
    fn is_witness_mode(&self) -> bool {
        false
    }

    fn alloc(&mut self, _value: Option<Fp>) -> Variable {
        let v = Variable(self.counts.variables);
        self.counts.variables += 1;
        v
    }

    fn eval(&self, _lc: &LinearCombination) -> Option<Fp> {
        None
    }

    fn enforce_zero(&mut self, _lc: LinearCombination) {
        self.counts.constraints += 1;
    }

    fn enforce_mul(&mut self, _a: LinearCombination, _b: LinearCombination, _c: LinearCombination) {
        self.counts.constraints += 1;
    }

    fn enforce_range_check(&mut self, _limbs: [LinearCombination; 3]) {
        self.counts.range_checks += 1;
    }

    fn enforce_range_check_bits(&mut self, _lc: LinearCombination, _bits: usize) {
        self.counts.bit_checks += 1;
    }

    fn counts(&self) -> ConstraintCounts {
        self.counts
    }
}

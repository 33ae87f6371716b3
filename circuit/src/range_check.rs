use crate::engine::{ConstraintSystem, RANGE_CHECK_BITS};
use crate::error::{GadgetError, Result};
use crate::field::{fp_to_biguint, Field};
use crate::limbs::Field3;

/// Proves each of the three values lies in `[0, 2^88)`, with one gate.
pub fn multi_range_check<CS: ConstraintSystem>(cs: &mut CS, limbs: &[Field; 3]) -> Result<()> {
    if limbs.iter().all(Field::is_constant) {
        for (i, limb) in limbs.iter().enumerate() {
            let value = fp_to_biguint(&cs.value(limb));
            if value.bits() > RANGE_CHECK_BITS as u64 {
                return Err(GadgetError::ConstantAssertion(format!(
                    "range check: limb {i} = {value:#x} exceeds 88 bits"
                )));
            }
        }
        return Ok(());
    }
    cs.enforce_range_check([limbs[0].lc(), limbs[1].lc(), limbs[2].lc()]);
    Ok(())
}

pub fn range_check_field3<CS: ConstraintSystem>(cs: &mut CS, x: &Field3) -> Result<()> {
    multi_range_check(cs, x.limbs())
}

/// Range checks any number of values, three per gate.
///
/// A partial last gate is padded with zero. `N` values cost `⌈N/3⌉` gates.
pub fn range_check_batched<CS: ConstraintSystem>(cs: &mut CS, values: &[Field]) -> Result<()> {
    for chunk in values.chunks(3) {
        let limbs: [Field; 3] =
            std::array::from_fn(|i| chunk.get(i).cloned().unwrap_or_else(Field::zero));
        multi_range_check(cs, &limbs)?;
    }
    Ok(())
}

/// Proves `x < 2^bits` for `bits <= 88`.
pub fn range_check_bits<CS: ConstraintSystem>(cs: &mut CS, x: &Field, bits: usize) -> Result<()> {
    if bits > RANGE_CHECK_BITS {
        return Err(GadgetError::OutOfRange(format!(
            "single-value range check supports at most 88 bits, got {bits}"
        )));
    }
    match x {
        Field::Constant(c) => {
            let value = fp_to_biguint(c);
            if value.bits() > bits as u64 {
                return Err(GadgetError::ConstantAssertion(format!(
                    "range check: {value:#x} exceeds {bits} bits"
                )));
            }
            Ok(())
        }
        Field::Variable(lc) => {
            cs.enforce_range_check_bits(lc.clone(), bits);
            Ok(())
        }
    }
}

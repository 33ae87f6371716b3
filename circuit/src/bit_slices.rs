//! Bit decomposition and scalar windowing.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::basic::assert_equal;
use crate::engine::ConstraintSystem;
use crate::error::{GadgetError, Result};
use crate::field::{fp_to_biguint, pow2, Bool, Field};
use crate::limbs::{Field3, LIMB_BITS, THREE_LIMB_BITS};

/// Largest bit decomposition of a single native value.
const MAX_NATIVE_BITS: usize = 253;

/// Little-endian bits of `x`, proving `x < 2^bits`.
pub fn witness_bits<CS: ConstraintSystem>(cs: &mut CS, x: &Field, bits: usize) -> Result<Vec<Bool>> {
    if bits > MAX_NATIVE_BITS {
        return Err(GadgetError::OutOfRange(format!(
            "cannot decompose a native value into {bits} bits"
        )));
    }
    if let Field::Constant(c) = x {
        let value = fp_to_biguint(c);
        if value.bits() > bits as u64 {
            return Err(GadgetError::ConstantAssertion(format!(
                "{value:#x} does not fit in {bits} bits"
            )));
        }
        return Ok((0..bits).map(|i| Bool::constant(value.bit(i as u64))).collect());
    }

    let fields = cs.exists_vec(bits, |cs| {
        let value = fp_to_biguint(&cs.value(x));
        (0..bits)
            .map(|i| BigInt::from(u8::from(value.bit(i as u64))))
            .collect()
    });
    let mut out = Vec::with_capacity(bits);
    for b in fields {
        cs.enforce_boolean(b.lc());
        out.push(Bool::from_field_unchecked(b));
    }
    assert_equal(cs, &field_from_bits(&out), x)?;
    Ok(out)
}

/// `Σ 2^i · bᵢ`
pub fn field_from_bits(bits: &[Bool]) -> Field {
    bits.iter()
        .enumerate()
        .fold(Field::zero(), |acc, (i, b)| acc + b.field().scale(pow2(i)))
}

/// Packs up to 264 little-endian bits into limbs. No constraints.
pub fn field3_from_bits(bits: &[Bool]) -> Result<Field3> {
    if bits.len() > THREE_LIMB_BITS {
        return Err(GadgetError::OutOfRange(format!(
            "{} bits do not fit in three limbs",
            bits.len()
        )));
    }
    let mut limbs: [Field; 3] = std::array::from_fn(|_| Field::zero());
    for (limb, chunk) in limbs.iter_mut().zip(bits.chunks(LIMB_BITS)) {
        *limb = field_from_bits(chunk);
    }
    Ok(Field3(limbs))
}

/// Proves `x < 2^max_bits` and cuts it into little-endian windows.
///
/// Chunk `k` covers bits `[k·w, (k+1)·w)`; there are `⌈max_bits / w⌉` chunks
/// and the last one may be shorter. Limbs above `max_bits` are forced to
/// zero. The limbs of `x` are assumed to be 88-bit values already.
pub fn slice_field3<CS: ConstraintSystem>(
    cs: &mut CS,
    x: &Field3,
    max_bits: usize,
    chunk_size: usize,
) -> Result<Vec<Field>> {
    if chunk_size == 0 {
        return Err(GadgetError::InvalidWindowSize(chunk_size));
    }
    if max_bits > THREE_LIMB_BITS {
        return Err(GadgetError::OutOfRange(format!(
            "cannot slice {max_bits} bits out of three limbs"
        )));
    }

    if let Some(value) = x.to_bigint() {
        if value.bits() > max_bits as u64 {
            return Err(GadgetError::ConstantAssertion(format!(
                "scalar {value:#x} exceeds {max_bits} bits"
            )));
        }
        let mask = (BigUint::one() << chunk_size) - 1u32;
        return Ok((0..max_bits.div_ceil(chunk_size))
            .map(|k| Field::from_biguint(&((&value >> (k * chunk_size)) & &mask)))
            .collect());
    }

    let mut bits = Vec::with_capacity(max_bits);
    for (i, limb) in x.limbs().iter().enumerate() {
        let limb_bits = max_bits.saturating_sub(i * LIMB_BITS).min(LIMB_BITS);
        if limb_bits == 0 {
            assert_equal(cs, limb, &Field::zero())?;
            continue;
        }
        bits.extend(witness_bits(cs, limb, limb_bits)?);
    }
    Ok(bits.chunks(chunk_size).map(field_from_bits).collect())
}

/// Integer value of a chunk list, for tests and witness code.
pub(crate) fn combine_chunks(chunks: &[BigUint], chunk_size: usize) -> BigUint {
    chunks
        .iter()
        .rev()
        .fold(BigUint::zero(), |acc, c| (acc << chunk_size) + c)
}

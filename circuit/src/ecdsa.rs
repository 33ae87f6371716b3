//! ECDSA verification in the circuit.
//!
//! An invalid signature is a normal outcome and comes back as a `false`
//! [`Bool`]. Non-canonical `s` and the zero scalars `r = 0`, `s = 0` leave
//! the circuit unsatisfiable instead.

use curve::{CurveArithmetic, WeierstrassCurve};
use signatures::ecdsa::{self, Signature};
use tracing::debug;

use crate::basic::equal;
use crate::config::{EcdsaConfig, MsmMode};
use crate::engine::ConstraintSystem;
use crate::error::Result;
use crate::field::{Bool, Field};
use crate::foreign_field::{assert_less_than, inv, mul, reduce};
use crate::limbs::Field3;
use crate::msm::multi_scalar_mul;
use crate::point::Point;
use crate::provable::{check_len, Provable};

pub use signatures::ecdsa::sign;

/// An ECDSA signature with foreign scalars.
#[derive(Clone, Debug, PartialEq)]
pub struct EcdsaSignature {
    pub r: Field3,
    pub s: Field3,
}

impl EcdsaSignature {
    pub fn new(r: Field3, s: Field3) -> Self {
        EcdsaSignature { r, s }
    }

    pub fn from_signature(sig: &Signature) -> Result<Self> {
        Ok(EcdsaSignature {
            r: Field3::from_bigint(&sig.r)?,
            s: Field3::from_bigint(&sig.s)?,
        })
    }

    /// Parses the `0x`-prefixed hex form, see [`Signature::from_hex`].
    pub fn from_hex(raw: &str) -> Result<Self> {
        Self::from_signature(&Signature::from_hex(raw)?)
    }

    pub fn to_signature(&self) -> Option<Signature> {
        Some(Signature::new(self.r.to_bigint()?, self.s.to_bigint()?))
    }

    pub fn value<CS: ConstraintSystem>(&self, cs: &CS) -> Signature {
        Signature::new(self.r.value(cs), self.s.value(cs))
    }

    /// Witnesses `r` and `s` without range checks.
    pub fn witness<CS: ConstraintSystem>(cs: &mut CS, compute: impl FnOnce(&CS) -> Signature) -> Self {
        let [r, s] = Field3::witness_many(cs, |cs| {
            let sig = compute(cs);
            [sig.r, sig.s]
        });
        EcdsaSignature { r, s }
    }
}

impl Provable for EcdsaSignature {
    const SIZE: usize = 6;

    fn to_fields(&self) -> Vec<Field> {
        self.r.0.iter().chain(self.s.0.iter()).cloned().collect()
    }

    fn from_fields(fields: &[Field]) -> Result<Self> {
        check_len(fields, Self::SIZE)?;
        Ok(EcdsaSignature {
            r: Field3::from_fields(&fields[..3])?,
            s: Field3::from_fields(&fields[3..])?,
        })
    }

    fn is_constant(&self) -> bool {
        self.r.is_constant() && self.s.is_constant()
    }
}

/// Whether `sig` is a valid signature on `msg_hash` under `pk`.
///
/// Inputs must have range-checked limbs. `msg_hash` and `sig.r` must also be
/// almost reduced modulo the group order, since they enter foreign
/// multiplications, and `pk` must be an almost reduced curve point; the
/// public key is not validated further. With all inputs
/// constant the check runs off-circuit and costs nothing.
pub fn verify<CS: ConstraintSystem>(
    cs: &mut CS,
    curve: &WeierstrassCurve,
    sig: &EcdsaSignature,
    msg_hash: &Field3,
    pk: &Point,
    config: &EcdsaConfig,
) -> Result<Bool> {
    if let (Some(sig), Some(h), Some(pk)) = (sig.to_signature(), msg_hash.to_bigint(), pk.to_affine()) {
        debug!(curve = curve.name, "verifying constant ecdsa signature");
        return Ok(Bool::constant(ecdsa::verify(curve, &sig, &h, &pk)));
    }
    debug!(
        curve = curve.name,
        g_window = config.g.window_size,
        p_window = config.p.window_size,
        "verifying ecdsa signature in circuit"
    );

    let n = curve.order();
    // both inverses prove their input non-zero
    inv(cs, &sig.r, n)?;
    let s_inv = inv(cs, &sig.s, n)?;
    let u1 = mul(cs, msg_hash, &s_inv, n)?;
    let u2 = mul(cs, &sig.r, &s_inv, n)?;

    let g = Point::from_affine(curve.generator())?;
    let big_r = multi_scalar_mul(
        cs,
        curve,
        &[u1, u2],
        &[g, pk.clone()],
        &[config.g.clone(), config.p.clone()],
        Some(MsmMode::AssertNonZero),
        config.ia.as_ref(),
    )?;

    let rx = reduce(cs, &big_r.x, n)?;
    assert_less_than(cs, &rx, n)?;
    assert_less_than(cs, &sig.s, n)?;
    equal(cs, &rx, &sig.r)
}

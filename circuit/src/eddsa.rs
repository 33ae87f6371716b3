//! EdDSA verification in the circuit.
//!
//! The challenge `k = H(R, A, msg)` is computed by the caller, so the
//! gadget only proves `s·B - k·A = R` over the twisted curve.

use curve::{CurveArithmetic, TwistedEdwardsCurve};
use signatures::eddsa::Signature;
use tracing::debug;

use crate::basic::equal;
use crate::config::TableConfig;
use crate::engine::ConstraintSystem;
use crate::error::Result;
use crate::field::{Bool, Field};
use crate::foreign_field::{assert_less_than, to_canonical};
use crate::limbs::Field3;
use crate::msm::{multi_scalar_mul, CurveGadget};
use crate::point::Point;
use crate::provable::{check_len, Provable};

pub use signatures::eddsa::challenge;

/// An EdDSA signature: commitment `R` and response `s`.
#[derive(Clone, Debug, PartialEq)]
pub struct EddsaSignature {
    pub r: Point,
    pub s: Field3,
}

impl EddsaSignature {
    pub fn from_signature(sig: &Signature) -> Result<Self> {
        Ok(EddsaSignature {
            r: Point::from_affine(&sig.r)?,
            s: Field3::from_bigint(&sig.s)?,
        })
    }

    pub fn to_signature(&self) -> Option<Signature> {
        Some(Signature {
            r: self.r.to_affine()?,
            s: self.s.to_bigint()?,
        })
    }

    /// Witnesses `R` and `s` without range checks.
    pub fn witness<CS: ConstraintSystem>(cs: &mut CS, compute: impl FnOnce(&CS) -> Signature) -> Self {
        let [x, y, s] = Field3::witness_many(cs, |cs| {
            let sig = compute(cs);
            [sig.r.x, sig.r.y, sig.s]
        });
        EddsaSignature {
            r: Point::new(x, y),
            s,
        }
    }
}

impl Provable for EddsaSignature {
    const SIZE: usize = 9;

    fn to_fields(&self) -> Vec<Field> {
        let mut fields = self.r.to_fields();
        fields.extend(self.s.to_fields());
        fields
    }

    fn from_fields(fields: &[Field]) -> Result<Self> {
        check_len(fields, Self::SIZE)?;
        Ok(EddsaSignature {
            r: Point::from_fields(&fields[..6])?,
            s: Field3::from_fields(&fields[6..])?,
        })
    }

    fn is_constant(&self) -> bool {
        self.r.is_constant() && self.s.is_constant()
    }
}

/// Whether `s·B = R + k·A` for the challenge `k`.
///
/// `s ≥ ℓ` is a hard failure. `R` and `pk` must be almost reduced curve
/// points with range-checked limbs, and `k` must be reduced modulo `ℓ`.
pub fn verify<CS: ConstraintSystem>(
    cs: &mut CS,
    curve: &TwistedEdwardsCurve,
    sig: &EddsaSignature,
    pk: &Point,
    challenge: &Field3,
) -> Result<Bool> {
    let order = curve.order();
    assert_less_than(cs, &sig.s, order)?;

    if let (Some(r), Some(s), Some(a), Some(k)) = (
        sig.r.to_affine(),
        sig.s.to_bigint(),
        pk.to_affine(),
        challenge.to_bigint(),
    ) {
        debug!(curve = curve.name, "verifying constant eddsa signature");
        let lhs = curve.scale(curve.generator(), &s);
        let rhs = curve.add(&r, &curve.scale(&a, &k));
        return Ok(Bool::constant(curve.equal(&lhs, &rhs)));
    }
    debug!(curve = curve.name, "verifying eddsa signature in circuit");

    let f = curve.modulus();
    let minus_a = curve.negate_gadget(cs, pk)?;
    let b = Point::from_affine(curve.generator())?;
    let candidate = multi_scalar_mul(
        cs,
        curve,
        &[sig.s.clone(), challenge.clone()],
        &[b, minus_a],
        &[TableConfig::new(4), TableConfig::new(3)],
        None,
        None,
    )?;

    let candidate = Point::new(to_canonical(cs, &candidate.x, f)?, to_canonical(cs, &candidate.y, f)?);
    let r = Point::new(to_canonical(cs, &sig.r.x, f)?, to_canonical(cs, &sig.r.y, f)?);
    equal(cs, &candidate, &r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GadgetError;
    use crate::field::Fp;
    use crate::range_check::range_check_field3;
    use crate::twisted_curve::assert_on_curve;
    use crate::{ShapeConstraintSystem, TestConstraintSystem};
    use curve::{ed25519, Affine};
    use ff::Field as _;
    use num_bigint::BigUint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use signatures::eddsa::sign;
    use signatures::SigningKey;

    const MSG: &[u8] = b"twisted edwards in a circuit";

    fn keypair(curve: &TwistedEdwardsCurve, seed: u64) -> (SigningKey, Affine) {
        let mut rng = StdRng::seed_from_u64(seed);
        let key = SigningKey::random(curve, &mut rng);
        let pk = key.verifying_key(curve).point().clone();
        (key, pk)
    }

    fn verify_witnessed<CS: ConstraintSystem>(
        cs: &mut CS,
        curve: &TwistedEdwardsCurve,
        sig: &Signature,
        pk: &Affine,
        k: &BigUint,
    ) -> Bool {
        let sigv = EddsaSignature::witness(cs, |_| sig.clone());
        let pkv = Point::witness(cs, |_| pk.clone());
        let kv = Field3::witness(cs, |_| k.clone());
        for x in [&sigv.s, &kv] {
            range_check_field3(cs, x).unwrap();
        }
        assert_on_curve(cs, curve, &sigv.r).unwrap();
        assert_on_curve(cs, curve, &pkv).unwrap();
        verify(cs, curve, &sigv, &pkv, &kv).unwrap()
    }

    #[test]
    fn test_valid_signature() {
        let curve = ed25519();
        let (key, pk) = keypair(&curve, 1);
        let sig = sign(&curve, &key, MSG).unwrap();
        let k = challenge(&curve, &sig.r, &pk, MSG);

        let mut cs = TestConstraintSystem::new();
        let ok = verify_witnessed(&mut cs, &curve, &sig, &pk, &k);
        assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());
        assert_eq!(cs.value(ok.field()), Fp::ONE);
    }

    #[test]
    fn test_wrong_message_is_provably_invalid() {
        let curve = ed25519();
        let (key, pk) = keypair(&curve, 2);
        let sig = sign(&curve, &key, MSG).unwrap();
        let k = challenge(&curve, &sig.r, &pk, b"another message");

        let mut cs = TestConstraintSystem::new();
        let ok = verify_witnessed(&mut cs, &curve, &sig, &pk, &k);
        assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());
        assert_eq!(cs.value(ok.field()), Fp::ZERO);
    }

    #[test]
    fn test_large_s_is_rejected() {
        let curve = ed25519();
        let (key, pk) = keypair(&curve, 3);
        let mut sig = sign(&curve, &key, MSG).unwrap();
        sig.s += curve.order();
        let k = challenge(&curve, &sig.r, &pk, MSG);

        let mut cs = TestConstraintSystem::new();
        verify_witnessed(&mut cs, &curve, &sig, &pk, &k);
        assert!(!cs.is_satisfied());

        let constant = EddsaSignature::from_signature(&sig).unwrap();
        let pkc = Point::from_affine(&pk).unwrap();
        let kc = Field3::from_bigint(&k).unwrap();
        assert!(matches!(
            verify(&mut cs, &curve, &constant, &pkc, &kc),
            Err(GadgetError::ConstantAssertion(_))
        ));
    }

    #[test]
    fn test_constant_path() {
        let curve = ed25519();
        let (key, pk) = keypair(&curve, 4);
        let sig = sign(&curve, &key, MSG).unwrap();
        let k = challenge(&curve, &sig.r, &pk, MSG);

        let mut cs = TestConstraintSystem::new();
        let sigc = EddsaSignature::from_signature(&sig).unwrap();
        assert_eq!(sigc.to_signature(), Some(sig.clone()));
        let pkc = Point::from_affine(&pk).unwrap();
        let ok = verify(&mut cs, &curve, &sigc, &pkc, &Field3::from_bigint(&k).unwrap()).unwrap();
        assert_eq!(ok.to_constant(), Some(true));
        let wrong = Field3::from_bigint(&(&k + 1u32)).unwrap();
        let bad = verify(&mut cs, &curve, &sigc, &pkc, &wrong).unwrap();
        assert_eq!(bad.to_constant(), Some(false));
        assert_eq!(cs.counts().constraints, 0);
        assert_eq!(EddsaSignature::from_fields(&sigc.to_fields()).unwrap(), sigc);
    }

    #[test]
    fn test_shape_matches() {
        let curve = ed25519();
        let (key, pk) = keypair(&curve, 5);
        let sig = sign(&curve, &key, MSG).unwrap();
        let k = challenge(&curve, &sig.r, &pk, MSG);
        let mut test = TestConstraintSystem::new();
        let mut shape = ShapeConstraintSystem::new();
        verify_witnessed(&mut test, &curve, &sig, &pk, &k);
        verify_witnessed(&mut shape, &curve, &sig, &pk, &k);
        assert!(test.is_satisfied());
        assert_eq!(test.counts(), shape.counts());
    }
}

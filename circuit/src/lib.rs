//! # Foreign-Field Elliptic Curve Gadgets
//!
//! Circuit gadgets for elliptic curve arithmetic and signature verification
//! over curves whose base field is *not* the native field of the proof
//! system. The native field is the Pallas base field; secp256k1, secp256r1,
//! BN254 and Ed25519 coordinates are emulated with three 88-bit limbs.
//!
//! ## Overview
//!
//! Gadgets are plain functions over a [`ConstraintSystem`]. Every gadget has
//! a constant path, taken when all inputs are constants, which computes the
//! result off-circuit with the `curve` crate and emits nothing, and a
//! provable path which witnesses intermediate values and constrains them.
//!
//! **Layers**:
//! - **Native values**: [`Field`], [`Bool`], linear combinations and the
//!   [`basic`] gadgets (equality, selection, array access)
//! - **Limbs**: [`Field3`], multi-range checks and bit slicing
//! - **Foreign fields**: addition chains, multiplication with a witnessed
//!   quotient, inversion, division, comparisons ([`foreign_field`])
//! - **Curves**: Weierstrass and twisted Edwards point gadgets, windowed
//!   multi-scalar multiplication with GLV ([`msm`], [`glv`])
//! - **Signatures**: ECDSA and EdDSA verification ([`ecdsa`], [`eddsa`])
//!
//! ## Quick Start
//!
//! ```rust
//! use circuit::{ecdsa, ConstraintSystem, EcdsaConfig, EcdsaSignature, Field3, Point, TestConstraintSystem};
//! use curve::{secp256k1, CurveArithmetic};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use signatures::SigningKey;
//!
//! let curve = secp256k1();
//! let mut rng = StdRng::seed_from_u64(0);
//! let key = SigningKey::random(&curve, &mut rng);
//! let pk = key.verifying_key(&curve).point().clone();
//! let msg_hash = curve.scalar_field().random(&mut rng);
//! let sig = ecdsa::sign(&curve, &msg_hash, &key, &mut rng).unwrap();
//!
//! let mut cs = TestConstraintSystem::new();
//! let sig = EcdsaSignature::witness(&mut cs, |_| sig.clone());
//! let msg_hash = Field3::witness(&mut cs, |_| msg_hash.clone());
//! let pk = Point::witness(&mut cs, |_| pk.clone());
//! # for x in [&sig.r, &sig.s, &msg_hash] {
//! #     circuit::range_check::range_check_field3(&mut cs, x).unwrap();
//! # }
//! # circuit::elliptic_curve::assert_on_curve(&mut cs, &curve, &pk).unwrap();
//!
//! let valid = ecdsa::verify(&mut cs, &curve, &sig, &msg_hash, &pk, &EcdsaConfig::default()).unwrap();
//! assert!(cs.is_satisfied());
//! assert_eq!(cs.value(valid.field()), circuit::Fp::from(1u64));
//! ```
//!
//! ## Limb Representation
//!
//! ```text
//! x = x0 + x1·2^88 + x2·2^176        x0, x1, x2 ∈ [0, 2^88)
//! ```
//!
//! A value is *almost reduced* modulo `f` when its top limb is at most the
//! top limb of `f`. Multiplication inputs must be almost reduced; outputs
//! are range checked but only bounded by `2^264`, and gadgets that chain
//! them prove the bound where soundness needs it.
//!
//! ## Failure Classes
//!
//! - Structural mistakes (mismatched lengths, bad window sizes, moduli out
//!   of range) and failed checks on constants are [`GadgetError`]s.
//! - Failed checks on variables make the circuit unsatisfiable.
//! - An invalid signature is a `false` [`Bool`], so a prover can show it.
//!
//! ## Engines
//!
//! [`TestConstraintSystem`] runs witness closures and checks every
//! constraint as it is added. [`ShapeConstraintSystem`] skips witness
//! generation and only counts; both report identical [`ConstraintCounts`].
//!
//! ## References
//!
//! - GLV endomorphism: <https://www.iacr.org/archive/crypto2001/21390189.pdf>
//! - Foreign field multiplication: <https://eprint.iacr.org/2022/1470>

pub mod basic;
pub mod bit_slices;
pub mod config;
pub mod ecdsa;
pub mod eddsa;
pub mod elliptic_curve;
pub mod engine;
pub mod error;
pub mod field;
pub mod foreign_field;
pub mod glv;
pub mod limbs;
pub mod msm;
pub mod point;
pub mod provable;
pub mod range_check;
pub mod sum;
pub mod twisted_curve;

mod shape_cs;
mod test_cs;

pub use config::{EcdsaConfig, MsmMode, TableConfig};
pub use ecdsa::EcdsaSignature;
pub use eddsa::EddsaSignature;
pub use engine::{exists_async, ConstraintCounts, ConstraintSystem, RANGE_CHECK_BITS};
pub use error::{GadgetError, Result};
pub use field::{Bool, Field, Fp, LinearCombination, Variable};
pub use limbs::{Field3, LIMB_BITS};
pub use msm::{assert_in_subgroup, multi_scalar_mul, scale, CurveGadget};
pub use point::Point;
pub use provable::Provable;
pub use shape_cs::ShapeConstraintSystem;
pub use sum::{ForeignSum, Sign};
pub use test_cs::TestConstraintSystem;

// Re-export commonly used types
pub use curve::{Affine, TwistedEdwardsCurve, WeierstrassCurve};

#[cfg(test)]
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

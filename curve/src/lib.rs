//! Off-circuit elliptic curve arithmetic over arbitrary-precision integers.
//!
//! This crate provides prime fields, short Weierstrass and twisted Edwards
//! curves, the GLV endomorphism used to halve scalar multiplications, and the
//! hash-to-curve routine that derives the initial aggregator point. Curve
//! parameters are runtime values; the named sets live in the `params` module.
//!
//! It is the reference arithmetic that circuit gadgets use on their constant
//! path and in witness generation.

mod affine;
mod endomorphism;
mod error;
mod field;
mod group;
mod hash_to_curve;
mod msm;
mod params;
mod projective;
mod random;
mod twisted;
mod weierstrass;

pub use affine::Affine;
pub use endomorphism::{divide_and_round, egcd_stop_early, Endomorphism, GlvData, SignedScalar};
pub use error::CurveError;
pub use field::FiniteField;
pub use group::CurveArithmetic;
pub use hash_to_curve::{
    initial_aggregator, random_point, simple_map_to_curve, to_minimal_be_bytes,
    INITIAL_AGGREGATOR_DOMAIN,
};
pub use msm::double_scalar_mul;
pub use params::{bn254, ed25519, secp256k1, secp256r1};
pub use projective::Projective;
pub use random::{random_keypair, RandomField};
pub use twisted::TwistedEdwardsCurve;
pub use weierstrass::WeierstrassCurve;

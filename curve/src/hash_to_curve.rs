//! Deterministic points without known discrete logarithm.
//!
//! Scalar multiplication gadgets start their running sum at a fixed
//! "initial aggregator" point instead of the identity, and subtract its
//! contribution at the end. That point must not have a known discrete
//! logarithm relative to any point the gadgets are used with, so it is
//! derived by hashing the curve parameters.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::{Affine, CurveArithmetic};

/// Domain separation tag for [`initial_aggregator`].
pub const INITIAL_AGGREGATOR_DOMAIN: &[u8] = b"initial-aggregator";

/// Minimal big-endian encoding; zero encodes as the empty string.
pub fn to_minimal_be_bytes(x: &BigUint) -> Vec<u8> {
    if x.is_zero() {
        return Vec::new();
    }
    x.to_bytes_be()
}

/// Hash of the curve identity mapped to a curve point.
///
/// `SHA-256("initial-aggregator" || p || n || c0 || c1)` with every integer in
/// minimal big-endian form, where `(c0, c1)` are the curve's domain
/// coefficients. The digest is read big-endian and reduced mod `p`.
pub fn initial_aggregator<C: CurveArithmetic + ?Sized>(curve: &C) -> Affine {
    let (c0, c1) = curve.domain_coefficients();
    let mut hasher = Sha256::new();
    hasher.update(INITIAL_AGGREGATOR_DOMAIN);
    hasher.update(to_minimal_be_bytes(curve.modulus()));
    hasher.update(to_minimal_be_bytes(curve.order()));
    hasher.update(to_minimal_be_bytes(&c0));
    hasher.update(to_minimal_be_bytes(&c1));
    let digest = hasher.finalize();

    let x = curve.base_field().reduce(&BigUint::from_bytes_be(&digest));
    simple_map_to_curve(curve, &x)
}

/// Increment `x` until `curve_rhs(x)` is a square and return that point.
///
/// The smaller of the two square roots is used. When the curve has a
/// cofactor the result is multiplied by it.
pub fn simple_map_to_curve<C: CurveArithmetic + ?Sized>(curve: &C, x: &BigUint) -> Affine {
    let field = curve.base_field();
    let mut x = x.clone();
    let y = loop {
        x = field.add(&x, &BigUint::from(1u32));
        let Some(y2) = curve.curve_rhs(&x) else {
            continue;
        };
        if let Some(y) = field.sqrt(&y2) {
            let other = field.neg(&y);
            break y.min(other);
        }
    };

    let p = Affine::new(x, y);
    match curve.cofactor() {
        Some(cofactor) => curve.scale(&p, cofactor),
        None => p,
    }
}

/// Random point in the prime-order subgroup.
pub fn random_point<C: CurveArithmetic + ?Sized, R: Rng + ?Sized>(curve: &C, rng: &mut R) -> Affine {
    let x = curve.base_field().random(rng);
    simple_map_to_curve(curve, &x)
}

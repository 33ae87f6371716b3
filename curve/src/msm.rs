use num_bigint::BigUint;

use crate::{Affine, CurveArithmetic};

/// Compute `a * G + b * P` with interleaved doublings (Shamir's trick).
///
/// `G + P` is precomputed, so each bit costs one doubling and at most one
/// addition.
pub fn double_scalar_mul<C: CurveArithmetic + ?Sized>(
    curve: &C,
    a: &BigUint,
    g: &Affine,
    b: &BigUint,
    point: &Affine,
) -> Affine {
    let g_plus_p = curve.add(g, point);
    let bits = a.bits().max(b.bits());
    let mut result = curve.zero();

    for i in (0..bits).rev() {
        result = curve.double(&result);
        match (a.bit(i), b.bit(i)) {
            (true, true) => result = curve.add(&result, &g_plus_p),
            (true, false) => result = curve.add(&result, g),
            (false, true) => result = curve.add(&result, point),
            (false, false) => {}
        }
    }

    result
}

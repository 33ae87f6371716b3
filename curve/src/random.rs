use num_bigint::BigUint;
use rand::Rng;

use crate::{CurveArithmetic, FiniteField};

/// Helper trait for sampling random field elements and scalars.
pub trait RandomField {
    fn random_element<R: Rng + ?Sized>(&self, rng: &mut R) -> BigUint;
}

impl RandomField for FiniteField {
    #[inline]
    fn random_element<R: Rng + ?Sized>(&self, rng: &mut R) -> BigUint {
        self.random(rng)
    }
}

/// Random `(secret, secret·G)` pair.
pub fn random_keypair<C: CurveArithmetic, R: Rng + ?Sized>(
    curve: &C,
    rng: &mut R,
) -> (BigUint, crate::Affine) {
    let secret = curve.random_scalar(rng);
    let public = curve.scale(curve.generator(), &secret);
    (secret, public)
}

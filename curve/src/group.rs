use num_bigint::BigUint;
use num_traits::Zero;

use crate::{Affine, FiniteField};

/// Group law shared by the supported curve families.
///
/// Implementors hold their parameters at runtime, so every operation takes
/// `&self`. Points are plain [`Affine`] values.
pub trait CurveArithmetic {
    fn base_field(&self) -> &FiniteField;
    fn scalar_field(&self) -> &FiniteField;
    fn cofactor(&self) -> Option<&BigUint>;
    fn generator(&self) -> &Affine;

    /// The two curve coefficients that identify the curve for hashing:
    /// `(a, b)` for Weierstrass, `(a, d)` for twisted Edwards.
    fn domain_coefficients(&self) -> (BigUint, BigUint);

    fn zero(&self) -> Affine;
    fn is_zero(&self, p: &Affine) -> bool;
    fn is_on_curve(&self, p: &Affine) -> bool;
    fn add(&self, p: &Affine, q: &Affine) -> Affine;
    fn double(&self, p: &Affine) -> Affine;
    fn negate(&self, p: &Affine) -> Affine;

    /// `y^2` as a function of `x`, or `None` where it is undefined.
    fn curve_rhs(&self, x: &BigUint) -> Option<BigUint>;

    #[inline]
    fn modulus(&self) -> &BigUint {
        self.base_field().modulus()
    }

    #[inline]
    fn order(&self) -> &BigUint {
        self.scalar_field().modulus()
    }

    fn equal(&self, p: &Affine, q: &Affine) -> bool {
        match (self.is_zero(p), self.is_zero(q)) {
            (true, true) => true,
            (false, false) => p.x == q.x && p.y == q.y,
            _ => false,
        }
    }

    /// Plain double-and-add, most significant bit first.
    fn scale(&self, p: &Affine, k: &BigUint) -> Affine {
        let mut result = self.zero();
        let bits = k.bits();
        for i in (0..bits).rev() {
            result = self.double(&result);
            if k.bit(i) {
                result = self.add(&result, p);
            }
        }
        result
    }

    fn multi_scalar_mul(&self, points: &[Affine], scalars: &[BigUint]) -> Affine {
        points
            .iter()
            .zip(scalars.iter())
            .fold(self.zero(), |acc, (p, s)| self.add(&acc, &self.scale(p, s)))
    }

    /// `order * P == 0`. Trivially true for prime-order curves.
    fn is_in_subgroup(&self, p: &Affine) -> bool {
        match self.cofactor() {
            None => true,
            Some(_) => self.is_zero(&self.scale(p, self.order())),
        }
    }

    /// Random scalar in `[1, n)`.
    fn random_scalar<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> BigUint
    where
        Self: Sized,
    {
        self.scalar_field().random_nonzero(rng)
    }

    /// `true` when `k` lies in `[1, n)`.
    fn is_valid_scalar(&self, k: &BigUint) -> bool {
        !k.is_zero() && k < self.order()
    }
}

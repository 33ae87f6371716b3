use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::{Affine, FiniteField};

/// Jacobian point on a short Weierstrass curve.
/// Represents (X:Y:Z) with (x,y) = (X/Z^2, Y/Z^3); infinity has Z = 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projective {
    pub x: BigUint,
    pub y: BigUint,
    pub z: BigUint,
}

impl Projective {
    /// The point at infinity (identity element): (1:1:0)
    pub fn infinity() -> Self {
        Projective {
            x: BigUint::one(),
            y: BigUint::one(),
            z: BigUint::zero(),
        }
    }

    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    pub fn from_affine(point: &Affine) -> Self {
        if point.is_infinity() {
            return Self::infinity();
        }
        Projective {
            x: point.x.clone(),
            y: point.y.clone(),
            z: BigUint::one(),
        }
    }

    pub fn to_affine(&self, field: &FiniteField) -> Affine {
        let Some(z_inv) = field.inverse(&self.z) else {
            return Affine::infinity();
        };
        let z_inv2 = field.square(&z_inv);
        let z_inv3 = field.mul(&z_inv2, &z_inv);
        Affine::new(field.mul(&self.x, &z_inv2), field.mul(&self.y, &z_inv3))
    }

    pub fn negate(&self, field: &FiniteField) -> Self {
        Projective {
            x: self.x.clone(),
            y: field.neg(&self.y),
            z: self.z.clone(),
        }
    }

    /// Doubling for a general `a` coefficient.
    pub fn double(&self, field: &FiniteField, a: &BigUint) -> Self {
        if self.is_infinity() || self.y.is_zero() {
            return Self::infinity();
        }
        let f = field;
        let xx = f.square(&self.x);
        let yy = f.square(&self.y);
        let yyyy = f.square(&yy);
        let zz = f.square(&self.z);

        // S = 4*X*Y^2, M = 3*X^2 + a*Z^4
        let s = f.mul(&BigUint::from(4u32), &f.mul(&self.x, &yy));
        let mut m = f.mul(&BigUint::from(3u32), &xx);
        if !a.is_zero() {
            m = f.add(&m, &f.mul(a, &f.square(&zz)));
        }

        let x3 = f.sub(&f.square(&m), &f.add(&s, &s));
        let y3 = f.sub(
            &f.mul(&m, &f.sub(&s, &x3)),
            &f.mul(&BigUint::from(8u32), &yyyy),
        );
        let z3 = f.mul(&BigUint::from(2u32), &f.mul(&self.y, &self.z));

        Projective {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    pub fn add(&self, other: &Self, field: &FiniteField, a: &BigUint) -> Self {
        if self.is_infinity() {
            return other.clone();
        }
        if other.is_infinity() {
            return self.clone();
        }
        let f = field;
        let z1z1 = f.square(&self.z);
        let z2z2 = f.square(&other.z);
        let u1 = f.mul(&self.x, &z2z2);
        let u2 = f.mul(&other.x, &z1z1);
        let s1 = f.mul(&self.y, &f.mul(&other.z, &z2z2));
        let s2 = f.mul(&other.y, &f.mul(&self.z, &z1z1));

        if u1 == u2 {
            if s1 == s2 {
                return self.double(field, a);
            }
            return Self::infinity();
        }

        let h = f.sub(&u2, &u1);
        let r = f.sub(&s2, &s1);
        let hh = f.square(&h);
        let hhh = f.mul(&hh, &h);
        let v = f.mul(&u1, &hh);

        let x3 = f.sub(&f.sub(&f.square(&r), &hhh), &f.add(&v, &v));
        let y3 = f.sub(&f.mul(&r, &f.sub(&v, &x3)), &f.mul(&s1, &hhh));
        let z3 = f.mul(&h, &f.mul(&self.z, &other.z));

        Projective {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Double-and-add over the bits of `k`.
    pub fn scale(&self, k: &BigUint, field: &FiniteField, a: &BigUint) -> Self {
        let mut result = Self::infinity();
        for i in (0..k.bits()).rev() {
            result = result.double(field, a);
            if k.bit(i) {
                result = result.add(self, field, a);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{secp256k1, secp256r1, CurveArithmetic};

    #[test]
    fn test_conversion_affine_projective() {
        let curve = secp256k1();
        let g = curve.generator().clone();
        let g_proj = Projective::from_affine(&g);
        assert_eq!(g_proj.to_affine(curve.base_field()), g);
        assert!(Projective::infinity()
            .to_affine(curve.base_field())
            .is_infinity());
    }

    #[test]
    fn test_point_doubling_matches_affine() {
        // P-256 has a = -3, exercising the a*Z^4 term
        let curve = secp256r1();
        let g = curve.generator().clone();
        let doubled = Projective::from_affine(&g)
            .double(curve.base_field(), &curve.a)
            .to_affine(curve.base_field());
        assert_eq!(doubled, curve.double(&g));
    }

    #[test]
    fn test_point_addition_with_negation_is_infinity() {
        let curve = secp256k1();
        let field = curve.base_field();
        let g = Projective::from_affine(curve.generator());
        let sum = g.add(&g.negate(field), field, &curve.a);
        assert!(sum.is_infinity());
    }

    #[test]
    fn test_affine_projective_scalar_mul_consistency() {
        let curve = secp256r1();
        let g = curve.generator().clone();
        let k = BigUint::from(123456u64);
        let projective = Projective::from_affine(&g)
            .scale(&k, curve.base_field(), &curve.a)
            .to_affine(curve.base_field());

        let mut affine = Affine::infinity();
        for i in (0..k.bits()).rev() {
            affine = curve.double(&affine);
            if k.bit(i) {
                affine = curve.add(&affine, &g);
            }
        }
        assert_eq!(projective, affine);
    }
}

//! GLV endomorphism for curves with `a = 0` over fields with cube roots of unity.
//!
//! Such curves have an efficiently computable endomorphism
//! `φ(x, y) = (β·x, y)` acting as multiplication by a scalar `λ`, where
//! `β³ = 1 (mod p)` and `λ³ = 1 (mod n)`. Any scalar `s` can be written as
//! `s = s0 + s1·λ (mod n)` with `|s0|, |s1|` of roughly half the bit length of
//! `n` (Gallant, Lambert, Vanstone), so `s·P = s0·P + s1·φ(P)` needs only half
//! as many doublings.
//!
//! The decomposition uses a short lattice basis `v00, v01, v10, v11` with
//! `v0j + λ·v1j = 0 (mod n)`. For a scalar `s` we pick integers `x0, x1`
//! close to the rational solution of
//!
//! ```text
//! x0 v00 + x1 v01 = -s
//! x0 v10 + x1 v11 = 0
//! ```
//!
//! and set `s0 = x0 v00 + x1 v01 + s`, `s1 = x0 v10 + x1 v11`. The rounding
//! error is at most 1/2, which bounds `|s0| <= (|v00| + |v01|) / 2` and
//! `|s1| <= (|v10| + |v11|) / 2`.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::projective::Projective;
use crate::{Affine, CurveArithmetic, CurveError, WeierstrassCurve};

/// Absolute value and sign of one half of a decomposed scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedScalar {
    pub abs: BigUint,
    pub is_negative: bool,
}

impl SignedScalar {
    fn from_bigint(value: &BigInt) -> Self {
        SignedScalar {
            abs: value.magnitude().clone(),
            is_negative: value.is_negative(),
        }
    }

    pub fn to_bigint(&self) -> BigInt {
        let abs = BigInt::from_biguint(Sign::Plus, self.abs.clone());
        if self.is_negative {
            -abs
        } else {
            abs
        }
    }
}

/// Lattice basis and bounds used by [`Endomorphism::decompose`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlvData {
    pub v00: BigInt,
    pub v01: BigInt,
    pub v10: BigInt,
    pub v11: BigInt,
    pub det: BigInt,
    pub max_s0: BigUint,
    pub max_s1: BigUint,
    pub max_bits: usize,
}

impl GlvData {
    /// Compute the lattice basis and the bounds on `|s0|`, `|s1|`.
    pub fn compute(order: &BigUint, lambda: &BigUint) -> Self {
        let [[v00, v01], [v10, v11]] = egcd_stop_early(lambda, order);
        let det = &v00 * &v11 - &v10 * &v01;

        let max_s0: BigUint = ((v00.magnitude() + v01.magnitude()) >> 1) + 1u32;
        let max_s1: BigUint = ((v10.magnitude() + v11.magnitude()) >> 1) + 1u32;
        let max_bits = ceil_log2(max_s0.clone().max(max_s1.clone()));

        GlvData {
            v00,
            v01,
            v10,
            v11,
            det,
            max_s0,
            max_s1,
            max_bits,
        }
    }
}

/// Cube-root endomorphism data of a Weierstrass curve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endomorphism {
    /// `β`, a cube root of unity in the base field.
    pub base: BigUint,
    /// `λ`, the matching cube root of unity in the scalar field.
    pub scalar: BigUint,
    pub glv: GlvData,
}

impl Endomorphism {
    /// Find `λ` and `β` for the given curve, or explain why there are none.
    pub fn compute(curve: &WeierstrassCurve) -> Result<Self, CurveError> {
        let (base, scalar) = compute_endo_constants(curve)?;
        let glv = GlvData::compute(curve.order(), &scalar);
        Ok(Endomorphism { base, scalar, glv })
    }

    /// Upper bound on the bit length of both halves of a decomposition.
    #[inline]
    pub fn decompose_max_bits(&self) -> usize {
        self.glv.max_bits
    }

    /// `φ(P) = (β·x, y)`.
    pub fn apply(&self, curve: &WeierstrassCurve, p: &Affine) -> Affine {
        if p.is_infinity() {
            return p.clone();
        }
        Affine::new(curve.field.mul(&self.base, &p.x), p.y.clone())
    }

    /// Split `s` into `s0 + s1·λ`.
    pub fn decompose(&self, s: &BigUint) -> [SignedScalar; 2] {
        let GlvData {
            v00,
            v01,
            v10,
            v11,
            det,
            ..
        } = &self.glv;
        let s = BigInt::from_biguint(Sign::Plus, s.clone());

        let x0 = divide_and_round(&(-v11 * &s), det);
        let x1 = divide_and_round(&(v10 * &s), det);
        let s0 = v00 * &x0 + v01 * &x1 + &s;
        let s1 = v10 * &x0 + v11 * &x1;

        [SignedScalar::from_bigint(&s0), SignedScalar::from_bigint(&s1)]
    }

    /// `s·P` with both decomposed halves scanned jointly.
    pub fn scale(&self, curve: &WeierstrassCurve, p: &Affine, s: &BigUint) -> Affine {
        let field = &curve.field;
        let a = &curve.a;
        let [s0, s1] = self.decompose(s);

        let mut g = Projective::from_affine(p);
        let mut endo_g = Projective::from_affine(&self.apply(curve, p));
        if s0.is_negative {
            g = g.negate(field);
        }
        if s1.is_negative {
            endo_g = endo_g.negate(field);
        }

        let bits = self.glv.max_bits.max(s0.abs.bits() as usize).max(s1.abs.bits() as usize);
        let mut h = Projective::infinity();
        for i in (0..bits as u64).rev() {
            h = h.double(field, a);
            if s0.abs.bit(i) {
                h = h.add(&g, field, a);
            }
            if s1.abs.bit(i) {
                h = h.add(&endo_g, field, a);
            }
        }
        h.to_affine(field)
    }
}

fn compute_endo_constants(curve: &WeierstrassCurve) -> Result<(BigUint, BigUint), CurveError> {
    let fp = &curve.field;
    let fq = &curve.scalar;
    let three = BigUint::from(3u32);

    // a cube root of unity exists iff the multiplicative group has order divisible by 3
    if (fp.modulus() % &three) != BigUint::one() {
        return Err(CurveError::NoEndomorphism("base field has no cube root of unity"));
    }
    if (fq.modulus() % &three) != BigUint::one() {
        return Err(CurveError::NoEndomorphism("scalar field has no cube root of unity"));
    }
    if !curve.a.is_zero() {
        return Err(CurveError::NoEndomorphism("curve coefficient a is not zero"));
    }

    // λ^2 + λ + 1 = 0  =>  λ = (-1 ± sqrt(-3)) / 2
    let sqrt_minus_3 = fq
        .sqrt(&fq.neg(&three))
        .ok_or(CurveError::NoEndomorphism("-3 is not a square in the scalar field"))?;
    let lambda = fq
        .div(&fq.sub(&sqrt_minus_3, &BigUint::one()), &BigUint::from(2u32))
        .ok_or(CurveError::DivisionByZero)?;
    if fq.pow(&lambda, &three) != BigUint::one() || lambda.is_one() {
        return Err(CurveError::NoEndomorphism("λ is not a primitive cube root"));
    }

    let g = &curve.generator;
    let lambda_g = affine_scale(curve, g, &lambda);
    if lambda_g.y != g.y {
        return Err(CurveError::NoEndomorphism("λ·G does not keep the y-coordinate"));
    }
    let beta = fp.div(&lambda_g.x, &g.x).ok_or(CurveError::DivisionByZero)?;
    if fp.pow(&beta, &three) != BigUint::one() || beta.is_one() {
        return Err(CurveError::NoEndomorphism("β is not a primitive cube root"));
    }

    // confirm on a second point
    let r = affine_scale(curve, g, &three);
    let lambda_r = affine_scale(curve, &r, &lambda);
    if lambda_r.x != fp.mul(&beta, &r.x) || lambda_r.y != r.y {
        return Err(CurveError::NoEndomorphism("endomorphism check failed on 3G"));
    }

    Ok((beta, lambda))
}

fn affine_scale(curve: &WeierstrassCurve, p: &Affine, k: &BigUint) -> Affine {
    Projective::from_affine(p)
        .scale(k, &curve.field, &curve.a)
        .to_affine(&curve.field)
}

/// Extended Euclid on `(p, l)`, stopped once the remainder drops below
/// `sqrt(p)`. Returns `V` with `v0j + l·v1j = 0 (mod p)` and `|vij| ~ sqrt(p)`.
pub fn egcd_stop_early(l: &BigUint, p: &BigUint) -> [[BigInt; 2]; 2] {
    let p_int = BigInt::from_biguint(Sign::Plus, p.clone());
    let mut r0 = p_int.clone();
    let mut r1 = BigInt::from_biguint(Sign::Plus, l % p);
    let mut t0 = BigInt::zero();
    let mut t1 = BigInt::one();

    while &r1 * &r1 > p_int {
        let quotient = &r0 / &r1;
        let r2 = &r0 - &quotient * &r1;
        let t2 = &t0 - &quotient * &t1;
        r0 = std::mem::replace(&mut r1, r2);
        t0 = std::mem::replace(&mut t1, t2);
    }

    let quotient = &r0 / &r1;
    let r2 = &r0 - &quotient * &r1;
    let t2 = &t0 - &quotient * &t1;

    // s_i·p + t_i·l = r_i, so (r_i, -t_i) is a row of the lattice
    let v00 = r1.clone();
    let v10 = -t1;
    let (v01, v11) = if r0.clone().max(t0.abs()) <= r2.clone().max(t2.abs()) {
        (r0, -t0)
    } else {
        (r2, -t2)
    };
    [[v00, v01], [v10, v11]]
}

/// `round(x / y)`, with ties rounded away from zero.
pub fn divide_and_round(x: &BigInt, y: &BigInt) -> BigInt {
    let negative = x.is_negative() != y.is_negative() && !x.is_zero();
    let x = x.abs();
    let y = y.abs();
    let (mut z, rem) = x.div_rem(&y);
    if BigInt::from(2u32) * rem >= y {
        z += 1u32;
    }
    if negative {
        -z
    } else {
        z
    }
}

/// Smallest `k` with `x <= 2^k`.
fn ceil_log2(x: BigUint) -> usize {
    if x <= BigUint::one() {
        return 0;
    }
    (x - 1u32).bits() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bn254, secp256k1, secp256r1};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_secp256k1_has_endomorphism() {
        let curve = secp256k1();
        let endo = curve.endomorphism.as_ref().expect("secp256k1 has GLV");
        let fq = curve.scalar_field();
        assert_eq!(fq.pow(&endo.scalar, &BigUint::from(3u32)), BigUint::one());
        assert!(endo.decompose_max_bits() <= 129);
    }

    #[test]
    fn test_p256_has_no_endomorphism() {
        let curve = secp256r1();
        assert!(matches!(
            Endomorphism::compute(&curve),
            Err(CurveError::NoEndomorphism(_))
        ));
    }

    #[test]
    fn test_endomorphism_acts_as_lambda() {
        for curve in [secp256k1(), bn254()] {
            let endo = curve.endomorphism.clone().expect("endomorphism");
            let g = curve.generator().clone();
            let phi_g = endo.apply(&curve, &g);
            let lambda_g = affine_scale(&curve, &g, &endo.scalar);
            assert_eq!(phi_g, lambda_g, "{}", curve.name);
        }
    }

    #[test]
    fn test_decomposition_is_valid_and_short() {
        let curve = secp256k1();
        let endo = curve.endomorphism.clone().expect("endomorphism");
        let n = BigInt::from_biguint(Sign::Plus, curve.order().clone());
        let lambda = BigInt::from_biguint(Sign::Plus, endo.scalar.clone());
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let s = curve.random_scalar(&mut rng);
            let [s0, s1] = endo.decompose(&s);
            assert!(s0.abs.bits() as usize <= endo.decompose_max_bits());
            assert!(s1.abs.bits() as usize <= endo.decompose_max_bits());
            assert!(s0.abs < endo.glv.max_s0);
            assert!(s1.abs < endo.glv.max_s1);

            let recombined = (s0.to_bigint() + s1.to_bigint() * &lambda).mod_floor(&n);
            assert_eq!(recombined, BigInt::from_biguint(Sign::Plus, s));
        }
    }

    #[test]
    fn test_glv_scale_matches_plain_scale() {
        let curve = secp256k1();
        let endo = curve.endomorphism.clone().expect("endomorphism");
        let g = curve.generator().clone();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..5 {
            let k = curve.random_scalar(&mut rng);
            assert_eq!(endo.scale(&curve, &g, &k), affine_scale(&curve, &g, &k));
        }
        let n_minus_one = curve.order() - 1u32;
        assert_eq!(endo.scale(&curve, &g, &n_minus_one), curve.negate(&g));
    }

    #[test]
    fn test_divide_and_round() {
        let r = |x: i64, y: i64| divide_and_round(&BigInt::from(x), &BigInt::from(y));
        assert_eq!(r(7, 2), BigInt::from(4));
        assert_eq!(r(-7, 2), BigInt::from(-4));
        assert_eq!(r(5, 3), BigInt::from(2));
        assert_eq!(r(4, -3), BigInt::from(-1));
        assert_eq!(r(0, -3), BigInt::from(0));
    }

    #[test]
    fn test_egcd_rows_are_in_the_lattice() {
        let curve = secp256k1();
        let endo = curve.endomorphism.clone().expect("endomorphism");
        let n = BigInt::from_biguint(Sign::Plus, curve.order().clone());
        let lambda = BigInt::from_biguint(Sign::Plus, endo.scalar.clone());
        let [[v00, v01], [v10, v11]] = egcd_stop_early(&endo.scalar, curve.order());
        assert!((v00 + v10 * &lambda).mod_floor(&n).is_zero());
        assert!((v01 + v11 * &lambda).mod_floor(&n).is_zero());
    }
}

//! Short Weierstrass curves `y^2 = x^3 + a*x + b`.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::endomorphism::Endomorphism;
use crate::projective::Projective;
use crate::{Affine, CurveArithmetic, CurveError, FiniteField};

/// Parameters of a short Weierstrass curve together with its group law.
#[derive(Clone, Debug)]
pub struct WeierstrassCurve {
    pub name: &'static str,
    pub field: FiniteField,
    pub scalar: FiniteField,
    pub a: BigUint,
    pub b: BigUint,
    pub generator: Affine,
    pub cofactor: Option<BigUint>,
    pub endomorphism: Option<Endomorphism>,
}

impl WeierstrassCurve {
    /// Curve without an endomorphism; see [`Self::with_endomorphism`].
    pub fn new(
        name: &'static str,
        modulus: BigUint,
        order: BigUint,
        a: BigUint,
        b: BigUint,
        generator: Affine,
        cofactor: Option<BigUint>,
    ) -> Self {
        let field = FiniteField::new(modulus);
        let a = field.reduce(&a);
        let b = field.reduce(&b);
        WeierstrassCurve {
            name,
            field,
            scalar: FiniteField::new(order),
            a,
            b,
            generator,
            cofactor,
            endomorphism: None,
        }
    }

    /// Derive and attach the GLV endomorphism.
    pub fn with_endomorphism(mut self) -> Result<Self, CurveError> {
        let endo = Endomorphism::compute(&self)?;
        self.endomorphism = Some(endo);
        Ok(self)
    }

    #[inline]
    pub fn has_endomorphism(&self) -> bool {
        self.endomorphism.is_some()
    }

    /// Scalar multiplication in Jacobian coordinates, using GLV when the
    /// curve carries an endomorphism.
    pub fn scale_projective(&self, p: &Affine, k: &BigUint) -> Affine {
        let k = self.scalar.reduce(k);
        if let Some(endo) = &self.endomorphism {
            return endo.scale(self, p, &k);
        }
        Projective::from_affine(p)
            .scale(&k, &self.field, &self.a)
            .to_affine(&self.field)
    }
}

impl CurveArithmetic for WeierstrassCurve {
    #[inline]
    fn base_field(&self) -> &FiniteField {
        &self.field
    }

    #[inline]
    fn scalar_field(&self) -> &FiniteField {
        &self.scalar
    }

    #[inline]
    fn cofactor(&self) -> Option<&BigUint> {
        self.cofactor.as_ref()
    }

    #[inline]
    fn generator(&self) -> &Affine {
        &self.generator
    }

    fn domain_coefficients(&self) -> (BigUint, BigUint) {
        (self.a.clone(), self.b.clone())
    }

    fn zero(&self) -> Affine {
        Affine::infinity()
    }

    fn is_zero(&self, p: &Affine) -> bool {
        p.is_infinity()
    }

    fn is_on_curve(&self, p: &Affine) -> bool {
        if p.is_infinity() {
            return true;
        }
        match self.curve_rhs(&p.x) {
            Some(rhs) => self.field.square(&p.y) == rhs,
            None => false,
        }
    }

    fn add(&self, p: &Affine, q: &Affine) -> Affine {
        if p.is_infinity() {
            return q.clone();
        }
        if q.is_infinity() {
            return p.clone();
        }
        let f = &self.field;
        if p.x == q.x {
            if p.y == q.y {
                return self.double(p);
            }
            return Affine::infinity();
        }
        // x1 != x2, so the denominator is invertible
        let Some(m) = f.div(&f.sub(&p.y, &q.y), &f.sub(&p.x, &q.x)) else {
            return Affine::infinity();
        };
        let x3 = f.sub(&f.sub(&f.square(&m), &p.x), &q.x);
        let y3 = f.sub(&f.mul(&m, &f.sub(&p.x, &x3)), &p.y);
        Affine::new(x3, y3)
    }

    fn double(&self, p: &Affine) -> Affine {
        if p.is_infinity() || p.y.is_zero() {
            return Affine::infinity();
        }
        let f = &self.field;
        let numerator = f.add(&f.mul(&BigUint::from(3u32), &f.square(&p.x)), &self.a);
        let Some(m) = f.div(&numerator, &f.add(&p.y, &p.y)) else {
            return Affine::infinity();
        };
        let x3 = f.sub(&f.square(&m), &f.add(&p.x, &p.x));
        let y3 = f.sub(&f.mul(&m, &f.sub(&p.x, &x3)), &p.y);
        Affine::new(x3, y3)
    }

    fn negate(&self, p: &Affine) -> Affine {
        if p.is_infinity() {
            return p.clone();
        }
        Affine::new(p.x.clone(), self.field.neg(&p.y))
    }

    fn curve_rhs(&self, x: &BigUint) -> Option<BigUint> {
        let f = &self.field;
        let x3 = f.mul(&f.square(x), x);
        Some(f.add(&f.add(&x3, &f.mul(&self.a, x)), &self.b))
    }

    fn scale(&self, p: &Affine, k: &BigUint) -> Affine {
        self.scale_projective(p, k)
    }
}

//! Twisted Edwards curves `a·x^2 + y^2 = 1 + d·x^2·y^2`.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::{Affine, CurveArithmetic, FiniteField};

/// Parameters of a twisted Edwards curve.
///
/// The addition law is complete when `a` is a square and `d` is not, which
/// holds for the curves shipped in [`crate::params`]. The neutral element is
/// `(0, 1)`.
#[derive(Clone, Debug)]
pub struct TwistedEdwardsCurve {
    pub name: &'static str,
    pub field: FiniteField,
    pub scalar: FiniteField,
    pub a: BigUint,
    pub d: BigUint,
    pub generator: Affine,
    pub cofactor: Option<BigUint>,
}

impl TwistedEdwardsCurve {
    pub fn new(
        name: &'static str,
        modulus: BigUint,
        order: BigUint,
        a: BigUint,
        d: BigUint,
        generator: Affine,
        cofactor: Option<BigUint>,
    ) -> Self {
        let field = FiniteField::new(modulus);
        let a = field.reduce(&a);
        let d = field.reduce(&d);
        TwistedEdwardsCurve {
            name,
            field,
            scalar: FiniteField::new(order),
            a,
            d,
            generator,
            cofactor,
        }
    }
}

impl CurveArithmetic for TwistedEdwardsCurve {
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
        (self.a.clone(), self.d.clone())
    }

    fn zero(&self) -> Affine {
        Affine::new(BigUint::zero(), BigUint::one())
    }

    fn is_zero(&self, p: &Affine) -> bool {
        p.x.is_zero() && p.y.is_one()
    }

    fn is_on_curve(&self, p: &Affine) -> bool {
        let f = &self.field;
        let x2 = f.square(&p.x);
        let y2 = f.square(&p.y);
        let lhs = f.add(&f.mul(&self.a, &x2), &y2);
        let rhs = f.add(&BigUint::one(), &f.mul(&self.d, &f.mul(&x2, &y2)));
        lhs == rhs
    }

    fn add(&self, p: &Affine, q: &Affine) -> Affine {
        let f = &self.field;
        let x1x2 = f.mul(&p.x, &q.x);
        let y1y2 = f.mul(&p.y, &q.y);
        let x1y2 = f.mul(&p.x, &q.y);
        let y1x2 = f.mul(&p.y, &q.x);
        let dxxyy = f.mul(&self.d, &f.mul(&x1x2, &y1y2));

        // x3 = (x1 y2 + y1 x2) / (1 + d x1 x2 y1 y2)
        // y3 = (y1 y2 - a x1 x2) / (1 - d x1 x2 y1 y2)
        let x_num = f.add(&x1y2, &y1x2);
        let y_num = f.sub(&y1y2, &f.mul(&self.a, &x1x2));
        let x_den = f.add(&BigUint::one(), &dxxyy);
        let y_den = f.sub(&BigUint::one(), &dxxyy);

        // denominators never vanish on a complete curve
        let x3 = f.div(&x_num, &x_den).unwrap_or_default();
        let y3 = f.div(&y_num, &y_den).unwrap_or_default();
        Affine::new(x3, y3)
    }

    fn double(&self, p: &Affine) -> Affine {
        self.add(p, p)
    }

    fn negate(&self, p: &Affine) -> Affine {
        Affine::new(self.field.neg(&p.x), p.y.clone())
    }

    /// `y^2 = (1 - a x^2) / (1 - d x^2)`
    fn curve_rhs(&self, x: &BigUint) -> Option<BigUint> {
        let f = &self.field;
        let x2 = f.square(x);
        let num = f.sub(&BigUint::one(), &f.mul(&self.a, &x2));
        let den = f.sub(&BigUint::one(), &f.mul(&self.d, &x2));
        f.div(&num, &den)
    }
}

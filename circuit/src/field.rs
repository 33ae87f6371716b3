//! Native field values.
//!
//! Everything a gadget touches is either a constant known while the circuit
//! is built or a linear combination of allocated variables. Keeping linear
//! combinations symbolic means additions and scalings never cost a
//! constraint; only multiplications of two variables do.

use std::collections::BTreeMap;
use std::ops::{Add, Mul, Neg, Sub};

use ff::{Field as _, PrimeField};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use once_cell::sync::Lazy;
pub use pasta_curves::Fp;

/// Modulus of the native field.
pub static NATIVE_MODULUS: Lazy<BigUint> = Lazy::new(|| fp_to_biguint(&-Fp::ONE) + 1u32);

static NATIVE_MODULUS_SIGNED: Lazy<BigInt> = Lazy::new(|| BigInt::from(NATIVE_MODULUS.clone()));

pub fn fp_to_biguint(x: &Fp) -> BigUint {
    BigUint::from_bytes_le(x.to_repr().as_ref())
}

pub fn fp_to_bigint(x: &Fp) -> BigInt {
    BigInt::from(fp_to_biguint(x))
}

/// Reduces `x` into the native field.
pub fn fp_from_biguint(x: &BigUint) -> Fp {
    let reduced = x % &*NATIVE_MODULUS;
    let bytes = reduced.to_bytes_le();
    let mut repr = <Fp as PrimeField>::Repr::default();
    repr.as_mut()[..bytes.len()].copy_from_slice(&bytes);
    Option::<Fp>::from(Fp::from_repr(repr)).unwrap_or(Fp::ZERO)
}

/// Reduces a signed integer into the native field, `-1` maps to `p - 1`.
pub fn fp_from_bigint(x: &BigInt) -> Fp {
    let reduced = x.mod_floor(&NATIVE_MODULUS_SIGNED);
    fp_from_biguint(reduced.magnitude())
}

/// `2^n` in the native field.
pub fn pow2(n: usize) -> Fp {
    Fp::from(2u64).pow_vartime([n as u64])
}

/// Handle to an allocated native variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(pub(crate) usize);

impl Variable {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// `Σ cᵢ·vᵢ + c`, with zero coefficients dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearCombination {
    terms: BTreeMap<Variable, Fp>,
    constant: Fp,
}

impl LinearCombination {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(c: Fp) -> Self {
        Self {
            terms: BTreeMap::new(),
            constant: c,
        }
    }

    pub fn from_variable(v: Variable) -> Self {
        let mut lc = Self::zero();
        lc.add_term(v, Fp::ONE);
        lc
    }

    pub fn add_term(&mut self, v: Variable, coeff: Fp) {
        let entry = self.terms.entry(v).or_insert(Fp::ZERO);
        *entry += coeff;
        if bool::from(entry.is_zero()) {
            self.terms.remove(&v);
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Variable, &Fp)> {
        self.terms.iter()
    }

    #[inline]
    pub fn constant_term(&self) -> Fp {
        self.constant
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn scale(&self, c: Fp) -> Self {
        if bool::from(c.is_zero()) {
            return Self::zero();
        }
        Self {
            terms: self.terms.iter().map(|(v, k)| (*v, *k * c)).collect(),
            constant: self.constant * c,
        }
    }

    /// Evaluates under an assignment, `None` if any variable is unassigned.
    pub fn evaluate(&self, assignment: impl Fn(Variable) -> Option<Fp>) -> Option<Fp> {
        self.terms
            .iter()
            .try_fold(self.constant, |acc, (v, c)| Some(acc + assignment(*v)? * c))
    }
}

impl Add for LinearCombination {
    type Output = LinearCombination;

    fn add(mut self, rhs: LinearCombination) -> LinearCombination {
        for (v, c) in rhs.terms {
            self.add_term(v, c);
        }
        self.constant += rhs.constant;
        self
    }
}

impl Sub for LinearCombination {
    type Output = LinearCombination;

    fn sub(self, rhs: LinearCombination) -> LinearCombination {
        self + (-rhs)
    }
}

impl Neg for LinearCombination {
    type Output = LinearCombination;

    fn neg(self) -> LinearCombination {
        self.scale(-Fp::ONE)
    }
}

/// A native field value: a known constant or a linear combination of
/// variables.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Constant(Fp),
    Variable(LinearCombination),
}

impl Field {
    pub fn zero() -> Self {
        Field::Constant(Fp::ZERO)
    }

    pub fn one() -> Self {
        Field::Constant(Fp::ONE)
    }

    pub fn from_u64(x: u64) -> Self {
        Field::Constant(Fp::from(x))
    }

    pub fn from_biguint(x: &BigUint) -> Self {
        Field::Constant(fp_from_biguint(x))
    }

    /// Wraps a linear combination, collapsing it to a constant when it has
    /// no variable terms.
    pub fn from_lc(lc: LinearCombination) -> Self {
        if lc.is_constant() {
            Field::Constant(lc.constant_term())
        } else {
            Field::Variable(lc)
        }
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        matches!(self, Field::Constant(_))
    }

    pub fn to_constant(&self) -> Option<Fp> {
        match self {
            Field::Constant(c) => Some(*c),
            Field::Variable(_) => None,
        }
    }

    pub fn lc(&self) -> LinearCombination {
        match self {
            Field::Constant(c) => LinearCombination::constant(*c),
            Field::Variable(lc) => lc.clone(),
        }
    }

    pub fn scale(&self, c: Fp) -> Self {
        match self {
            Field::Constant(x) => Field::Constant(*x * c),
            Field::Variable(lc) => Field::from_lc(lc.scale(c)),
        }
    }
}

impl From<Variable> for Field {
    fn from(v: Variable) -> Self {
        Field::Variable(LinearCombination::from_variable(v))
    }
}

impl From<Fp> for Field {
    fn from(c: Fp) -> Self {
        Field::Constant(c)
    }
}

impl From<u64> for Field {
    fn from(x: u64) -> Self {
        Field::from_u64(x)
    }
}

impl Add<&Field> for &Field {
    type Output = Field;

    fn add(self, rhs: &Field) -> Field {
        match (self, rhs) {
            (Field::Constant(a), Field::Constant(b)) => Field::Constant(*a + b),
            _ => Field::from_lc(self.lc() + rhs.lc()),
        }
    }
}

impl Add for Field {
    type Output = Field;

    fn add(self, rhs: Field) -> Field {
        &self + &rhs
    }
}

impl Add<&Field> for Field {
    type Output = Field;

    fn add(self, rhs: &Field) -> Field {
        &self + rhs
    }
}

impl Sub<&Field> for &Field {
    type Output = Field;

    fn sub(self, rhs: &Field) -> Field {
        match (self, rhs) {
            (Field::Constant(a), Field::Constant(b)) => Field::Constant(*a - b),
            _ => Field::from_lc(self.lc() - rhs.lc()),
        }
    }
}

impl Sub for Field {
    type Output = Field;

    fn sub(self, rhs: Field) -> Field {
        &self - &rhs
    }
}

impl Sub<&Field> for Field {
    type Output = Field;

    fn sub(self, rhs: &Field) -> Field {
        &self - rhs
    }
}

impl Neg for &Field {
    type Output = Field;

    fn neg(self) -> Field {
        self.scale(-Fp::ONE)
    }
}

impl Neg for Field {
    type Output = Field;

    fn neg(self) -> Field {
        -&self
    }
}

impl Mul<Fp> for &Field {
    type Output = Field;

    fn mul(self, rhs: Fp) -> Field {
        self.scale(rhs)
    }
}

impl Mul<Fp> for Field {
    type Output = Field;

    fn mul(self, rhs: Fp) -> Field {
        self.scale(rhs)
    }
}

/// A native value constrained (or known) to be 0 or 1.
#[derive(Clone, Debug, PartialEq)]
pub struct Bool(pub(crate) Field);

impl Bool {
    pub fn constant(b: bool) -> Self {
        Bool(if b { Field::one() } else { Field::zero() })
    }

    /// Wraps a field the caller has already constrained to be boolean.
    pub(crate) fn from_field_unchecked(x: Field) -> Self {
        Bool(x)
    }

    #[inline]
    pub fn field(&self) -> &Field {
        &self.0
    }

    pub fn into_field(self) -> Field {
        self.0
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.0.is_constant()
    }

    pub fn to_constant(&self) -> Option<bool> {
        self.0.to_constant().map(|c| c == Fp::ONE)
    }

    pub fn not(&self) -> Bool {
        Bool(&Field::one() - &self.0)
    }
}

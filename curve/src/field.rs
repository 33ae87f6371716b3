//! Prime field arithmetic over arbitrary-precision integers.
//!
//! Elements are plain `BigUint` values kept in `[0, p)`; the field itself
//! only carries the modulus. This keeps curve parameter sets as ordinary
//! runtime values instead of one type per modulus.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The prime field `Z/pZ`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiniteField {
    modulus: BigUint,
}

impl FiniteField {
    /// Create a field from an (assumed prime) modulus.
    pub fn new(modulus: BigUint) -> Self {
        FiniteField { modulus }
    }

    #[inline]
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Number of bits needed to represent the modulus.
    #[inline]
    pub fn size_in_bits(&self) -> usize {
        self.modulus.bits() as usize
    }

    #[inline]
    pub fn reduce(&self, x: &BigUint) -> BigUint {
        x % &self.modulus
    }

    /// Reduce a signed integer into `[0, p)`.
    pub fn reduce_signed(&self, x: &BigInt) -> BigUint {
        let p = BigInt::from_biguint(Sign::Plus, self.modulus.clone());
        // mod_floor is non-negative for a positive modulus
        x.mod_floor(&p).magnitude().clone()
    }

    #[inline]
    pub fn add(&self, x: &BigUint, y: &BigUint) -> BigUint {
        (x + y) % &self.modulus
    }

    #[inline]
    pub fn sub(&self, x: &BigUint, y: &BigUint) -> BigUint {
        let x = x % &self.modulus;
        let y = y % &self.modulus;
        if x >= y {
            x - y
        } else {
            &self.modulus - y + x
        }
    }

    #[inline]
    pub fn neg(&self, x: &BigUint) -> BigUint {
        self.sub(&BigUint::zero(), x)
    }

    #[inline]
    pub fn mul(&self, x: &BigUint, y: &BigUint) -> BigUint {
        (x * y) % &self.modulus
    }

    #[inline]
    pub fn square(&self, x: &BigUint) -> BigUint {
        self.mul(x, x)
    }

    #[inline]
    pub fn pow(&self, x: &BigUint, e: &BigUint) -> BigUint {
        x.modpow(e, &self.modulus)
    }

    /// Multiplicative inverse, `None` for zero.
    pub fn inverse(&self, x: &BigUint) -> Option<BigUint> {
        let x = BigInt::from_biguint(Sign::Plus, x % &self.modulus);
        if x.is_zero() {
            return None;
        }
        let p = BigInt::from_biguint(Sign::Plus, self.modulus.clone());
        let egcd = x.extended_gcd(&p);
        if !egcd.gcd.is_one() {
            return None;
        }
        Some(self.reduce_signed(&egcd.x))
    }

    pub fn div(&self, x: &BigUint, y: &BigUint) -> Option<BigUint> {
        self.inverse(y).map(|y_inv| self.mul(x, &y_inv))
    }

    /// Euler's criterion. Zero counts as a square.
    pub fn is_square(&self, x: &BigUint) -> bool {
        let x = self.reduce(x);
        if x.is_zero() {
            return true;
        }
        let e = (&self.modulus - 1u32) >> 1;
        self.pow(&x, &e).is_one()
    }

    /// Square root via Tonelli-Shanks. Returns `None` for non-residues.
    ///
    /// The returned root is whichever one the algorithm lands on; callers
    /// that need a canonical choice should compare against `p - y`.
    pub fn sqrt(&self, x: &BigUint) -> Option<BigUint> {
        let x = self.reduce(x);
        if x.is_zero() {
            return Some(x);
        }
        if !self.is_square(&x) {
            return None;
        }
        let p = &self.modulus;

        if (p % 4u32) == BigUint::from(3u32) {
            let e = (p + 1u32) >> 2;
            return Some(self.pow(&x, &e));
        }

        // p - 1 = q * 2^s with q odd
        let p_minus_one = p - 1u32;
        let s = p_minus_one.trailing_zeros().unwrap_or(0);
        let q = &p_minus_one >> s;

        let mut z = BigUint::from(2u32);
        while self.is_square(&z) {
            z += 1u32;
        }

        let mut m = s;
        let mut c = self.pow(&z, &q);
        let mut t = self.pow(&x, &q);
        let mut r = self.pow(&x, &((&q + 1u32) >> 1));

        while !t.is_one() {
            // least i with t^(2^i) = 1
            let mut i = 0u64;
            let mut t2i = t.clone();
            while !t2i.is_one() {
                t2i = self.square(&t2i);
                i += 1;
                if i == m {
                    return None;
                }
            }
            let mut b = c.clone();
            for _ in 0..(m - i - 1) {
                b = self.square(&b);
            }
            m = i;
            c = self.square(&b);
            t = self.mul(&t, &c);
            r = self.mul(&r, &b);
        }
        Some(r)
    }

    /// Uniformly random element, by rejection sampling.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> BigUint {
        let bits = self.size_in_bits();
        let bytes = bits.div_ceil(8);
        let excess = bytes * 8 - bits;
        let mut buf = vec![0u8; bytes];
        loop {
            rng.fill_bytes(&mut buf);
            if let Some(top) = buf.first_mut() {
                *top &= 0xffu8 >> excess;
            }
            let candidate = BigUint::from_bytes_be(&buf);
            if candidate < self.modulus {
                return candidate;
            }
        }
    }

    /// Random non-zero element.
    pub fn random_nonzero<R: Rng + ?Sized>(&self, rng: &mut R) -> BigUint {
        loop {
            let x = self.random(rng);
            if !x.is_zero() {
                return x;
            }
        }
    }
}

/// Parse a big-endian hex string (no prefix) known at compile time.
pub(crate) fn hex_constant(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16).unwrap_or_default()
}

/// Parse a decimal string known at compile time.
pub(crate) fn dec_constant(dec: &str) -> BigUint {
    BigUint::parse_bytes(dec.as_bytes(), 10).unwrap_or_default()
}

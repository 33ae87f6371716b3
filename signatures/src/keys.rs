//! Signing and verifying keys shared by both schemes.

use curve::{Affine, CurveArithmetic};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::SignatureError;

/// A secret signing key.
///
/// The key is a scalar in `[1, n)` for the curve it is used with. Curves are
/// runtime values, so the key does not remember which curve produced it.
///
/// # Example
///
/// ```
/// use curve::secp256k1;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use signatures::SigningKey;
///
/// let curve = secp256k1();
/// let mut rng = StdRng::seed_from_u64(1);
/// let signing_key = SigningKey::random(&curve, &mut rng);
/// let verifying_key = signing_key.verifying_key(&curve);
/// assert!(!verifying_key.point().is_infinity());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningKey {
    scalar: BigUint,
}

/// A public verifying key, the point `sk·G`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyingKey {
    point: Affine,
}

impl SigningKey {
    /// Samples a key uniformly from `[1, n)`.
    pub fn random<C: CurveArithmetic, R: Rng + ?Sized>(curve: &C, rng: &mut R) -> Self {
        Self {
            scalar: curve.random_scalar(rng),
        }
    }

    /// Samples a key together with its verifying key on `curve`.
    pub fn generate<C: CurveArithmetic, R: Rng + ?Sized>(curve: &C, rng: &mut R) -> (Self, VerifyingKey) {
        let (scalar, point) = curve::random_keypair(curve, rng);
        (Self { scalar }, VerifyingKey { point })
    }

    /// Wraps an existing secret scalar.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::ZeroScalar`] if `scalar` is zero.
    pub fn from_scalar(scalar: BigUint) -> Result<Self, SignatureError> {
        if scalar.is_zero() {
            return Err(SignatureError::ZeroScalar);
        }
        Ok(Self { scalar })
    }

    #[inline]
    pub fn scalar(&self) -> &BigUint {
        &self.scalar
    }

    /// Derives the verifying key `sk·G` on `curve`.
    pub fn verifying_key<C: CurveArithmetic>(&self, curve: &C) -> VerifyingKey {
        VerifyingKey {
            point: curve.scale(curve.generator(), &self.scalar),
        }
    }
}

impl VerifyingKey {
    /// Wraps a public point after checking it is a usable key for `curve`.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidPoint`] if the point is the neutral
    /// element, is off the curve, or lies outside the prime-order subgroup.
    pub fn from_point<C: CurveArithmetic>(curve: &C, point: Affine) -> Result<Self, SignatureError> {
        if curve.is_zero(&point) || !curve.is_on_curve(&point) || !curve.is_in_subgroup(&point) {
            return Err(SignatureError::InvalidPoint);
        }
        Ok(Self { point })
    }

    #[inline]
    pub fn point(&self) -> &Affine {
        &self.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve::{ed25519, secp256k1};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_from_scalar_rejects_zero() {
        assert_eq!(
            SigningKey::from_scalar(BigUint::zero()),
            Err(SignatureError::ZeroScalar)
        );
    }

    #[test]
    fn test_from_point_rejects_bad_points() {
        let curve = secp256k1();
        assert_eq!(
            VerifyingKey::from_point(&curve, Affine::infinity()),
            Err(SignatureError::InvalidPoint)
        );
        assert_eq!(
            VerifyingKey::from_point(&curve, Affine::from_u64(1, 1)),
            Err(SignatureError::InvalidPoint)
        );

        let ed = ed25519();
        let minus_one = ed.base_field().neg(&BigUint::from(1u32));
        let torsion = Affine::new(BigUint::zero(), minus_one);
        assert_eq!(
            VerifyingKey::from_point(&ed, torsion),
            Err(SignatureError::InvalidPoint)
        );
    }

    #[test]
    fn test_verifying_key_matches_from_point() {
        let curve = secp256k1();
        let mut rng = StdRng::seed_from_u64(3);
        let sk = SigningKey::random(&curve, &mut rng);
        let vk = sk.verifying_key(&curve);
        assert_eq!(VerifyingKey::from_point(&curve, vk.point().clone()), Ok(vk));
    }
}

//! EdDSA over twisted Edwards curves.
//!
//! Points are compressed the Ed25519 way: the 32-byte little-endian `y`
//! coordinate with the parity of `x` in the top bit of the last byte. The
//! challenge is `SHA-512(R || A || msg)` read little-endian and reduced modulo
//! the group order `ℓ`.
//!
//! Signing keys are used directly as the secret scalar `a`; there is no seed
//! expansion or clamping.

use curve::{Affine, CurveArithmetic};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::constants::{ENCODED_POINT_SIZE, SK_SIZE};
use crate::errors::SignatureError;
use crate::keys::{SigningKey, VerifyingKey};

/// An EdDSA signature: the commitment `R` and the response `s`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub r: Affine,
    pub s: BigUint,
}

/// Compressed 32-byte encoding of a point.
///
/// Only meaningful for base fields below `2^255`, so the top bit is free.
pub fn encode_point(p: &Affine) -> [u8; ENCODED_POINT_SIZE] {
    let mut out = [0u8; ENCODED_POINT_SIZE];
    let y = p.y.to_bytes_le();
    let len = y.len().min(ENCODED_POINT_SIZE);
    out[..len].copy_from_slice(&y[..len]);
    if p.x.bit(0) {
        out[ENCODED_POINT_SIZE - 1] |= 0x80;
    }
    out
}

/// `k = SHA-512(enc(R) || enc(A) || msg) mod ℓ`.
pub fn challenge<C: CurveArithmetic>(curve: &C, r: &Affine, pk: &Affine, msg: &[u8]) -> BigUint {
    let mut hasher = Sha512::new();
    hasher.update(encode_point(r));
    hasher.update(encode_point(pk));
    hasher.update(msg);
    let digest = hasher.finalize();
    curve.scalar_field().reduce(&BigUint::from_bytes_le(&digest))
}

fn deterministic_nonce<C: CurveArithmetic>(curve: &C, secret: &BigUint, msg: &[u8]) -> BigUint {
    let mut bytes = secret.to_bytes_le();
    bytes.resize(bytes.len().max(SK_SIZE), 0);

    let mut hasher = Sha512::new();
    hasher.update(&bytes);
    hasher.update(msg);
    let digest = hasher.finalize();
    curve.scalar_field().reduce(&BigUint::from_bytes_le(&digest))
}

/// Signs `msg` deterministically.
///
/// The nonce is `r = SHA-512(a || msg) mod ℓ`, the commitment `R = r·B` and
/// the response `s = r + k·a mod ℓ` with `k` from [`challenge`].
///
/// # Errors
///
/// Returns [`SignatureError::ZeroScalar`] if the key or the derived nonce is
/// zero modulo `ℓ`.
pub fn sign<C: CurveArithmetic>(
    curve: &C,
    key: &SigningKey,
    msg: &[u8],
) -> Result<Signature, SignatureError> {
    let l = curve.scalar_field();
    let a = l.reduce(key.scalar());
    if a.is_zero() {
        return Err(SignatureError::ZeroScalar);
    }
    let pk = curve.scale(curve.generator(), &a);

    let nonce = deterministic_nonce(curve, &a, msg);
    if nonce.is_zero() {
        return Err(SignatureError::ZeroScalar);
    }
    let r = curve.scale(curve.generator(), &nonce);
    let k = challenge(curve, &r, &pk, msg);
    let s = l.add(&nonce, &l.mul(&k, &a));

    Ok(Signature { r, s })
}

/// Checks `s·B = R + k·A`.
///
/// Rejects `s ≥ ℓ` and commitments or keys that are off the curve.
pub fn verify<C: CurveArithmetic>(curve: &C, sig: &Signature, pk: &Affine, msg: &[u8]) -> bool {
    if &sig.s >= curve.order() {
        return false;
    }
    if !curve.is_on_curve(&sig.r) || !curve.is_on_curve(pk) {
        return false;
    }

    let k = challenge(curve, &sig.r, pk, msg);
    let lhs = curve.scale(curve.generator(), &sig.s);
    let rhs = curve.add(&sig.r, &curve.scale(pk, &k));
    curve.equal(&lhs, &rhs)
}

impl SigningKey {
    /// Shorthand for [`sign`].
    pub fn sign_eddsa<C: CurveArithmetic>(
        &self,
        curve: &C,
        msg: &[u8],
    ) -> Result<Signature, SignatureError> {
        sign(curve, self, msg)
    }
}

impl VerifyingKey {
    /// Shorthand for [`verify`].
    pub fn verify_eddsa<C: CurveArithmetic>(&self, curve: &C, msg: &[u8], sig: &Signature) -> bool {
        verify(curve, sig, self.point(), msg)
    }
}

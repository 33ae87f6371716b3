//! ECDSA over any curve implementing [`CurveArithmetic`].
//!
//! The message is supplied as an already-hashed integer; hashing the message
//! bytes is the caller's concern.

use curve::{double_scalar_mul, CurveArithmetic};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{SCALAR_HEX_LEN, SIGNATURE_HEX_LEN};
use crate::errors::SignatureError;
use crate::keys::{SigningKey, VerifyingKey};

/// An ECDSA signature `(r, s)`.
///
/// Both components are scalars modulo the group order. Values outside
/// `[1, n)` can be represented but never verify.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub r: BigUint,
    pub s: BigUint,
}

impl Signature {
    pub fn new(r: BigUint, s: BigUint) -> Self {
        Self { r, s }
    }

    /// Parses `0x` followed by at least 128 hex digits.
    ///
    /// The first 64 digits are `r` and the next 64 are `s`. Anything after
    /// that (typically a recovery byte) is ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use num_bigint::BigUint;
    /// use signatures::ecdsa::Signature;
    ///
    /// let hex = format!("0x{}{}", "0".repeat(63) + "1", "0".repeat(63) + "2");
    /// let sig = Signature::from_hex(&hex).unwrap();
    /// assert_eq!(sig.r, BigUint::from(1u32));
    /// assert_eq!(sig.s, BigUint::from(2u32));
    /// assert_eq!(sig.to_hex(), hex);
    /// ```
    pub fn from_hex(raw: &str) -> Result<Self, SignatureError> {
        let digits = raw.strip_prefix("0x").ok_or(SignatureError::InvalidHex)?;
        if digits.len() < 2 * SCALAR_HEX_LEN || !digits.is_char_boundary(2 * SCALAR_HEX_LEN) {
            return Err(SignatureError::InvalidHex);
        }
        let r = decode_scalar(&digits[..SCALAR_HEX_LEN])?;
        let s = decode_scalar(&digits[SCALAR_HEX_LEN..2 * SCALAR_HEX_LEN])?;
        Ok(Self { r, s })
    }

    /// Canonical `0x`-prefixed form, 130 characters for 256-bit scalars.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(SIGNATURE_HEX_LEN);
        out.push_str("0x");
        out.push_str(&encode_scalar(&self.r));
        out.push_str(&encode_scalar(&self.s));
        out
    }
}

fn decode_scalar(digits: &str) -> Result<BigUint, SignatureError> {
    let bytes = hex::decode(digits).map_err(|_| SignatureError::InvalidHex)?;
    Ok(BigUint::from_bytes_be(&bytes))
}

fn encode_scalar(x: &BigUint) -> String {
    let bytes = x.to_bytes_be();
    let width = SCALAR_HEX_LEN / 2;
    if bytes.len() >= width {
        return hex::encode(bytes);
    }
    let mut padded = vec![0u8; width - bytes.len()];
    padded.extend_from_slice(&bytes);
    hex::encode(padded)
}

/// Signs the hashed message `msg_hash` with `key`.
///
/// A fresh nonce `k` is drawn from `[1, n)` for every attempt:
/// `r = (k·G).x mod n` and `s = k⁻¹·(h + r·d) mod n`. Attempts where `r` or
/// `s` is zero are discarded.
///
/// # Errors
///
/// Returns [`SignatureError::ZeroScalar`] if the key is a multiple of `n`.
pub fn sign<C: CurveArithmetic, R: Rng + ?Sized>(
    curve: &C,
    msg_hash: &BigUint,
    key: &SigningKey,
    rng: &mut R,
) -> Result<Signature, SignatureError> {
    let n = curve.scalar_field();
    let d = n.reduce(key.scalar());
    if d.is_zero() {
        return Err(SignatureError::ZeroScalar);
    }
    let h = n.reduce(msg_hash);

    loop {
        let k = curve.random_scalar(rng);
        let big_r = curve.scale(curve.generator(), &k);
        if curve.is_zero(&big_r) {
            continue;
        }
        let r = n.reduce(&big_r.x);
        if r.is_zero() {
            continue;
        }
        let Some(k_inv) = n.inverse(&k) else {
            continue;
        };
        let s = n.mul(&k_inv, &n.add(&h, &n.mul(&r, &d)));
        if s.is_zero() {
            continue;
        }
        return Ok(Signature { r, s });
    }
}

/// Verifies `sig` on `msg_hash` against the public point `pk`.
///
/// Returns `false` when `pk` is the neutral element, is off the curve or
/// outside the subgroup, when `r` or `s` is outside `[1, n)`, or when
/// `u1·G + u2·pk` is the neutral element. Otherwise accepts iff the
/// x-coordinate of that point reduces to `r`.
pub fn verify<C: CurveArithmetic>(
    curve: &C,
    sig: &Signature,
    msg_hash: &BigUint,
    pk: &curve::Affine,
) -> bool {
    if curve.is_zero(pk) || !curve.is_on_curve(pk) || !curve.is_in_subgroup(pk) {
        return false;
    }
    if !curve.is_valid_scalar(&sig.r) || !curve.is_valid_scalar(&sig.s) {
        return false;
    }

    let n = curve.scalar_field();
    let Some(s_inv) = n.inverse(&sig.s) else {
        return false;
    };
    let u1 = n.mul(&n.reduce(msg_hash), &s_inv);
    let u2 = n.mul(&sig.r, &s_inv);

    let big_r = double_scalar_mul(curve, &u1, curve.generator(), &u2, pk);
    if curve.is_zero(&big_r) {
        return false;
    }
    n.reduce(&big_r.x) == sig.r
}

impl SigningKey {
    /// Shorthand for [`sign`].
    pub fn sign_ecdsa<C: CurveArithmetic, R: Rng + ?Sized>(
        &self,
        curve: &C,
        msg_hash: &BigUint,
        rng: &mut R,
    ) -> Result<Signature, SignatureError> {
        sign(curve, msg_hash, self, rng)
    }
}

impl VerifyingKey {
    /// Shorthand for [`verify`].
    pub fn verify_ecdsa<C: CurveArithmetic>(
        &self,
        curve: &C,
        msg_hash: &BigUint,
        sig: &Signature,
    ) -> bool {
        verify(curve, sig, msg_hash, self.point())
    }
}

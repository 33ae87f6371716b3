//! Error types for the signature schemes.

use thiserror::Error;

/// Errors that can occur during key handling, signing and decoding.
///
/// Verification never returns an error: a signature that does not verify is
/// reported as `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// A point was the neutral element or did not lie on the curve.
    ///
    /// This is returned when a verifying key or a signature commitment is
    /// unusable before any arithmetic is attempted.
    #[error("invalid curve point")]
    InvalidPoint,

    /// A scalar that must be non-zero was zero.
    ///
    /// Signing keys are sampled from `[1, n)`, so this only shows up for keys
    /// built by hand with [`crate::SigningKey::from_scalar`].
    #[error("scalar must be non-zero modulo the group order")]
    ZeroScalar,

    /// A hex-encoded signature was not of the form `0x` followed by at least
    /// 128 hex digits.
    #[error("malformed hex signature")]
    InvalidHex,
}

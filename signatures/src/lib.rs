//! Off-circuit ECDSA and EdDSA over the curves of the `curve` crate.
//!
//! This library provides:
//! - ECDSA signing and verification over short Weierstrass curves, with the
//!   `0x`-prefixed hex signature encoding
//! - EdDSA signing and verification over twisted Edwards curves, with a
//!   SHA-512 challenge over compressed points
//! - Key types shared by both schemes
//!
//! The verifiers here are the reference that in-circuit verification agrees
//! with; the circuit gadgets call them directly when every input is a
//! constant.
//!
//! # Example
//!
//! ```
//! use curve::secp256k1;
//! use num_bigint::BigUint;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use signatures::{SigningKey, ecdsa};
//!
//! let curve = secp256k1();
//! let mut rng = StdRng::seed_from_u64(7);
//! let signing_key = SigningKey::random(&curve, &mut rng);
//! let verifying_key = signing_key.verifying_key(&curve);
//!
//! let msg_hash = BigUint::from(0xc0ffeeu32);
//! let signature = ecdsa::sign(&curve, &msg_hash, &signing_key, &mut rng).expect("signing failed");
//! assert!(ecdsa::verify(&curve, &signature, &msg_hash, verifying_key.point()));
//! ```
//!
//! # Security Considerations
//!
//! - ECDSA nonces are drawn from the supplied RNG, which must be a CSPRNG
//! - EdDSA nonces are derived from the key and message, no RNG is involved
//! - Protect the signing key from unauthorized access

mod constants;
mod errors;
mod keys;

pub mod ecdsa;
pub mod eddsa;

#[cfg(test)]
mod tests;

pub use constants::{ENCODED_POINT_SIZE, SIGNATURE_HEX_LEN};
pub use errors::SignatureError;
pub use keys::{SigningKey, VerifyingKey};

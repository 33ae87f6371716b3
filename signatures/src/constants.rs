//! Constants used by the signature encodings.

/// Hex digits of one 256-bit scalar.
pub const SCALAR_HEX_LEN: usize = 64;

/// Length of a canonical hex signature: `0x`, then `r` and `s` as 64 digits
/// each.
pub const SIGNATURE_HEX_LEN: usize = 2 + 2 * SCALAR_HEX_LEN;

/// Size of a compressed Edwards point: little-endian `y` with the parity of
/// `x` stored in the top bit of the last byte.
pub const ENCODED_POINT_SIZE: usize = 32;

/// Size of a little-endian encoded secret scalar.
pub const SK_SIZE: usize = 32;

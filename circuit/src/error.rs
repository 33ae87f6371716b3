use curve::CurveError;
use signatures::SignatureError;
use thiserror::Error;

/// Errors raised while building a circuit.
///
/// Every variant aborts construction. Failures that a prover must be able
/// to show (an invalid signature, a point outside the subgroup) are returned
/// as [`crate::Bool`] values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GadgetError {
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("window size must be a positive integer, got {0}")]
    InvalidWindowSize(usize),

    #[error("empty input")]
    EmptyInput,

    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// The operand bounds could overflow `2^264 · p_native`.
    #[error("modulus too large for foreign field arithmetic")]
    ModulusTooLarge,

    #[error("modulus too small, curve gadgets require f > 2^176")]
    ModulusTooSmall,

    #[error("value is not invertible")]
    NotInvertible,

    /// A check evaluated on constants failed at construction time.
    #[error("assertion failed: {0}")]
    ConstantAssertion(String),

    #[error("point table has wrong length: expected {expected}, got {actual}")]
    InvalidTable { expected: usize, actual: usize },

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

pub type Result<T, E = GadgetError> = std::result::Result<T, E>;

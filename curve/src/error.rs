use thiserror::Error;

/// Errors raised while deriving curve data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    /// The curve does not admit a cube-root endomorphism.
    #[error("no cube-root endomorphism: {0}")]
    NoEndomorphism(&'static str),

    /// The point is not on the curve it was used with.
    #[error("point is not on the curve")]
    NotOnCurve,

    /// A value that should have been invertible was zero.
    #[error("division by zero")]
    DivisionByZero,
}

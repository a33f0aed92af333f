//! Error types for the gprot library.

use thiserror::Error;

/// Result type alias for rotation-period operations.
pub type Result<T> = std::result::Result<T, RotationError>;

/// Errors that can occur while estimating rotation periods.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RotationError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Dimension mismatch between paired sequences.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamps are not strictly increasing.
    #[error("timestamps must be strictly increasing (violated at index {index})")]
    NonMonotonicTime { index: usize },

    /// NaN or infinite value in the input.
    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Numerically degenerate input (e.g. a singular least-squares system).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),
}

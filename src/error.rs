//! Engine error types

use thiserror::Error;

/// Errors raised by the numeric core.
///
/// Degenerate-but-valid data (zero variance, an empty cluster) is handled
/// with numeric fallbacks and never produces one of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("index {index} out of bounds for series of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("matrix index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    MatrixIndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("{strategy}: need at least {required} prices, got {available}")]
    InsufficientHistory {
        strategy: String,
        required: usize,
        available: usize,
    },
}

impl EngineError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

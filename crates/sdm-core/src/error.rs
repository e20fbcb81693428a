//! Error types for memory and bit vector operations.

use thiserror::Error;

/// Errors that can occur when talking to a sparse distributed memory.
///
/// Every variant is raised at the operation boundary, before any counter
/// is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SdmError {
    #[error("Dimension mismatch: expected {expected} bits, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid probability {0}: must lie in [0, 1]")]
    InvalidProbability(f64),

    #[error("Invalid vector size: expected {expected} bytes, got {actual}")]
    InvalidSize { expected: usize, actual: usize },

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    #[error("Invalid bit value {value} at index {index}: expected 0 or 1")]
    InvalidBit { index: usize, value: u8 },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SdmError>;

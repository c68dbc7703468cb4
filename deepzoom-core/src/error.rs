//! Core error types.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("Invalid viewport: extent must be strictly positive (width={width}, height={height})")]
    InvalidViewport { width: String, height: String },

    #[error("Failed to parse decimal {input:?}: {reason}")]
    Parse { input: String, reason: String },

    #[error("Cannot represent non-finite value {0} as a decimal")]
    NonFinite(f64),

    #[error("Image size must be non-zero (got {width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

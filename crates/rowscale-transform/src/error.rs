//! Error types for rowscale-transform

use thiserror::Error;

/// Errors that can occur during resampling
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] rowscale_core::Error),

    /// Invalid scale factor
    #[error("invalid scale factor: {0}")]
    InvalidScaleFactor(String),

    /// Invalid resampling parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Fractional sample position outside the source image
    #[error("sample ({row}, {col}) outside {width}x{height} source")]
    SampleOutOfRange {
        row: f64,
        col: f64,
        width: u32,
        height: u32,
    },
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;

//! Error types for the resize driver

use rowscale_dist::{DistError, RowRange};
use rowscale_io::IoError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a distributed resize
#[derive(Debug, Error)]
pub enum ResizeError {
    /// The coordinator could not load the source image
    #[error("failed to decode {}: {source}", path.display())]
    Decode { path: PathBuf, source: IoError },

    /// The coordinator failed before broadcasting, so this participant stopped
    #[error("participant {participant} aborted: coordinator has no source image")]
    Aborted { participant: usize },

    /// Resampling failed inside the fault boundary
    #[error(
        "participant {participant} faulted on rows {}..{}: {message}",
        range.start,
        range.end()
    )]
    Fault {
        participant: usize,
        range: RowRange,
        message: String,
    },

    /// A collective operation failed
    #[error("communication error: {0}")]
    Comm(#[from] DistError),

    /// The coordinator could not write the output image
    #[error("failed to encode {}: {source}", path.display())]
    Encode { path: PathBuf, source: IoError },

    /// Invalid scale factors, participant count or output size
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ResizeError {
    /// Process exit status for this error.
    ///
    /// | Error | Status |
    /// |---|---|
    /// | `Decode`, `Encode`, `Aborted` | 1 |
    /// | `Comm` | 2 |
    /// | `Fault` | 11 |
    /// | `Config` | 64 |
    pub fn exit_code(&self) -> u8 {
        match self {
            ResizeError::Decode { .. } | ResizeError::Encode { .. } | ResizeError::Aborted { .. } => 1,
            ResizeError::Comm(_) => 2,
            ResizeError::Fault { .. } => 11,
            ResizeError::Config(_) => 64,
        }
    }
}

/// Result type for resize operations
pub type ResizeResult<T> = Result<T, ResizeError>;

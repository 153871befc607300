//! Error types for rowscale-dist

use thiserror::Error;

/// Errors raised by partitioning and collective operations
#[derive(Debug, Error)]
pub enum DistError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] rowscale_core::Error),

    /// Invalid group size or rank
    #[error("invalid group: {0}")]
    InvalidGroup(String),

    /// A peer endpoint went away before the collective completed
    #[error("participant {rank}: peer {peer} disconnected")]
    Disconnected { rank: usize, peer: usize },

    /// A participant thread panicked outside any fault boundary
    #[error("participant {rank} panicked")]
    ParticipantPanicked { rank: usize },

    /// Buffer length disagrees with what the collective expects
    #[error("participant {rank}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        rank: usize,
        expected: usize,
        actual: usize,
    },

    /// Counts/offsets do not describe a valid placement
    #[error("invalid gather plan: {0}")]
    InvalidPlan(String),

    /// A message of the wrong kind arrived, or a broadcast value is invalid
    #[error("protocol violation: {0}")]
    Protocol(String),
}

/// Result type for distribution operations
pub type DistResult<T> = Result<T, DistError>;

//! Resize configuration

use crate::{ResizeError, ResizeResult};
use rowscale_transform::{CoordMapping, ScaleFactors};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;

/// Default output file written by the coordinator.
pub const DEFAULT_OUTPUT: &str = "output.png";

/// Parameters of one distributed resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeConfig {
    /// Per-axis scale factors
    pub factors: ScaleFactors,
    /// Output-to-source coordinate mapping
    pub mapping: CoordMapping,
    /// Number of participants, coordinator included
    pub participants: usize,
    /// Where the coordinator writes the result; the extension picks the format
    pub output: PathBuf,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            factors: ScaleFactors::default(),
            mapping: CoordMapping::default(),
            participants: thread::available_parallelism().map_or(1, NonZeroUsize::get),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl ResizeConfig {
    /// Default configuration with the given factors.
    pub fn with_factors(factors: ScaleFactors) -> Self {
        Self {
            factors,
            ..Self::default()
        }
    }

    /// Set the participant count.
    pub fn participants(mut self, participants: usize) -> Self {
        self.participants = participants;
        self
    }

    /// Set the coordinate mapping.
    pub fn mapping(mut self, mapping: CoordMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Set the output path.
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Check the factors and the participant count.
    ///
    /// Output sizes depend on the source image and are checked once its
    /// dimensions are known.
    pub fn validate(&self) -> ResizeResult<()> {
        self.factors
            .validate()
            .map_err(|e| ResizeError::Config(e.to_string()))?;
        if self.participants == 0 {
            return Err(ResizeError::Config(
                "participant count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Output dimensions for a `width x height` source.
    pub fn output_size(&self, width: u32, height: u32) -> ResizeResult<(u32, u32)> {
        self.factors
            .output_size(width, height)
            .map_err(|e| ResizeError::Config(e.to_string()))
    }
}

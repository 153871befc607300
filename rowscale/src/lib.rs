//! rowscale - Distributed bilinear image resizer
//!
//! A fixed group of participants cooperates on one resize. Participant 0,
//! the coordinator, decodes the source and broadcasts it; every
//! participant resamples its own band of output rows; the coordinator
//! gathers the bands and writes the result.
//!
//! # Example
//!
//! ```
//! use rowscale::{Image, Pixel, ResizeConfig, ScaleFactors, resize_image_distributed};
//!
//! let src = Image::from_pixels(2, 2, vec![Pixel::opaque(10, 20, 30); 4]).unwrap();
//! let config = ResizeConfig::with_factors(ScaleFactors::new(2.0, 3.0).unwrap()).participants(3);
//! let out = resize_image_distributed(&src, &config).unwrap();
//! assert_eq!(out.dimensions(), (4, 6));
//! ```

mod config;
mod driver;
mod error;

pub use config::{DEFAULT_OUTPUT, ResizeConfig};
pub use driver::{
    DriverState, ResizeReport, resize_distributed, resize_image_distributed, run_participant,
};
pub use error::{ResizeError, ResizeResult};

// Re-export core types (primary data structures used everywhere)
pub use rowscale_core::*;

// Re-export the kernel types that appear in the configuration
pub use rowscale_transform::{CoordMapping, ScaleFactors};

// Re-export domain crates as modules to avoid name conflicts
pub use rowscale_dist as dist;
pub use rowscale_io as io;
pub use rowscale_transform as transform;

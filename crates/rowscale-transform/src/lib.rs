//! rowscale-transform - Resampling kernel for rowscale
//!
//! This crate provides the numeric half of the distributed resizer:
//!
//! - [`ScaleFactors`] - Per-axis scale factors and output-size rule
//! - [`CoordMapping`] - How output pixels map back into the source
//! - [`sample_bilinear`] - One output pixel from a fractional source position
//! - [`resample_rows`] - A horizontal slice of the output canvas
//! - [`resize`] - The whole canvas in a single call
//!
//! Output is a pure function of the source image, the output size and the
//! mapping, so slicing the canvas into row bands and computing them
//! independently reproduces [`resize`] byte for byte.

pub mod bilinear;
mod error;
pub mod scale;

pub use bilinear::sample_bilinear;
pub use error::{TransformError, TransformResult};
pub use scale::{CoordMapping, ScaleFactors, resample_rows, resize};

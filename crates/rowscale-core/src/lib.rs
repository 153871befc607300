//! rowscale-core - Pixel buffer types shared by every rowscale crate
//!
//! This crate provides the data model exchanged between the codec, the
//! resampler and the collective-communication layer:
//!
//! - [`Pixel`] - One RGBA pixel with four 8-bit channels
//! - [`Image`] - Row-major buffer of pixels with fixed dimensions
//!
//! # Pixel layout
//!
//! Pixels are stored row-major, four interleaved 8-bit channels in
//! R, G, B, A order. The byte view of an image (see
//! [`Image::to_rgba_bytes`]) is exactly `width * height * 4` bytes with no
//! row padding, which is the layout broadcast to and gathered from
//! participants.

pub mod error;
pub mod image;

pub use error::{Error, Result};
pub use image::{Image, Pixel, pixels_from_bytes, pixels_to_bytes};

//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate and writes them with
//! `jpeg-encoder`. Decoded pixels are always opaque; the alpha channel is
//! dropped on write.

use crate::{IoError, IoResult};
use jpeg_decoder::PixelFormat;
use rowscale_core::{Image, Pixel};
use std::io::{Read, Write};

/// Quality used when writing JPEG output.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Read a JPEG image from a reader.
///
/// Supports 8-bit grayscale and 24-bit RGB. Both decode to opaque RGBA.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Image> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let data = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let width = u32::from(info.width);
    let height = u32::from(info.height);
    let pixels: Vec<Pixel> = match info.pixel_format {
        PixelFormat::L8 => data.iter().map(|&v| Pixel::opaque(v, v, v)).collect(),
        PixelFormat::RGB24 => data
            .chunks_exact(3)
            .map(|c| Pixel::opaque(c[0], c[1], c[2]))
            .collect(),
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    };

    Ok(Image::from_pixels(width, height, pixels)?)
}

/// Write a JPEG image at the given quality (1-100).
pub fn write_jpeg<W: Write>(image: &Image, writer: W, quality: u8) -> IoResult<()> {
    let too_large = |dim: u32| {
        IoError::EncodeError(format!("JPEG dimension {} exceeds {}", dim, u16::MAX))
    };
    let width = u16::try_from(image.width()).map_err(|_| too_large(image.width()))?;
    let height = u16::try_from(image.height()).map_err(|_| too_large(image.height()))?;

    let mut rgb = Vec::with_capacity(image.pixels().len() * 3);
    for p in image.pixels() {
        rgb.extend_from_slice(&[p.r, p.g, p.b]);
    }

    let encoder = jpeg_encoder::Encoder::new(writer, quality.clamp(1, 100));
    encoder
        .encode(&rgb, width, height, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))
}

//! RGBA pixel and byte-view helpers

use crate::error::{Error, Result};

/// One RGBA pixel, four 8-bit channels.
///
/// The in-memory order matches the interleaved byte layout used on the
/// wire: red, green, blue, alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// Number of bytes in one pixel.
    pub const BYTES: usize = 4;

    /// Fully opaque alpha value.
    pub const OPAQUE: u8 = 255;

    /// Create a pixel from its four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque pixel.
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, Self::OPAQUE)
    }

    /// Interleaved `[r, g, b, a]` bytes.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build a pixel from interleaved `[r, g, b, a]` bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// Flatten pixels into tightly packed RGBA bytes.
pub fn pixels_to_bytes(pixels: &[Pixel]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() * Pixel::BYTES);
    for p in pixels {
        out.extend_from_slice(&p.to_bytes());
    }
    out
}

/// Reinterpret tightly packed RGBA bytes as pixels.
///
/// # Errors
///
/// Returns [`Error::BufferSizeMismatch`] if `bytes.len()` is not a
/// multiple of [`Pixel::BYTES`].
pub fn pixels_from_bytes(bytes: &[u8]) -> Result<Vec<Pixel>> {
    if bytes.len() % Pixel::BYTES != 0 {
        return Err(Error::BufferSizeMismatch {
            expected: bytes.len().next_multiple_of(Pixel::BYTES),
            actual: bytes.len(),
        });
    }
    Ok(bytes
        .chunks_exact(Pixel::BYTES)
        .map(|c| Pixel::from_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

//! Image - The pixel buffer exchanged by every rowscale component
//!
//! An [`Image`] is a row-major sequence of [`Pixel`]s with fixed
//! dimensions. The invariant `pixels.len() == width * height` holds for
//! every constructed value; there is no partially populated state.
//!
//! # Orientation
//!
//! Row 0 is whatever the producer put first. The codec crate stores
//! images bottom-up (row 0 is the last row of the encoded file), see
//! [`Image::flip_vertical`].

mod pixel;

pub use pixel::{Pixel, pixels_from_bytes, pixels_to_bytes};

use crate::error::{Error, Result};

/// Row-major RGBA image.
///
/// # Examples
///
/// ```
/// use rowscale_core::{Image, Pixel};
///
/// let mut image = Image::new(4, 2).unwrap();
/// image.set_pixel(3, 1, Pixel::opaque(255, 0, 0)).unwrap();
/// assert_eq!(image.get_pixel(3, 1), Some(Pixel::opaque(255, 0, 0)));
/// assert_eq!(image.byte_len(), 4 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Image {
    /// Create a new image filled with transparent black.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = Self::checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![Pixel::default(); len],
        })
    }

    /// Wrap an existing pixel vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0 and
    /// [`Error::BufferSizeMismatch`] if `pixels.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self> {
        let len = Self::checked_len(width, height)?;
        if pixels.len() != len {
            return Err(Error::BufferSizeMismatch {
                expected: len,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build an image from tightly packed RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] if `bytes.len()` is not
    /// `width * height * 4`.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let len = Self::checked_len(width, height)?;
        let expected = len * Pixel::BYTES;
        if bytes.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        Self::from_pixels(width, height, pixels_from_bytes(bytes)?)
    }

    fn checked_len(width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(Pixel::BYTES).map(|_| n))
            .ok_or_else(|| {
                Error::InvalidParameter(format!("image {width}x{height} exceeds address space"))
            })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size of the packed RGBA byte view.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.pixels.len() * Pixel::BYTES
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Mutable access to all pixels, row-major.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Pixels of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[Pixel] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    /// Get the pixel at column `x`, row `y`.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Set the pixel at column `x`, row `y`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) -> Result<()> {
        if x >= self.width {
            return Err(Error::IndexOutOfBounds {
                index: x as usize,
                len: self.width as usize,
            });
        }
        if y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.height as usize,
            });
        }
        self.pixels[y as usize * self.width as usize + x as usize] = pixel;
        Ok(())
    }

    /// Packed RGBA bytes, `width * height * 4` long.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        pixels_to_bytes(&self.pixels)
    }

    /// Reverse the row order in place.
    pub fn flip_vertical(&mut self) {
        let w = self.width as usize;
        let h = self.height as usize;
        for y in 0..h / 2 {
            let (top, bottom) = self.pixels.split_at_mut((h - 1 - y) * w);
            top[y * w..(y + 1) * w].swap_with_slice(&mut bottom[..w]);
        }
    }

    /// Return a vertically flipped copy.
    pub fn flipped_vertical(&self) -> Self {
        let mut out = self.clone();
        out.flip_vertical();
        out
    }
}

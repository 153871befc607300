//! rowscale-io - Image codec boundary
//!
//! Decodes files into row-major RGBA [`Image`]s and encodes them back.
//!
//! # Orientation
//!
//! Decoded images are flipped vertically: row 0 of the in-memory buffer
//! is the bottom row of the file. Encoding applies the same flip, so a
//! decode followed by an encode reproduces the original picture.
//!
//! # Supported formats
//!
//! | Format | Read | Write | Feature |
//! |---|---|---|---|
//! | PNG | yes | yes | `png-format` |
//! | JPEG | yes | yes | `jpeg` |

mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format_from_bytes};

use rowscale_core::Image;
use std::fs;
use std::path::Path;

/// Read an image from a file path.
///
/// The format is detected from the file contents, not the extension.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let image = read_image_mem(&data)?;
    log::debug!(
        "decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Decode an image from memory and flip it bottom-up.
pub fn read_image_mem(data: &[u8]) -> IoResult<Image> {
    let format = detect_format_from_bytes(data)?;
    let mut image = decode(format, data)?;
    image.flip_vertical();
    Ok(image)
}

fn decode(format: ImageFormat, data: &[u8]) -> IoResult<Image> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(std::io::Cursor::new(data)),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(data),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not enabled",
            other
        ))),
    }
}

/// Write an image to a file path in the given format.
pub fn write_image<P: AsRef<Path>>(image: &Image, path: P, format: ImageFormat) -> IoResult<()> {
    let path = path.as_ref();
    let data = write_image_mem(image, format)?;
    fs::write(path, data)?;
    log::debug!(
        "encoded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        format
    );
    Ok(())
}

/// Flip an image back to top-down order and encode it into memory.
pub fn write_image_mem(image: &Image, format: ImageFormat) -> IoResult<Vec<u8>> {
    let flipped = image.flipped_vertical();
    let mut out = Vec::new();
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(&flipped, &mut out)?,
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(&flipped, &mut out, jpeg::DEFAULT_JPEG_QUALITY)?,
        #[allow(unreachable_patterns)]
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "{:?} support not enabled",
                other
            )));
        }
    }
    Ok(out)
}

//! Bilinear interpolation kernel
//!
//! Computes one output pixel as the weighted sum of the four source pixels
//! surrounding a fractional `(row, col)` position:
//!
//! ```text
//! alpha = ceil(row) - row        beta = ceil(col) - col
//!
//! v =   alpha     *  beta      * P(floor row, floor col)
//!     + (1-alpha) *  beta      * P(ceil row,  floor col)
//!     +  alpha    * (1-beta)   * P(floor row, ceil col)
//!     + (1-alpha) * (1-beta)   * P(ceil row,  ceil col)
//! ```
//!
//! Each channel is truncated toward zero into 8 bits, with no rounding.
//! The result alpha is always 255, whatever the source alpha.

use crate::{TransformError, TransformResult};
use rowscale_core::{Image, Pixel};

/// Sample `source` at a fractional position.
///
/// Valid for `0 <= row <= height - 1` and `0 <= col <= width - 1`.
///
/// The ceiling indices are clamped to the last row and column.
///
/// # Errors
///
/// Returns [`TransformError::SampleOutOfRange`] for positions outside the
/// source or non-finite coordinates.
pub fn sample_bilinear(source: &Image, row: f64, col: f64) -> TransformResult<Pixel> {
    let (width, height) = source.dimensions();
    let max_row = f64::from(height - 1);
    let max_col = f64::from(width - 1);
    if !(0.0..=max_row).contains(&row) || !(0.0..=max_col).contains(&col) {
        return Err(TransformError::SampleOutOfRange {
            row,
            col,
            width,
            height,
        });
    }

    let fm = row.floor() as usize;
    let cm = (row.ceil() as usize).min(height as usize - 1);
    let fnn = col.floor() as usize;
    let cn = (col.ceil() as usize).min(width as usize - 1);
    let alpha = row.ceil() - row;
    let beta = col.ceil() - col;

    let w = width as usize;
    let pixels = source.pixels();
    let p_ff = pixels[fm * w + fnn];
    let p_cf = pixels[cm * w + fnn];
    let p_fc = pixels[fm * w + cn];
    let p_cc = pixels[cm * w + cn];

    let w_ff = alpha * beta;
    let w_cf = (1.0 - alpha) * beta;
    let w_fc = alpha * (1.0 - beta);
    let w_cc = (1.0 - alpha) * (1.0 - beta);

    let channel = |ff: u8, cf: u8, fc: u8, cc: u8| -> u8 {
        let v = w_ff * f64::from(ff)
            + w_cf * f64::from(cf)
            + w_fc * f64::from(fc)
            + w_cc * f64::from(cc);
        v as u8
    };

    Ok(Pixel::opaque(
        channel(p_ff.r, p_cf.r, p_fc.r, p_cc.r),
        channel(p_ff.g, p_cf.g, p_fc.g, p_cc.g),
        channel(p_ff.b, p_cf.b, p_fc.b, p_cc.b),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners() -> Image {
        Image::from_pixels(
            2,
            2,
            vec![
                Pixel::opaque(0, 0, 0),
                Pixel::opaque(255, 0, 0),
                Pixel::opaque(0, 255, 0),
                Pixel::opaque(0, 0, 255),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_integer_position_returns_source_pixel() {
        let img = corners();
        assert_eq!(sample_bilinear(&img, 0.0, 1.0).unwrap(), Pixel::opaque(255, 0, 0));
        assert_eq!(sample_bilinear(&img, 1.0, 0.0).unwrap(), Pixel::opaque(0, 255, 0));
        assert_eq!(sample_bilinear(&img, 1.0, 1.0).unwrap(), Pixel::opaque(0, 0, 255));
    }

    #[test]
    fn test_midpoint_truncates() {
        let img = corners();
        // Each corner contributes 0.25 * 255 = 63.75, truncated to 63.
        let p = sample_bilinear(&img, 0.5, 0.5).unwrap();
        assert_eq!(p, Pixel::opaque(63, 63, 63));
    }

    #[test]
    fn test_row_only_interpolation() {
        let img = corners();
        // Column 0 runs from black (row 0) to green (row 1).
        let p = sample_bilinear(&img, 0.25, 0.0).unwrap();
        assert_eq!(p, Pixel::opaque(0, 63, 0));
    }

    #[test]
    fn test_alpha_forced_opaque() {
        let img = Image::from_pixels(2, 1, vec![Pixel::new(10, 20, 30, 0); 2]).unwrap();
        let p = sample_bilinear(&img, 0.0, 0.5).unwrap();
        assert_eq!(p.a, 255);
        assert_eq!((p.r, p.g, p.b), (10, 20, 30));
    }

    #[test]
    fn test_single_pixel_source() {
        let img = Image::from_pixels(1, 1, vec![Pixel::new(7, 8, 9, 1)]).unwrap();
        assert_eq!(sample_bilinear(&img, 0.0, 0.0).unwrap(), Pixel::opaque(7, 8, 9));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let img = corners();
        for (row, col) in [(-0.1, 0.0), (0.0, 1.01), (1.5, 0.0), (f64::NAN, 0.0)] {
            assert!(matches!(
                sample_bilinear(&img, row, col),
                Err(TransformError::SampleOutOfRange { .. })
            ));
        }
    }
}

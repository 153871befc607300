//! Image scaling by bilinear interpolation
//!
//! Output sizes truncate toward zero: `out_width = floor(in_width * x)`.
//! With the default [`CoordMapping::Reference`], output pixel `(i, j)`
//! samples the source at `row = i * (in_height - 1) / out_height` and
//! `col = j * (in_width - 1) / out_width`.
//!
//! | Rust function | Role |
//! |---|---|
//! | `resize` | whole output canvas |
//! | `resample_rows` | one horizontal band of the canvas |

use crate::bilinear::sample_bilinear;
use crate::{TransformError, TransformResult};
use rowscale_core::{Image, Pixel};
use std::ops::Range;
use std::str::FromStr;

/// Per-axis scale factors.
///
/// Defaults to `x = 2.0`, `y = 8.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    /// Horizontal factor
    pub x: f64,
    /// Vertical factor
    pub y: f64,
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self { x: 2.0, y: 8.0 }
    }
}

impl ScaleFactors {
    /// Create validated scale factors.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidScaleFactor`] unless both factors
    /// are finite and strictly positive.
    pub fn new(x: f64, y: f64) -> TransformResult<Self> {
        let factors = Self { x, y };
        factors.validate()?;
        Ok(factors)
    }

    /// Check both factors are finite and strictly positive.
    pub fn validate(&self) -> TransformResult<()> {
        for (axis, v) in [("x", self.x), ("y", self.y)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(TransformError::InvalidScaleFactor(format!(
                    "{axis} = {v}, must be finite and > 0"
                )));
            }
        }
        Ok(())
    }

    /// Output dimensions for an input of `width x height`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidScaleFactor`] if either output
    /// dimension truncates to zero or exceeds `u32::MAX`.
    pub fn output_size(&self, width: u32, height: u32) -> TransformResult<(u32, u32)> {
        self.validate()?;
        let scaled = |len: u32, factor: f64, axis: &str| -> TransformResult<u32> {
            let out = (f64::from(len) * factor).trunc();
            if out < 1.0 || out > f64::from(u32::MAX) {
                return Err(TransformError::InvalidScaleFactor(format!(
                    "{axis}: {len} * {factor} gives an output size of {out}"
                )));
            }
            Ok(out as u32)
        };
        Ok((
            scaled(width, self.x, "x")?,
            scaled(height, self.y, "y")?,
        ))
    }
}

/// How an output pixel index maps back to a source coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordMapping {
    /// Integer product `i * (in_len - 1)`, then a single-precision divide
    /// by `out_len`. Bit-compatible with historical output.
    #[default]
    Reference,
    /// A different sampling grid, not a higher-precision
    /// [`CoordMapping::Reference`]: the divisor is `out_len - 1` instead of
    /// `out_len`, so the first and last output samples land on the first
    /// and last source samples, `i * (in_len - 1) / (out_len - 1)`, computed
    /// in double precision. Scale 1.0 is an exact copy.
    Precise,
}

impl CoordMapping {
    /// Source coordinate for output index `index` on an axis of
    /// `out_len` output and `in_len` input samples.
    #[inline]
    pub fn source_coord(self, index: u32, out_len: u32, in_len: u32) -> f64 {
        let span = in_len.saturating_sub(1);
        match self {
            CoordMapping::Reference => {
                let product = u64::from(index) * u64::from(span);
                f64::from(product as f32 / out_len as f32)
            }
            CoordMapping::Precise if out_len <= 1 => 0.0,
            CoordMapping::Precise => {
                f64::from(index) * f64::from(span) / f64::from(out_len - 1)
            }
        }
    }
}

impl FromStr for CoordMapping {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reference" => Ok(CoordMapping::Reference),
            "precise" => Ok(CoordMapping::Precise),
            other => Err(TransformError::InvalidParameters(format!(
                "unknown coordinate mapping '{other}' (expected reference or precise)"
            ))),
        }
    }
}

/// Compute output rows `rows` of an `out_width x out_height` canvas.
///
/// Returns the band tightly packed row-major: `rows.len() * out_width`
/// pixels. An empty range yields an empty vector.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if the canvas is empty or
/// `rows` reaches past `out_height`, and propagates
/// [`TransformError::SampleOutOfRange`] from the kernel.
pub fn resample_rows(
    source: &Image,
    out_width: u32,
    out_height: u32,
    rows: Range<u32>,
    mapping: CoordMapping,
) -> TransformResult<Vec<Pixel>> {
    if out_width == 0 || out_height == 0 {
        return Err(TransformError::InvalidParameters(format!(
            "empty output canvas {out_width}x{out_height}"
        )));
    }
    if rows.end > out_height {
        return Err(TransformError::InvalidParameters(format!(
            "rows {rows:?} exceed output height {out_height}"
        )));
    }
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let (in_width, in_height) = source.dimensions();
    let cols: Vec<f64> = (0..out_width)
        .map(|j| mapping.source_coord(j, out_width, in_width))
        .collect();

    let mut out = Vec::with_capacity(rows.len() * out_width as usize);
    for i in rows {
        let row = mapping.source_coord(i, out_height, in_height);
        for &col in &cols {
            out.push(sample_bilinear(source, row, col)?);
        }
    }
    Ok(out)
}

/// Resize a whole image in one call.
///
/// # Examples
///
/// ```
/// use rowscale_core::{Image, Pixel};
/// use rowscale_transform::{CoordMapping, ScaleFactors, resize};
///
/// let src = Image::from_pixels(2, 1, vec![Pixel::opaque(0, 0, 0); 2]).unwrap();
/// let out = resize(&src, ScaleFactors::new(2.0, 3.0).unwrap(), CoordMapping::Reference).unwrap();
/// assert_eq!(out.dimensions(), (4, 3));
/// ```
pub fn resize(
    source: &Image,
    factors: ScaleFactors,
    mapping: CoordMapping,
) -> TransformResult<Image> {
    let (out_width, out_height) = factors.output_size(source.width(), source.height())?;
    let pixels = resample_rows(source, out_width, out_height, 0..out_height, mapping)?;
    Ok(Image::from_pixels(out_width, out_height, pixels)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factors() {
        assert_eq!(ScaleFactors::default(), ScaleFactors { x: 2.0, y: 8.0 });
    }

    #[test]
    fn test_invalid_factors() {
        assert!(ScaleFactors::new(0.0, 1.0).is_err());
        assert!(ScaleFactors::new(1.0, -2.0).is_err());
        assert!(ScaleFactors::new(f64::NAN, 1.0).is_err());
        assert!(ScaleFactors::new(f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_output_size_truncates() {
        let f = ScaleFactors::new(1.5, 0.5).unwrap();
        assert_eq!(f.output_size(5, 5).unwrap(), (7, 2));
        let f = ScaleFactors::new(2.0, 8.0).unwrap();
        assert_eq!(f.output_size(3, 2).unwrap(), (6, 16));
    }

    #[test]
    fn test_output_size_rejects_empty() {
        let f = ScaleFactors::new(0.1, 1.0).unwrap();
        assert!(f.output_size(5, 5).is_err());
    }

    #[test]
    fn test_reference_mapping_values() {
        // 3 * (2 - 1) / 4 = 0.75
        assert_eq!(CoordMapping::Reference.source_coord(3, 4, 2), 0.75);
        assert_eq!(CoordMapping::Reference.source_coord(0, 4, 2), 0.0);
        // in_len == 1 always maps to 0
        assert_eq!(CoordMapping::Reference.source_coord(5, 8, 1), 0.0);
    }

    #[test]
    fn test_reference_mapping_is_single_precision() {
        // 1 * 2 / 3 in f32 differs from the f64 quotient.
        let reference = CoordMapping::Reference.source_coord(1, 3, 3);
        assert_eq!(reference, f64::from(2.0f32 / 3.0f32));
        assert_ne!(reference, 2.0 / 3.0);
    }

    #[test]
    fn test_precise_mapping_aligns_ends() {
        assert_eq!(CoordMapping::Precise.source_coord(0, 7, 3), 0.0);
        assert_eq!(CoordMapping::Precise.source_coord(6, 7, 3), 2.0);
        assert_eq!(CoordMapping::Precise.source_coord(3, 7, 3), 1.0);
        assert_eq!(CoordMapping::Precise.source_coord(0, 1, 5), 0.0);
        // Same inputs, different grid: divisor out_len - 1 vs out_len.
        assert_eq!(CoordMapping::Precise.source_coord(1, 4, 4), 1.0);
        assert_eq!(CoordMapping::Reference.source_coord(1, 4, 4), 0.75);
        // Same length: every output index lands on its source index.
        for i in 0..10 {
            assert_eq!(CoordMapping::Precise.source_coord(i, 10, 10), f64::from(i));
        }
    }

    #[test]
    fn test_mapping_stays_inside_source() {
        for mapping in [CoordMapping::Reference, CoordMapping::Precise] {
            for out_len in 1..50 {
                for in_len in 1..20 {
                    let last = mapping.source_coord(out_len - 1, out_len, in_len);
                    assert!(last <= f64::from(in_len - 1));
                }
            }
        }
    }

    #[test]
    fn test_mapping_from_str() {
        assert_eq!(
            "Reference".parse::<CoordMapping>().unwrap(),
            CoordMapping::Reference
        );
        assert_eq!(
            "precise".parse::<CoordMapping>().unwrap(),
            CoordMapping::Precise
        );
        assert!("cubic".parse::<CoordMapping>().is_err());
    }

    #[test]
    fn test_resample_rows_bounds() {
        let src = Image::new(2, 2).unwrap();
        assert!(resample_rows(&src, 4, 4, 2..5, CoordMapping::Reference).is_err());
        assert!(resample_rows(&src, 0, 4, 0..1, CoordMapping::Reference).is_err());
        assert!(
            resample_rows(&src, 4, 4, 3..3, CoordMapping::Reference)
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            resample_rows(&src, 4, 4, 1..3, CoordMapping::Reference)
                .unwrap()
                .len(),
            8
        );
    }

    #[test]
    fn test_bands_match_whole_canvas() {
        let pixels = (0..12u8)
            .map(|i| Pixel::new(i * 20, 255 - i * 20, i * 7, i))
            .collect();
        let src = Image::from_pixels(4, 3, pixels).unwrap();
        let whole = resample_rows(&src, 9, 7, 0..7, CoordMapping::Reference).unwrap();
        let mut banded = resample_rows(&src, 9, 7, 4..7, CoordMapping::Reference).unwrap();
        let head = resample_rows(&src, 9, 7, 0..4, CoordMapping::Reference).unwrap();
        banded.splice(0..0, head);
        assert_eq!(whole, banded);
    }
}

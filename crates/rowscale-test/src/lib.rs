//! rowscale-test - Regression test framework for rowscale
//!
//! Supports three modes, selected with the `REGTEST_MODE` environment
//! variable:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files (default)
//! - **Display**: Run tests without comparison
//!
//! # Usage
//!
//! ```ignore
//! use rowscale_test::{RegParams, corner_image};
//!
//! let mut rp = RegParams::new("resample");
//! rp.compare_values(4.0, image.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! Test images are synthesised in code; there are no binary fixtures.

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use rowscale_core::{Image, Pixel};

/// Load an image written earlier by a test
pub fn load_image(path: &str) -> TestResult<Image> {
    rowscale_io::read_image(path).map_err(|e| TestError::ImageLoad {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // rowscale-test is at crates/rowscale-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// 2x2 image with black, red, green and blue corners (row-major).
pub fn corner_image() -> Image {
    let pixels = vec![
        Pixel::opaque(0, 0, 0),
        Pixel::opaque(255, 0, 0),
        Pixel::opaque(0, 255, 0),
        Pixel::opaque(0, 0, 255),
    ];
    Image::from_pixels(2, 2, pixels).expect("2x2 corner image")
}

/// Bilinear output for [`corner_image`] at scale (2, 2) with the default
/// coordinate mapping, as `(r, g, b)` rows; alpha is 255 throughout.
pub const CORNER_4X4: [[(u8, u8, u8); 4]; 4] = [
    [(0, 0, 0), (63, 0, 0), (127, 0, 0), (191, 0, 0)],
    [(0, 63, 0), (47, 47, 15), (95, 31, 31), (143, 15, 47)],
    [(0, 127, 0), (31, 95, 31), (63, 63, 63), (95, 31, 95)],
    [(0, 191, 0), (15, 143, 47), (31, 95, 95), (47, 47, 143)],
];

/// [`CORNER_4X4`] as an opaque 4x4 image.
pub fn corner_4x4_image() -> Image {
    let pixels = CORNER_4X4
        .iter()
        .flatten()
        .map(|&(r, g, b)| Pixel::opaque(r, g, b))
        .collect();
    Image::from_pixels(4, 4, pixels).expect("4x4 corner output")
}

/// Smooth gradient: red follows x, green follows y, blue mixes both.
///
/// Alpha varies too, so tests can check that resampled alpha is ignored.
pub fn gradient_image(width: u32, height: u32) -> Image {
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(2).saturating_sub(1)).min(255) as u8;
            let g = (y * 255 / height.max(2).saturating_sub(1)).min(255) as u8;
            let b = ((x + y) * 7 % 256) as u8;
            let a = ((x * 31 + y * 17) % 256) as u8;
            pixels.push(Pixel::new(r, g, b, a));
        }
    }
    Image::from_pixels(width, height, pixels).expect("gradient image")
}

//! PNG image format support
//!
//! Every PNG flavour (palette, gray, gray-alpha, RGB, RGBA, 1 to 16 bits)
//! is normalised to 8-bit RGBA on read. Writing always emits 8-bit RGBA.
//! Rows are kept in file order here; the vertical flip happens in
//! [`crate::read_image_mem`] / [`crate::write_image_mem`].

use crate::{IoError, IoResult};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use rowscale_core::{Image, Pixel};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unexpected PNG output depth: {:?}",
            bit_depth
        )));
    }
    let samples = match color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "palette was not expanded".to_string(),
            ));
        }
    };

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    if bytes_per_row < width as usize * samples || data.len() < bytes_per_row * height as usize
    {
        return Err(IoError::InvalidData(format!(
            "PNG frame too small for {}x{}",
            width, height
        )));
    }

    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height as usize {
        let row = &data[y * bytes_per_row..y * bytes_per_row + width as usize * samples];
        for px in row.chunks_exact(samples) {
            let pixel = match samples {
                1 => Pixel::opaque(px[0], px[0], px[0]),
                2 => Pixel::new(px[0], px[0], px[0], px[1]),
                3 => Pixel::opaque(px[0], px[1], px[2]),
                _ => Pixel::new(px[0], px[1], px[2], px[3]),
            };
            pixels.push(pixel);
        }
    }

    Ok(Image::from_pixels(width, height, pixels)?)
}

/// Write a PNG image as 8-bit RGBA
pub fn write_png<W: Write>(image: &Image, writer: W) -> IoResult<()> {
    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(&image.to_rgba_bytes())
        .map_err(|e| IoError::EncodeError(format!("PNG data error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_raw(width: u32, height: u32, color: ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn test_png_rgba_roundtrip() {
        let pixels = vec![
            Pixel::new(1, 2, 3, 4),
            Pixel::new(5, 6, 7, 8),
            Pixel::new(9, 10, 11, 12),
            Pixel::new(13, 14, 15, 16),
            Pixel::new(17, 18, 19, 20),
            Pixel::new(21, 22, 23, 24),
        ];
        let image = Image::from_pixels(3, 2, pixels).unwrap();
        let mut buf = Vec::new();
        write_png(&image, &mut buf).unwrap();
        let back = read_png(Cursor::new(buf)).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_png_gray_expands_to_opaque_rgba() {
        let data = encode_raw(2, 1, ColorType::Grayscale, &[0, 200]);
        let image = read_png(Cursor::new(data)).unwrap();
        assert_eq!(
            image.pixels(),
            &[Pixel::opaque(0, 0, 0), Pixel::opaque(200, 200, 200)]
        );
    }

    #[test]
    fn test_png_rgb_gets_opaque_alpha() {
        let data = encode_raw(1, 1, ColorType::Rgb, &[10, 20, 30]);
        let image = read_png(Cursor::new(data)).unwrap();
        assert_eq!(image.pixels(), &[Pixel::opaque(10, 20, 30)]);
    }

    #[test]
    fn test_png_garbage_is_decode_error() {
        let result = read_png(Cursor::new(vec![0x89, 0x50, 0x4E, 0x47, 0, 0, 0, 0]));
        assert!(matches!(result, Err(IoError::DecodeError(_))));
    }
}

//! Image normalization for uploads.
//!
//! Every stored photo goes through the same pipeline: decode whatever the
//! camera produced, downsample so neither dimension exceeds the configured
//! bound, re-encode as RGB JPEG, and base64 the result for the text column.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;

use crate::error::Error;

pub const MAX_DIMENSION: u32 = 800;
pub const JPEG_QUALITY: u8 = 85;

/// Decode, bound and re-encode an uploaded image.
///
/// Aspect ratio is preserved; images already within the bound keep their
/// dimensions (never upsampled). Undecodable input is a rejected upload,
/// surfaced as [`Error::UnsupportedImage`].
pub fn normalize(raw: &[u8], max_dimension: u32, jpeg_quality: u8) -> Result<Vec<u8>> {
    let img = image::load_from_memory(raw)
        .map_err(|e| Error::UnsupportedImage(e.to_string()))?;

    let img = if img.width() > max_dimension || img.height() > max_dimension {
        img.thumbnail(max_dimension, max_dimension)
    } else {
        img
    };

    // JPEG has no alpha channel; flatten before encoding.
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality);
    encoder.encode_image(&rgb)?;
    Ok(buf)
}

pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn from_base64(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            image::Rgb([80, 120, 200]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn dimensions(jpeg: &[u8]) -> (u32, u32) {
        let img = image::load_from_memory(jpeg).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn test_large_image_is_bounded() {
        let out = normalize(&png_bytes(2000, 1000), MAX_DIMENSION, JPEG_QUALITY).unwrap();
        let (w, h) = dimensions(&out);
        assert!(w <= 800 && h <= 800);
        // 2:1 aspect ratio preserved.
        assert_eq!((w, h), (800, 400));
    }

    #[test]
    fn test_small_image_is_not_upsampled() {
        let out = normalize(&png_bytes(400, 300), MAX_DIMENSION, JPEG_QUALITY).unwrap();
        assert_eq!(dimensions(&out), (400, 300));
    }

    #[test]
    fn test_output_is_jpeg() {
        let out = normalize(&png_bytes(10, 10), MAX_DIMENSION, JPEG_QUALITY).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn test_garbage_input_is_rejected() {
        let err = normalize(b"not an image", MAX_DIMENSION, JPEG_QUALITY).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnsupportedImage(_))
        ));
    }

    #[test]
    fn test_base64_round_trip() {
        let bytes = vec![0u8, 255, 7, 42];
        assert_eq!(from_base64(&to_base64(&bytes)).unwrap(), bytes);
    }
}

//! Raw encoders for the writable container formats.
//!
//! These take an RGBA [`RasterImage`] and produce file bytes without applying
//! any policy. Background filling and quality defaults live in
//! [`convert`](super::convert).

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::EncodeError;
use crate::decode::RasterImage;

/// Reject zero-sized images and buffers that don't match their dimensions.
fn check_buffer(image: &RasterImage) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = image.width as usize * image.height as usize * RasterImage::CHANNELS;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }
    Ok(())
}

/// Encode to PNG, keeping alpha.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>, EncodeError> {
    check_buffer(image)?;

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode to JPEG at `quality` (1-100, clamped).
///
/// The alpha channel is dropped as-is; callers that care about transparent
/// areas composite the image onto a background first.
///
/// # Quality Guidelines
///
/// * 90-100: High quality (the tools default to 95)
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(image: &RasterImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    check_buffer(image)?;

    let rgb: Vec<u8> = image
        .pixels
        .chunks_exact(RasterImage::CHANNELS)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&rgb, image.width, image.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode to lossless WebP, keeping alpha.
pub fn encode_webp(image: &RasterImage) -> Result<Vec<u8>, EncodeError> {
    check_buffer(image)?;

    let mut buffer = Cursor::new(Vec::new());
    WebPEncoder::new_lossless(&mut buffer)
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: every quality value yields a well-formed JPEG.
        #[test]
        fn prop_all_quality_values_work(
            (width, height) in (1u32..=30, 1u32..=30),
            quality in 0u8..=255,
        ) {
            let img = RasterImage::transparent(width, height);
            let jpeg = encode_jpeg(&img, quality).unwrap();
            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            prop_assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
        }

        /// Property: same input, same bytes.
        #[test]
        fn prop_png_deterministic(
            (width, height) in (1u32..=20, 1u32..=20),
            rgba in any::<[u8; 4]>(),
        ) {
            let img = RasterImage::new(width, height, rgba.repeat((width * height) as usize));
            prop_assert_eq!(encode_png(&img).unwrap(), encode_png(&img).unwrap());
        }

        /// Property: a buffer of the wrong length is always rejected.
        #[test]
        fn prop_invalid_pixel_length_returns_error(
            (width, height) in (1u32..=20, 1u32..=20),
            delta in 1usize..=10,
            shorter in any::<bool>(),
        ) {
            let expected = (width * height * 4) as usize;
            let len = if shorter { expected.saturating_sub(delta) } else { expected + delta };
            prop_assume!(len != expected);

            let img = RasterImage { width, height, pixels: vec![0; len] };
            prop_assert!(
                matches!(encode_png(&img), Err(EncodeError::InvalidPixelData { .. })),
                "mismatched buffer should be rejected"
            );
        }
    }
}

//! Format conversion policy.
//!
//! | Target | Alpha | Background fill |
//! |--------|-------|-----------------|
//! | PNG    | yes   | none            |
//! | JPEG   | no    | opaque white    |
//! | WEBP   | yes   | none            |
//!
//! Quality only matters for lossy targets. WebP is written losslessly, so its
//! quality setting is accepted and ignored.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::codec::{encode_jpeg, encode_png, encode_webp};
use super::EncodeError;
use crate::decode::{decode_image, RasterImage};
use crate::format::{ContainerFormat, ConversionRoute};

/// Quality used when none is given or the given one is out of range.
pub const DEFAULT_QUALITY: f32 = 0.95;

/// What to convert from and to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub source: ContainerFormat,
    pub target: ContainerFormat,
    /// In `(0, 1]`. `None` means [`DEFAULT_QUALITY`].
    #[serde(default)]
    pub quality: Option<f32>,
}

impl ConversionRequest {
    pub fn new(source: ContainerFormat, target: ContainerFormat) -> Self {
        Self {
            source,
            target,
            quality: None,
        }
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn from_route(route: &ConversionRoute) -> Self {
        Self::new(route.from.container(), route.to.container())
    }

    /// Requested quality, or the default when missing or outside `(0, 1]`.
    pub fn effective_quality(&self) -> f32 {
        normalize_quality(self.quality)
    }

    /// Fails with `UnsupportedFormat` unless the source can be decoded and
    /// the target encoded.
    pub fn check_supported(&self) -> Result<(), EncodeError> {
        if self.source.is_decodable() && self.target.is_encodable() {
            Ok(())
        } else {
            Err(EncodeError::UnsupportedFormat {
                from: self.source,
                to: self.target,
            })
        }
    }
}

fn normalize_quality(quality: Option<f32>) -> f32 {
    match quality {
        Some(q) if q > 0.0 && q <= 1.0 => q,
        _ => DEFAULT_QUALITY,
    }
}

/// Map a `(0, 1]` quality to the JPEG encoder's 1-100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Composite onto opaque white. The result has alpha 255 everywhere.
pub fn flatten_onto_white(image: &RasterImage) -> RasterImage {
    let pixels = image
        .pixels
        .chunks_exact(RasterImage::CHANNELS)
        .flat_map(|px| {
            let a = px[3] as u32;
            let over = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
            [over(px[0]), over(px[1]), over(px[2]), 255]
        })
        .collect();
    RasterImage::new(image.width, image.height, pixels)
}

/// Encode an image to `target`, applying the background-fill policy.
///
/// # Errors
///
/// `EncodeError::UnsupportedFormat` for targets that cannot be written
/// (GIF, HEIC); the source is reported as PNG since it is already decoded.
pub fn encode_as(
    image: &RasterImage,
    target: ContainerFormat,
    quality: Option<f32>,
) -> Result<Vec<u8>, EncodeError> {
    if !target.is_encodable() {
        return Err(EncodeError::UnsupportedFormat {
            from: ContainerFormat::Png,
            to: target,
        });
    }
    if quality.is_some() && !target.is_lossy() {
        log::debug!("quality ignored for lossless {}", target.mime());
    }

    let source = if !target.supports_alpha() && image.has_transparency() {
        Cow::Owned(flatten_onto_white(image))
    } else {
        Cow::Borrowed(image)
    };

    let bytes = match target {
        ContainerFormat::Png => encode_png(&source)?,
        ContainerFormat::Webp => encode_webp(&source)?,
        ContainerFormat::Jpeg => encode_jpeg(&source, jpeg_quality(normalize_quality(quality)))?,
        ContainerFormat::Gif | ContainerFormat::Heic => {
            return Err(EncodeError::UnsupportedFormat {
                from: ContainerFormat::Png,
                to: target,
            })
        }
    };

    log::debug!(
        "encoded {}x{} as {} ({} bytes)",
        image.width,
        image.height,
        target.mime(),
        bytes.len()
    );
    Ok(bytes)
}

/// Encode an already decoded image according to `request`.
pub fn convert(image: &RasterImage, request: &ConversionRequest) -> Result<Vec<u8>, EncodeError> {
    request.check_supported()?;
    encode_as(image, request.target, request.quality)
}

/// Decode `bytes` and re-encode them according to `request`.
///
/// The format pair is checked before any decoding, so an unsupported
/// conversion fails fast without touching the payload.
pub fn convert_bytes(bytes: &[u8], request: &ConversionRequest) -> Result<Vec<u8>, EncodeError> {
    request.check_supported()?;

    if let Some(actual) = ContainerFormat::detect(bytes) {
        if actual != request.source {
            log::warn!(
                "declared source {} but payload looks like {}",
                request.source.mime(),
                actual.mime()
            );
        }
    }

    let image = decode_image(bytes)?;
    convert(&image, request)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: flattening never leaves transparency and keeps opaque pixels.
        #[test]
        fn prop_flatten_is_opaque(pixels in prop::collection::vec(any::<[u8; 4]>(), 1..64)) {
            let width = pixels.len() as u32;
            let img = RasterImage::new(width, 1, pixels.concat());
            let flat = flatten_onto_white(&img);

            for (src, dst) in img.pixels.chunks_exact(4).zip(flat.pixels.chunks_exact(4)) {
                prop_assert_eq!(dst[3], 255);
                if src[3] == 255 {
                    prop_assert_eq!(&src[..3], &dst[..3]);
                }
                if src[3] == 0 {
                    prop_assert_eq!(&dst[..3], &[255, 255, 255]);
                }
            }
        }

        /// Property: any in-range quality produces a JPEG.
        #[test]
        fn prop_jpeg_any_quality(quality in 0.01f32..=1.0) {
            let img = RasterImage::transparent(4, 4);
            let request = ConversionRequest::new(ContainerFormat::Webp, ContainerFormat::Jpeg)
                .with_quality(quality);
            let jpeg = convert(&img, &request).unwrap();
            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        }
    }
}

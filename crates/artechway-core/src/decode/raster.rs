//! Raster decoding with EXIF orientation handling.
//!
//! Browsers honour EXIF orientation when an `<img>` is drawn into a canvas, so
//! every tool sees photos the right way up. We do the same here.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, Orientation, RasterImage};

/// Decode image bytes (PNG, JPEG, WEBP, GIF), applying EXIF orientation.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the container cannot be identified.
/// Returns `DecodeError::CorruptedFile` if the data is corrupted or truncated.
/// Returns `DecodeError::EmptyImage` for a zero-sized image.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = read_dynamic(bytes)?;
    let oriented = apply_orientation(img, orientation);
    finish(oriented)
}

fn read_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn finish(img: DynamicImage) -> Result<RasterImage, DecodeError> {
    let rgba = img.into_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(DecodeError::EmptyImage);
    }
    let raster = RasterImage::from_rgba_image(rgba);
    log::debug!("decoded {}x{} raster", raster.width, raster.height);
    Ok(raster)
}

/// Returns `Orientation::Normal` when no EXIF block is present.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

//! Resizing to exact dimensions, plus the width/height state behind the
//! resizer's aspect-ratio lock.

use serde::{Deserialize, Serialize};

use super::TransformError;
use crate::decode::{FilterType, RasterImage};

/// Target size for a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeSpec {
    pub width: u32,
    pub height: u32,
    pub keep_aspect_ratio: bool,
}

/// Width and height fields of the resizer, tied to the original image.
///
/// While the lock is on, editing one dimension recomputes the other from the
/// original aspect ratio:
///
/// ```text
/// height = round(width / ratio)
/// width  = round(height * ratio)
/// ```
///
/// Each recomputation starts from the value just entered, so alternating
/// edits can drift by a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeDimensions {
    original_width: u32,
    original_height: u32,
    width: u32,
    height: u32,
    keep_aspect_ratio: bool,
}

impl ResizeDimensions {
    /// Start from the original size with the lock on.
    pub fn new(original_width: u32, original_height: u32) -> Self {
        Self {
            original_width,
            original_height,
            width: original_width,
            height: original_height,
            keep_aspect_ratio: true,
        }
    }

    pub fn for_image(image: &RasterImage) -> Self {
        Self::new(image.width, image.height)
    }

    /// Original width / height, or `None` for a degenerate original.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.original_width == 0 || self.original_height == 0 {
            return None;
        }
        Some(self.original_width as f64 / self.original_height as f64)
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width;
        if !self.keep_aspect_ratio || width == 0 {
            return;
        }
        if let Some(ratio) = self.aspect_ratio() {
            self.height = ((width as f64 / ratio).round() as u32).max(1);
        }
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
        if !self.keep_aspect_ratio || height == 0 {
            return;
        }
        if let Some(ratio) = self.aspect_ratio() {
            self.width = ((height as f64 * ratio).round() as u32).max(1);
        }
    }

    /// Toggling the lock leaves the current values alone.
    pub fn set_keep_aspect_ratio(&mut self, keep: bool) {
        self.keep_aspect_ratio = keep;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn keep_aspect_ratio(&self) -> bool {
        self.keep_aspect_ratio
    }

    pub fn spec(&self) -> ResizeSpec {
        ResizeSpec {
            width: self.width,
            height: self.height,
            keep_aspect_ratio: self.keep_aspect_ratio,
        }
    }
}

/// Resize to exactly `spec.width x spec.height` with bilinear filtering.
///
/// The lock flag in `spec` has already been applied to the dimensions and
/// does not change the output size.
pub fn resize(image: &RasterImage, spec: &ResizeSpec) -> Result<RasterImage, TransformError> {
    resize_with_filter(image, spec.width, spec.height, FilterType::Bilinear)
}

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// `TransformError::InvalidDimensions` if the source or the target has a
/// zero dimension, `TransformError::SurfaceUnavailable` if the source buffer
/// is malformed.
pub fn resize_with_filter(
    image: &RasterImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RasterImage, TransformError> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimensions { width, height });
    }
    if image.is_empty() {
        return Err(TransformError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgba = image
        .to_rgba_image()
        .ok_or(TransformError::SurfaceUnavailable)?;

    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());

    log::debug!(
        "resized {}x{} to {width}x{height} ({filter:?})",
        image.width,
        image.height
    );

    Ok(RasterImage::from_rgba_image(resized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RasterImage {
        RasterImage::new(width, height, rgba.repeat((width * height) as usize))
    }

    #[test]
    fn test_resize_exact_dimensions() {
        let img = solid(100, 50, [10, 20, 30, 255]);
        let spec = ResizeSpec {
            width: 37,
            height: 91,
            keep_aspect_ratio: false,
        };
        let result = resize(&img, &spec).unwrap();
        assert_eq!((result.width, result.height), (37, 91));
        assert_eq!(result.pixels.len(), 37 * 91 * 4);
    }

    #[test]
    fn test_resize_preserves_alpha() {
        let img = solid(20, 20, [200, 100, 50, 128]);
        let result = resize_with_filter(&img, 10, 10, FilterType::Bilinear).unwrap();
        let px = result.pixel(5, 5);
        assert_eq!(px[3], 128);
        for (got, want) in px.iter().zip([200u8, 100, 50]) {
            assert!(got.abs_diff(want) <= 1, "{px:?}");
        }
    }

    #[test]
    fn test_resize_same_size_is_clone() {
        let img = solid(8, 8, [1, 2, 3, 4]);
        let result = resize_with_filter(&img, 8, 8, FilterType::Lanczos3).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_resize_zero_dimension() {
        let img = solid(8, 8, [0, 0, 0, 255]);
        assert_eq!(
            resize_with_filter(&img, 0, 8, FilterType::Bilinear),
            Err(TransformError::InvalidDimensions { width: 0, height: 8 })
        );
    }

    #[test]
    fn test_resize_empty_source() {
        let img = RasterImage::new(0, 0, vec![]);
        assert!(resize_with_filter(&img, 4, 4, FilterType::Nearest).is_err());
    }

    #[test]
    fn test_dimensions_start_at_original() {
        let dims = ResizeDimensions::new(1920, 1080);
        assert_eq!((dims.width(), dims.height()), (1920, 1080));
        assert!(dims.keep_aspect_ratio());
    }

    #[test]
    fn test_locked_width_updates_height() {
        let mut dims = ResizeDimensions::new(1920, 1080);
        dims.set_width(1001);
        // 1001 * 1080 / 1920 = 563.06
        assert_eq!(dims.height(), 563);

        dims.set_height(563);
        // 563 * 1920 / 1080 = 1000.9
        assert_eq!(dims.width(), 1001);

        dims.set_height(1080);
        assert_eq!(dims.width(), 1920);
    }

    #[test]
    fn test_unlocked_fields_are_independent() {
        let mut dims = ResizeDimensions::new(1920, 1080);
        dims.set_keep_aspect_ratio(false);
        dims.set_width(500);
        assert_eq!((dims.width(), dims.height()), (500, 1080));

        let spec = dims.spec();
        assert_eq!(
            spec,
            ResizeSpec {
                width: 500,
                height: 1080,
                keep_aspect_ratio: false
            }
        );
    }

    #[test]
    fn test_locked_zero_input_keeps_other_field() {
        let mut dims = ResizeDimensions::new(400, 300);
        dims.set_width(0);
        assert_eq!((dims.width(), dims.height()), (0, 300));
    }

    #[test]
    fn test_locked_tiny_width_never_yields_zero_height() {
        let mut dims = ResizeDimensions::new(4000, 10);
        dims.set_width(1);
        assert_eq!(dims.height(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: output always has exactly the requested size.
        #[test]
        fn prop_resize_exact_size(
            (src_w, src_h) in (1u32..40, 1u32..40),
            (dst_w, dst_h) in (1u32..80, 1u32..80),
        ) {
            let img = RasterImage::transparent(src_w, src_h);
            let result = resize_with_filter(&img, dst_w, dst_h, FilterType::Bilinear).unwrap();
            prop_assert_eq!((result.width, result.height), (dst_w, dst_h));
            prop_assert_eq!(result.pixels.len(), (dst_w * dst_h * 4) as usize);
        }

        /// Property: with the lock on, the derived height matches the rule.
        #[test]
        fn prop_locked_height_follows_ratio(
            (orig_w, orig_h) in (1u32..5000, 1u32..5000),
            width in 1u32..5000,
        ) {
            let mut dims = ResizeDimensions::new(orig_w, orig_h);
            dims.set_width(width);

            let ratio = orig_w as f64 / orig_h as f64;
            let expected = ((width as f64 / ratio).round() as u32).max(1);
            prop_assert_eq!(dims.height(), expected);
        }
    }
}

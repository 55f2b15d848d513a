//! Cropping with optional rotation.
//!
//! The crop rectangle is expressed in pixels of the *rotated* canvas: the
//! source is first rotated about its center onto its rotated bounding box
//! (see [`rotate`]), then the rectangle is cut out of that buffer. With no
//! rotation the bounding box is the image itself and this is a plain
//! sub-rectangle copy.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left corner of the rotated canvas
//! - `x + width <= bounds_width`, `y + height <= bounds_height`

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::rotation::{compute_rotated_bounds, rotate};
use super::TransformError;
use crate::decode::RasterImage;

/// Aspect ratio the cropper locks its selection to.
pub const DEFAULT_CROP_ASPECT: f64 = 4.0 / 3.0;

/// A rectangle on the rotated canvas plus the rotation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Rotation applied before cropping, clockwise on screen.
    #[serde(default)]
    pub rotation_degrees: f64,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation_degrees: 0.0,
        }
    }

    pub fn with_rotation(mut self, rotation_degrees: f64) -> Self {
        self.rotation_degrees = rotation_degrees;
        self
    }

    /// The whole image, unrotated.
    pub fn full(image: &RasterImage) -> Self {
        Self::new(0, 0, image.width, image.height)
    }

    /// Convert a normalized rectangle (0.0 to 1.0 of the canvas) to pixels.
    ///
    /// Out-of-range values are clamped and the result is at least 1x1, so a
    /// selection dragged slightly past the border still maps inside.
    pub fn from_normalized(
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        (bounds_w, bounds_h): (u32, u32),
    ) -> Self {
        let fw = bounds_w as f64;
        let fh = bounds_h as f64;

        let px_left = (left.clamp(0.0, 1.0) * fw).round() as u32;
        let px_top = (top.clamp(0.0, 1.0) * fh).round() as u32;
        let px_width = (width.clamp(0.0, 1.0) * fw).round() as u32;
        let px_height = (height.clamp(0.0, 1.0) * fh).round() as u32;

        let px_left = px_left.min(bounds_w.saturating_sub(1));
        let px_top = px_top.min(bounds_h.saturating_sub(1));
        let px_right = (px_left + px_width).min(bounds_w);
        let px_bottom = (px_top + px_height).min(bounds_h);

        Self::new(
            px_left,
            px_top,
            px_right.saturating_sub(px_left).max(1),
            px_bottom.saturating_sub(px_top).max(1),
        )
    }

    /// Largest centered rectangle of the given aspect (width / height) that
    /// fits the canvas. This is the cropper's initial selection.
    pub fn centered(bounds_w: u32, bounds_h: u32, aspect: f64) -> Self {
        if bounds_w == 0 || bounds_h == 0 || !aspect.is_finite() || aspect <= 0.0 {
            return Self::new(0, 0, bounds_w, bounds_h);
        }

        let fit_w = (bounds_h as f64 * aspect).round() as u32;
        let (width, height) = if fit_w <= bounds_w {
            (fit_w.max(1), bounds_h)
        } else {
            let fit_h = (bounds_w as f64 / aspect).round() as u32;
            (bounds_w, fit_h.clamp(1, bounds_h))
        };

        Self::new(
            (bounds_w - width) / 2,
            (bounds_h - height) / 2,
            width,
            height,
        )
    }

    /// Size of the rotated canvas this region refers to.
    pub fn canvas_size(&self, image: &RasterImage) -> (u32, u32) {
        compute_rotated_bounds(image.width, image.height, self.rotation_degrees)
    }

    /// Check that the region is non-empty and inside `bounds`.
    pub fn check_within(&self, (bounds_w, bounds_h): (u32, u32)) -> Result<(), TransformError> {
        let right = self.x as u64 + self.width as u64;
        let bottom = self.y as u64 + self.height as u64;

        if self.width == 0
            || self.height == 0
            || right > bounds_w as u64
            || bottom > bounds_h as u64
        {
            return Err(TransformError::InvalidRegion {
                region: *self,
                bounds_width: bounds_w,
                bounds_height: bounds_h,
            });
        }
        Ok(())
    }
}

/// Crop an image, rotating it first when the region carries a rotation.
///
/// # Errors
///
/// `TransformError::InvalidRegion` if the region is empty or reaches outside
/// the rotated canvas. Nothing is rotated in that case.
pub fn crop(image: &RasterImage, region: &CropRegion) -> Result<RasterImage, TransformError> {
    if image.is_empty() {
        return Err(TransformError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    region.check_within(region.canvas_size(image))?;

    let canvas: Cow<'_, RasterImage> = if region.rotation_degrees == 0.0 {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(rotate(image, region.rotation_degrees)?)
    };

    // Fast path: full-canvas crop
    if region.x == 0
        && region.y == 0
        && region.width == canvas.width
        && region.height == canvas.height
    {
        return Ok(canvas.into_owned());
    }

    let row_bytes = region.width as usize * RasterImage::CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * region.height as usize);

    // Copy pixel data row by row
    for y in region.y..region.y + region.height {
        let start = (y as usize * canvas.width as usize + region.x as usize) * RasterImage::CHANNELS;
        output.extend_from_slice(&canvas.pixels[start..start + row_bytes]);
    }

    Ok(RasterImage::new(region.width, region.height, output))
}


// ============================================================================
// Property-Based Tests
// ============================================================================

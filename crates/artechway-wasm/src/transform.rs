//! WASM bindings for rotation, cropping and resizing.
//!
//! The cropper works on the rotated canvas: `rotated_bounds` gives its size,
//! `initial_crop_area` the starting selection, and `crop_image` cuts the
//! selection out after rotating.

use artechway_core::transform::{
    compute_rotated_bounds, crop, resize_with_filter, rotate, CropRegion, ResizeDimensions,
    DEFAULT_CROP_ASPECT,
};
use wasm_bindgen::prelude::*;

use crate::logging::js_error;
use crate::types::{filter_from_u8, JsRasterImage};

/// Size `[width, height]` of the canvas after rotating by `angle_degrees`
/// (positive = clockwise).
#[wasm_bindgen]
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> Vec<u32> {
    let (w, h) = compute_rotated_bounds(width, height, angle_degrees);
    vec![w, h]
}

/// Centered starting selection `[x, y, width, height]` on the rotated
/// canvas. `aspect` (width / height) defaults to 4:3.
#[wasm_bindgen]
pub fn initial_crop_area(
    width: u32,
    height: u32,
    angle_degrees: f64,
    aspect: Option<f64>,
) -> Vec<u32> {
    let (w, h) = compute_rotated_bounds(width, height, angle_degrees);
    let region = CropRegion::centered(w, h, aspect.unwrap_or(DEFAULT_CROP_ASPECT));
    vec![region.x, region.y, region.width, region.height]
}

/// Rotate about the center onto an expanded, transparent canvas.
#[wasm_bindgen]
pub fn rotate_image(image: &JsRasterImage, angle_degrees: f64) -> Result<JsRasterImage, JsValue> {
    rotate(&image.to_raster(), angle_degrees)
        .map(JsRasterImage::from_raster)
        .map_err(|e| js_error("rotate", e))
}

/// Rotate, then cut out a pixel rectangle of the rotated canvas.
///
/// ```typescript
/// const [cw, ch] = rotated_bounds(image.width, image.height, 15);
/// const cropped = crop_image(image, 10, 10, cw - 20, ch - 20, 15);
/// ```
#[wasm_bindgen]
pub fn crop_image(
    image: &JsRasterImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    rotation_degrees: f64,
) -> Result<JsRasterImage, JsValue> {
    let region = CropRegion::new(x, y, width, height).with_rotation(rotation_degrees);
    crop(&image.to_raster(), &region)
        .map(JsRasterImage::from_raster)
        .map_err(|e| js_error("crop", e))
}

/// Same as [`crop_image`] with the selection given as fractions (0.0 to 1.0)
/// of the rotated canvas.
#[wasm_bindgen]
pub fn crop_image_normalized(
    image: &JsRasterImage,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    rotation_degrees: f64,
) -> Result<JsRasterImage, JsValue> {
    let raster = image.to_raster();
    let canvas = compute_rotated_bounds(raster.width, raster.height, rotation_degrees);
    let region =
        CropRegion::from_normalized(left, top, width, height, canvas).with_rotation(rotation_degrees);
    crop(&raster, &region)
        .map(JsRasterImage::from_raster)
        .map_err(|e| js_error("crop", e))
}

/// Resize to exact dimensions.
///
/// `filter`: 0 = Nearest, 1 = Bilinear (default), 2 = Lanczos3.
#[wasm_bindgen]
pub fn resize_image(
    image: &JsRasterImage,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsRasterImage, JsValue> {
    resize_with_filter(&image.to_raster(), width, height, filter_from_u8(filter))
        .map(JsRasterImage::from_raster)
        .map_err(|e| js_error("resize", e))
}

/// Width/height inputs of the resizer with the aspect-ratio lock.
#[wasm_bindgen]
pub struct JsResizeDimensions {
    inner: ResizeDimensions,
}

#[wasm_bindgen]
impl JsResizeDimensions {
    #[wasm_bindgen(constructor)]
    pub fn new(original_width: u32, original_height: u32) -> JsResizeDimensions {
        Self {
            inner: ResizeDimensions::new(original_width, original_height),
        }
    }

    pub fn for_image(image: &JsRasterImage) -> JsResizeDimensions {
        Self::new(image.width(), image.height())
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(setter)]
    pub fn set_width(&mut self, width: u32) {
        self.inner.set_width(width);
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    #[wasm_bindgen(setter)]
    pub fn set_height(&mut self, height: u32) {
        self.inner.set_height(height);
    }

    #[wasm_bindgen(getter)]
    pub fn keep_aspect_ratio(&self) -> bool {
        self.inner.keep_aspect_ratio()
    }

    #[wasm_bindgen(setter)]
    pub fn set_keep_aspect_ratio(&mut self, keep: bool) {
        self.inner.set_keep_aspect_ratio(keep);
    }

    /// Resize `image` to the current dimensions with bilinear filtering.
    pub fn apply(&self, image: &JsRasterImage) -> Result<JsRasterImage, JsValue> {
        artechway_core::transform::resize(&image.to_raster(), &self.inner.spec())
            .map(JsRasterImage::from_raster)
            .map_err(|e| js_error("resize", e))
    }
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use artechway_core::decode::RasterImage;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn gray(width: u32, height: u32) -> JsRasterImage {
        JsRasterImage::from_raster(RasterImage::new(
            width,
            height,
            vec![128u8; (width * height * 4) as usize],
        ))
    }

    #[wasm_bindgen_test]
    fn test_crop_out_of_bounds_errors() {
        assert!(crop_image(&gray(10, 10), 5, 5, 10, 10, 0.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_crop_empty_region_errors() {
        assert!(crop_image(&gray(10, 10), 0, 0, 0, 0, 0.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_resize_zero_width_errors() {
        assert!(resize_image(&gray(10, 10), 0, 5, 1).is_err());
    }

    #[wasm_bindgen_test]
    fn test_rotate_nan_errors() {
        assert!(rotate_image(&gray(4, 4), f64::NAN).is_err());
    }
}

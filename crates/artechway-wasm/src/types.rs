//! WASM-compatible wrapper types for image data and colors.
//!
//! This module provides JavaScript-friendly types that wrap the core Artechway
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use artechway_core::decode::{FilterType, RasterImage};
use artechway_core::sample::ColorSample;
use wasm_bindgen::prelude::*;

use crate::logging::js_error;

/// A decoded RGBA image for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is
/// made to JavaScript memory as a `Uint8Array`, which can be wrapped in an
/// `ImageData` for drawing onto a canvas.
#[wasm_bindgen]
pub struct JsRasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Create an image from dimensions and RGBA pixel data
    /// (4 bytes per pixel, row-major order, e.g. `ImageData.data`).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRasterImage, JsValue> {
        RasterImage::try_new(width, height, pixels)
            .map(Self::from_raster)
            .map_err(|e| js_error("image", e))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsRasterImage {
    pub(crate) fn from_raster(img: RasterImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Clones the pixel data.
    pub(crate) fn to_raster(&self) -> RasterImage {
        RasterImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// One sampled color.
#[wasm_bindgen]
pub struct JsColorSample {
    inner: ColorSample,
}

#[wasm_bindgen]
impl JsColorSample {
    #[wasm_bindgen(getter)]
    pub fn r(&self) -> u8 {
        self.inner.r
    }

    #[wasm_bindgen(getter)]
    pub fn g(&self) -> u8 {
        self.inner.g
    }

    #[wasm_bindgen(getter)]
    pub fn b(&self) -> u8 {
        self.inner.b
    }

    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        self.inner.a
    }

    /// `#rrggbb`, ready for the clipboard.
    #[wasm_bindgen(getter)]
    pub fn hex(&self) -> String {
        self.inner.hex.clone()
    }

    /// `rgb(r, g, b)`
    #[wasm_bindgen(getter)]
    pub fn rgb(&self) -> String {
        self.inner.rgb.clone()
    }
}

impl JsColorSample {
    pub(crate) fn from_sample(inner: ColorSample) -> Self {
        Self { inner }
    }

    pub(crate) fn sample(&self) -> &ColorSample {
        &self.inner
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_raster_image_creation() {
        let img = JsRasterImage::new(100, 50, vec![0u8; 100 * 50 * 4]).unwrap();
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_js_raster_image_round_trip() {
        let raster = RasterImage::new(2, 1, vec![255, 128, 64, 255, 32, 16, 8, 0]);
        let img = JsRasterImage::from_raster(raster.clone());
        assert_eq!(img.pixels(), raster.pixels);
        assert_eq!(img.to_raster(), raster);
    }

    #[test]
    fn test_js_color_sample_getters() {
        let c = JsColorSample::from_sample(ColorSample::from_rgba([1, 2, 254, 9]));
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 254, 9));
        assert_eq!(c.hex(), "#0102fe");
        assert_eq!(c.rgb(), "rgb(1, 2, 254)");
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(filter_from_u8(0), FilterType::Nearest);
        assert_eq!(filter_from_u8(1), FilterType::Bilinear);
        assert_eq!(filter_from_u8(2), FilterType::Lanczos3);
        assert_eq!(filter_from_u8(255), FilterType::Bilinear);
    }
}

//! Color sampling and pinned-color WASM bindings for the image color picker.

use artechway_core::sample::{self, DisplaySize, PickedColors, MAX_PICKED_COLORS};
use wasm_bindgen::prelude::*;

use crate::logging::js_error;
use crate::types::{JsColorSample, JsRasterImage};

/// Color of the source pixel at `(x, y)`, clamped into the image.
#[wasm_bindgen]
pub fn sample_color(image: &JsRasterImage, x: i32, y: i32) -> Result<JsColorSample, JsValue> {
    sample::sample(&image.to_raster(), x as i64, y as i64)
        .map(JsColorSample::from_sample)
        .map_err(|e| js_error("sample", e))
}

/// Color under a pointer at `(x, y)` on an element showing the image at
/// `display_width x display_height` CSS pixels.
///
/// ```typescript
/// const rect = img.getBoundingClientRect();
/// const color = sample_color_at_display(image, rect.width, rect.height,
///   e.clientX - rect.left, e.clientY - rect.top);
/// ```
#[wasm_bindgen]
pub fn sample_color_at_display(
    image: &JsRasterImage,
    display_width: f64,
    display_height: f64,
    x: f64,
    y: f64,
) -> Result<JsColorSample, JsValue> {
    let display = DisplaySize::new(display_width, display_height);
    sample::sample_display(&image.to_raster(), display, x, y)
        .map(JsColorSample::from_sample)
        .map_err(|e| js_error("sample", e))
}

/// Colors pinned by clicking on the image.
#[wasm_bindgen]
pub struct JsPickedColors {
    inner: PickedColors,
}

impl Default for JsPickedColors {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsPickedColors {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsPickedColors {
        Self {
            inner: PickedColors::new(),
        }
    }

    /// Maximum number of colors that can be pinned.
    pub fn capacity() -> usize {
        MAX_PICKED_COLORS
    }

    /// Pin a color. Returns `false` if it is already pinned; throws when the
    /// palette is full.
    pub fn push(&mut self, color: &JsColorSample) -> Result<bool, JsValue> {
        self.inner
            .push(color.sample().clone())
            .map_err(|e| js_error("palette", e))
    }

    pub fn remove(&mut self, hex: &str) -> bool {
        self.inner.remove(hex)
    }

    pub fn contains(&self, hex: &str) -> bool {
        self.inner.contains(hex)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(getter)]
    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    /// Pinned colors as `#rrggbb` strings, oldest first.
    pub fn hexes(&self) -> Vec<String> {
        self.inner.as_slice().iter().map(|c| c.hex.clone()).collect()
    }

    /// Pinned colors as plain objects `{ r, g, b, a, hex, rgb }`.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.as_slice()).map_err(|e| js_error("palette", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artechway_core::decode::RasterImage;

    fn two_tone() -> JsRasterImage {
        // Left half red, right half green.
        let mut pixels = Vec::new();
        for _ in 0..2 {
            pixels.extend_from_slice(&[255, 0, 0, 255, 255, 0, 0, 255]);
            pixels.extend_from_slice(&[0, 255, 0, 255, 0, 255, 0, 255]);
        }
        JsRasterImage::from_raster(RasterImage::new(4, 2, pixels))
    }

    #[test]
    fn test_sample_color() {
        let img = two_tone();
        assert_eq!(sample_color(&img, 0, 0).unwrap().hex(), "#ff0000");
        assert_eq!(sample_color(&img, 3, 1).unwrap().hex(), "#00ff00");
        // Clamped
        assert_eq!(sample_color(&img, 99, -4).unwrap().hex(), "#00ff00");
    }

    #[test]
    fn test_sample_color_at_display() {
        let img = two_tone();
        // Displayed at 400x200: x = 250 maps to source column 2.
        let c = sample_color_at_display(&img, 400.0, 200.0, 250.0, 10.0).unwrap();
        assert_eq!(c.rgb(), "rgb(0, 255, 0)");
    }

    #[test]
    fn test_picked_colors() {
        let img = two_tone();
        let mut picked = JsPickedColors::new();
        let red = sample_color(&img, 0, 0).unwrap();

        assert!(picked.push(&red).unwrap());
        assert!(!picked.push(&red).unwrap());
        assert_eq!(picked.length(), 1);
        assert_eq!(picked.hexes(), vec!["#ff0000"]);

        assert!(picked.remove("#ff0000"));
        assert_eq!(picked.length(), 0);
        assert_eq!(JsPickedColors::capacity(), 12);
    }
}

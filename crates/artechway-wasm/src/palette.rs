//! Dominant-color palette WASM bindings.

use artechway_core::palette::{self, DEFAULT_PALETTE_SIZE, DEFAULT_SAMPLE_QUALITY};
use wasm_bindgen::prelude::*;

use crate::logging::js_error;
use crate::types::JsRasterImage;

/// Extract up to `max_colors` dominant colors (default 8), sampling every
/// `quality`-th pixel (default 10).
///
/// Returns an array of `{ r, g, b, a, hex, rgb }` ordered by prominence.
///
/// ```typescript
/// const palette = extract_palette(image);
/// swatches.forEach((el, i) => el.style.background = palette[i].hex);
/// ```
#[wasm_bindgen]
pub fn extract_palette(
    image: &JsRasterImage,
    max_colors: Option<usize>,
    quality: Option<u32>,
) -> Result<JsValue, JsValue> {
    let colors = palette::extract_palette(
        &image.to_raster(),
        max_colors.unwrap_or(DEFAULT_PALETTE_SIZE),
        quality.unwrap_or(DEFAULT_SAMPLE_QUALITY),
    )
    .map_err(|e| js_error("palette", e))?;

    serde_wasm_bindgen::to_value(&colors).map_err(|e| js_error("palette", e))
}

/// Same as [`extract_palette`], returning only the `#rrggbb` strings.
#[wasm_bindgen]
pub fn extract_palette_hex(
    image: &JsRasterImage,
    max_colors: Option<usize>,
    quality: Option<u32>,
) -> Result<Vec<String>, JsValue> {
    palette::extract_palette(
        &image.to_raster(),
        max_colors.unwrap_or(DEFAULT_PALETTE_SIZE),
        quality.unwrap_or(DEFAULT_SAMPLE_QUALITY),
    )
    .map(|colors| colors.into_iter().map(|c| c.hex).collect())
    .map_err(|e| js_error("palette", e))
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use artechway_core::decode::RasterImage;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_extract_palette_returns_array() {
        let img = JsRasterImage::from_raster(RasterImage::new(2, 2, [9, 9, 9, 255].repeat(4)));
        let value = extract_palette(&img, None, None).unwrap();
        assert!(js_sys::Array::is_array(&value));
    }

    #[wasm_bindgen_test]
    fn test_fully_transparent_errors() {
        let img = JsRasterImage::from_raster(RasterImage::transparent(4, 4));
        assert!(extract_palette(&img, None, None).is_err());
    }
}

//! Artechway WASM - WebAssembly bindings for the Artechway image tools
//!
//! This crate provides WASM bindings to expose the artechway-core functionality
//! to the tool pages.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for images and colors
//! - `decode` - Decoding and per-page upload sessions
//! - `sample` - Color picker sampling and pinned colors
//! - `palette` - Dominant-color palette extraction
//! - `transform` - Rotation, cropping and resizing
//! - `encode` - Encoding and format conversion
//! - `wheel` - Random picker wheel
//! - `logging` - `log` records forwarded to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, extract_palette } from '@artechway/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const palette = extract_palette(image);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod logging;
mod palette;
mod sample;
mod transform;
mod types;
mod wheel;

// Re-export public types
pub use decode::{decode_image, detect_format, JsExportedFile, JsLoadTicket, JsToolSession};
pub use encode::{
    conversion_file_name, convert_image, encode_image, route_target_mime, route_title,
};
pub use logging::set_log_level;
pub use palette::{extract_palette, extract_palette_hex};
pub use sample::{sample_color, sample_color_at_display, JsPickedColors};
pub use transform::{
    crop_image, crop_image_normalized, initial_crop_area, resize_image, rotate_image,
    rotated_bounds, JsResizeDimensions,
};
pub use types::{JsColorSample, JsRasterImage};
pub use wheel::{parse_wheel_options, JsPickerWheel};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::init_logger(logging::default_level());
    log::info!("artechway-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Fixed tool settings (palette size, default quality, wheel timing, ...).
#[wasm_bindgen]
pub fn tool_config() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&artechway_core::ToolConfig::default())
        .map_err(|e| logging::js_error("config", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

//! Artechway Core - Image processing library
//!
//! This crate provides the image processing behind the Artechway tool pages:
//! decoding uploads, sampling pixel colors, extracting dominant-color
//! palettes, rotating/cropping/resizing, re-encoding between formats, and the
//! random picker wheel.
//!
//! Every engine is a pure function over an owned [`RasterImage`]. Mutable UI
//! state lives in small per-page structs ([`ToolSession`], [`PickedColors`],
//! [`ResizeDimensions`], [`PickerWheel`]).

pub mod decode;
pub mod encode;
pub mod format;
pub mod palette;
pub mod sample;
pub mod session;
pub mod transform;
pub mod wheel;

pub use decode::{decode_image, DecodeError, RasterImage};
pub use encode::{convert, convert_bytes, ConversionRequest, EncodeError, DEFAULT_QUALITY};
pub use format::{ContainerFormat, ConversionRoute, FormatCode, FormatError, Tool};
pub use palette::{extract_palette, DEFAULT_PALETTE_SIZE, DEFAULT_SAMPLE_QUALITY};
pub use sample::{sample, ColorSample, PickError, PickedColors, MAX_PICKED_COLORS};
pub use session::{ExportedFile, SessionError, ToolSession};
pub use transform::{
    compute_rotated_bounds, crop, resize, CropRegion, ResizeDimensions, ResizeSpec,
    TransformError, DEFAULT_CROP_ASPECT,
};
pub use wheel::{PickerWheel, SpinOutcome, WheelError, SPIN_DURATION_MS, SPIN_TURNS};

/// Fixed settings shared by the tool pages.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    /// Colors returned by the palette tool
    pub palette_size: usize,
    /// Every Nth pixel is sampled for the palette
    pub palette_sample_quality: u32,
    /// Colors the picker can pin
    pub max_picked_colors: usize,
    /// Encoder quality when none is chosen (0.0 to 1.0)
    pub default_quality: f32,
    /// Width / height of the cropper's initial selection
    pub crop_aspect: f64,
    /// Extra full turns per wheel spin
    pub spin_turns: u32,
    /// Wheel animation length in milliseconds
    pub spin_duration_ms: f64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            palette_size: DEFAULT_PALETTE_SIZE,
            palette_sample_quality: DEFAULT_SAMPLE_QUALITY,
            max_picked_colors: MAX_PICKED_COLORS,
            default_quality: DEFAULT_QUALITY,
            crop_aspect: DEFAULT_CROP_ASPECT,
            spin_turns: SPIN_TURNS,
            spin_duration_ms: SPIN_DURATION_MS,
        }
    }
}

impl ToolConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_config_defaults() {
        let config = ToolConfig::new();
        assert_eq!(config.palette_size, 8);
        assert_eq!(config.max_picked_colors, 12);
        assert_eq!(config.default_quality, 0.95);
        assert_eq!(config.spin_turns, 5);
        assert_eq!(config.spin_duration_ms, 5000.0);
    }

    #[test]
    fn test_upload_to_palette() {
        let pixels = [[255, 0, 0, 255], [0, 0, 255, 255]].concat().repeat(8);
        let png = encode::encode_png(&RasterImage::new(4, 4, pixels)).unwrap();

        let mut session = ToolSession::new(Tool::ColorPalette);
        session.load("flag.png", "image/png", &png).unwrap();

        let palette = extract_palette(session.image().unwrap(), DEFAULT_PALETTE_SIZE, 1).unwrap();
        let hexes: Vec<_> = palette.iter().map(|c| c.hex.as_str()).collect();
        assert_eq!(hexes, vec!["#0000ff", "#ff0000"]);
    }
}

//! Pixel sampling for the color picker.
//!
//! The picker shows the image scaled to fit the page, so pointer positions
//! arrive in display coordinates. They are mapped back to source pixels by the
//! ratio of native to displayed size, truncated, then clamped into the image.
//! Rounding at the right and bottom edges can push a point one pixel past the
//! border; clamping absorbs that instead of failing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{DecodeError, RasterImage};

/// Maximum number of colors a user can pin in the picker.
pub const MAX_PICKED_COLORS: usize = 12;

/// One pixel's color with its display encodings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
    /// `#rrggbb`, lowercase, alpha ignored.
    pub hex: String,
    /// `rgb(r, g, b)`.
    pub rgb: String,
}

impl ColorSample {
    pub fn from_rgba([r, g, b, a]: [u8; 4]) -> Self {
        Self {
            r,
            g,
            b,
            a,
            hex: to_hex(r, g, b),
            rgb: format!("rgb({r}, {g}, {b})"),
        }
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba([r, g, b, u8::MAX])
    }
}

/// Format an RGB triplet as `#rrggbb`.
pub fn to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Size at which the image is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Native-to-display ratio per axis. A degenerate display size maps 1:1.
    pub fn scale_for(&self, image: &RasterImage) -> (f64, f64) {
        let axis = |native: u32, shown: f64| {
            if shown.is_finite() && shown > 0.0 {
                native as f64 / shown
            } else {
                1.0
            }
        };
        (axis(image.width, self.width), axis(image.height, self.height))
    }
}

/// Sample the pixel at source coordinates `(x, y)`, clamped into the image.
///
/// # Errors
///
/// Returns `DecodeError::EmptyImage` if the image has no pixels.
pub fn sample(image: &RasterImage, x: i64, y: i64) -> Result<ColorSample, DecodeError> {
    if image.is_empty() {
        return Err(DecodeError::EmptyImage);
    }

    let px = x.clamp(0, image.width as i64 - 1) as u32;
    let py = y.clamp(0, image.height as i64 - 1) as u32;

    Ok(ColorSample::from_rgba(image.pixel(px, py)))
}

/// Sample the pixel under a pointer at display coordinates `(x, y)`.
pub fn sample_display(
    image: &RasterImage,
    display: DisplaySize,
    x: f64,
    y: f64,
) -> Result<ColorSample, DecodeError> {
    let (scale_x, scale_y) = display.scale_for(image);
    sample(image, to_source(x, scale_x), to_source(y, scale_y))
}

/// Non-finite input lands on the origin.
fn to_source(coord: f64, scale: f64) -> i64 {
    let v = (coord * scale).floor();
    if v.is_finite() {
        v as i64
    } else {
        0
    }
}

/// Errors from the pinned-colors palette.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickError {
    #[error("Palette full: you can save up to {0} colors")]
    PaletteFull(usize),
}

/// Colors the user has pinned while hovering over an image.
///
/// Holds at most [`MAX_PICKED_COLORS`] entries, no two with the same hex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PickedColors {
    colors: Vec<ColorSample>,
}

impl PickedColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin a color.
    ///
    /// Returns `Ok(true)` if it was added and `Ok(false)` if an entry with the
    /// same hex is already pinned.
    ///
    /// # Errors
    ///
    /// `PickError::PaletteFull` once the palette holds the maximum.
    pub fn push(&mut self, color: ColorSample) -> Result<bool, PickError> {
        if self.is_full() {
            return Err(PickError::PaletteFull(MAX_PICKED_COLORS));
        }
        if self.contains(&color.hex) {
            return Ok(false);
        }
        self.colors.push(color);
        Ok(true)
    }

    /// Unpin by hex. Returns whether anything was removed.
    pub fn remove(&mut self, hex: &str) -> bool {
        let before = self.colors.len();
        self.colors.retain(|c| c.hex != hex);
        self.colors.len() != before
    }

    pub fn contains(&self, hex: &str) -> bool {
        self.colors.iter().any(|c| c.hex == hex)
    }

    pub fn clear(&mut self) {
        self.colors.clear();
    }

    pub fn is_full(&self) -> bool {
        self.colors.len() >= MAX_PICKED_COLORS
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn as_slice(&self) -> &[ColorSample] {
        &self.colors
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: hex always matches the sampled RGB triplet.
        #[test]
        fn prop_hex_matches_rgb(
            rgba in any::<[u8; 4]>(),
            x in -10i64..20,
            y in -10i64..20,
        ) {
            let img = RasterImage::new(3, 3, rgba.repeat(9));
            let c = sample(&img, x, y).unwrap();

            let expected = format!("#{:02x}{:02x}{:02x}", rgba[0], rgba[1], rgba[2]);
            prop_assert_eq!(&c.hex, &expected);
            prop_assert_eq!(c.hex.len(), 7);
        }

        /// Property: any pointer inside the displayed element maps into the image.
        #[test]
        fn prop_display_points_stay_in_bounds(
            (w, h) in (1u32..40, 1u32..40),
            (dw, dh) in (1.0f64..500.0, 1.0f64..500.0),
            (fx, fy) in (0.0f64..=1.0, 0.0f64..=1.0),
        ) {
            let img = RasterImage::transparent(w, h);
            let result = sample_display(&img, DisplaySize::new(dw, dh), fx * dw, fy * dh);
            prop_assert!(result.is_ok());
        }
    }
}

//! Geometric operations: rotation, cropping and resizing.
//!
//! All operations take a [`RasterImage`](crate::decode::RasterImage) by
//! reference and return a new one; the source is never modified.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop regions are in pixels of the rotated canvas
//! - Origin is top-left corner

mod crop;
mod resize;
mod rotation;

use thiserror::Error;

pub use crop::{crop, CropRegion, DEFAULT_CROP_ASPECT};
pub use resize::{resize, resize_with_filter, ResizeDimensions, ResizeSpec};
pub use rotation::{compute_rotated_bounds, rotate};

/// Errors that can occur during geometric transforms.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    /// Crop rectangle is empty or reaches past the canvas.
    #[error(
        "Invalid crop region {}x{} at ({}, {}) for a {bounds_width}x{bounds_height} canvas",
        .region.width, .region.height, .region.x, .region.y
    )]
    InvalidRegion {
        region: CropRegion,
        bounds_width: u32,
        bounds_height: u32,
    },

    /// Source or target has a zero dimension.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Rotation angle is NaN or infinite.
    #[error("Invalid rotation angle: {0}")]
    InvalidAngle(f64),

    /// The pixel buffer could not be turned into a drawing surface.
    #[error("Could not create an image surface from the pixel buffer")]
    SurfaceUnavailable,
}

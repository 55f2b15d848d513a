//! Image encoding and format conversion.
//!
//! This module provides:
//! - Raw PNG, JPEG and lossless WebP encoders over [`RasterImage`](crate::decode::RasterImage)
//! - The conversion policy (background fill, quality defaults, supported pairs)
//!
//! All operations are synchronous and single-threaded within WASM.

mod codec;
mod convert;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::format::ContainerFormat;

pub use codec::{encode_jpeg, encode_png, encode_webp};
pub use convert::{
    convert, convert_bytes, encode_as, flatten_onto_white, jpeg_quality, ConversionRequest,
    DEFAULT_QUALITY,
};

/// Errors that can occur during encoding or conversion.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The source cannot be decoded or the target cannot be written.
    #[error("Unsupported conversion: {} to {}", .from.mime(), .to.mime())]
    UnsupportedFormat {
        from: ContainerFormat,
        to: ContainerFormat,
    },

    /// Encoder failure
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Source bytes could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

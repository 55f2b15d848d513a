//! Image decoding for the Artechway tools.
//!
//! Every tool starts from the same step: the uploaded file's bytes are decoded
//! into an RGBA [`RasterImage`]. Engines never see encoded data.
//!
//! # Architecture
//!
//! Decoding runs inside the WASM module on the page's thread. The file read
//! itself is asynchronous on the JS side; see [`crate::session`] for how a
//! newer upload supersedes an older one.

mod raster;
mod types;

pub use raster::decode_image;
pub use types::{DecodeError, FilterType, Orientation, RasterImage};

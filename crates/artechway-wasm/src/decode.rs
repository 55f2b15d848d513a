//! Image decoding and upload-session WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode PNG/JPEG/WEBP/GIF bytes to RGBA
//! - [`detect_format`] - Sniff the container MIME type from leading bytes
//! - [`JsToolSession`] - Per-page upload state with last-write-wins loading
//!
//! # Example
//!
//! ```typescript
//! const session = new JsToolSession('image-cropper');
//! const ticket = session.begin_load(file.name, file.type);
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (session.finish_load(ticket, bytes)) {
//!   const image = session.image();
//! }
//! ```

use artechway_core::decode;
use artechway_core::format::{ContainerFormat, Tool};
use artechway_core::session::{ExportedFile, LoadTicket, ToolSession};
use wasm_bindgen::prelude::*;

use crate::logging::js_error;
use crate::types::JsRasterImage;

/// Decode an image from bytes, applying EXIF orientation.
///
/// # Errors
///
/// Returns an error if the container is unknown or the data is corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsRasterImage::from_raster)
        .map_err(|e| js_error("decode", e))
}

/// MIME type of the container in `bytes`, if recognised.
#[wasm_bindgen]
pub fn detect_format(bytes: &[u8]) -> Option<String> {
    ContainerFormat::detect(bytes).map(|f| f.mime().to_string())
}

/// An upload that has been accepted but not yet decoded.
#[wasm_bindgen]
pub struct JsLoadTicket {
    inner: LoadTicket,
}

#[wasm_bindgen]
impl JsLoadTicket {
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.inner.file_name().to_string()
    }
}

/// An encoded result ready for download.
#[wasm_bindgen]
pub struct JsExportedFile {
    inner: ExportedFile,
}

#[wasm_bindgen]
impl JsExportedFile {
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.inner.file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> String {
        self.inner.mime.to_string()
    }

    /// Encoded bytes as a Uint8Array (a copy), for a `Blob`.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }
}

/// Upload state for one tool page.
#[wasm_bindgen]
pub struct JsToolSession {
    inner: ToolSession,
}

#[wasm_bindgen]
impl JsToolSession {
    /// Create a session for a page slug such as `image-resizer` or
    /// `image-converter/png-to-jpg`.
    #[wasm_bindgen(constructor)]
    pub fn new(tool_slug: &str) -> Result<JsToolSession, JsValue> {
        Tool::from_slug(tool_slug)
            .map(|tool| Self {
                inner: ToolSession::new(tool),
            })
            .map_err(|e| js_error("session", e))
    }

    #[wasm_bindgen(getter)]
    pub fn tool_slug(&self) -> String {
        self.inner.tool().slug()
    }

    /// MIME types for the file input's `accept` attribute.
    pub fn accepted_mime_types(&self) -> Vec<String> {
        self.inner
            .tool()
            .accepted_formats()
            .iter()
            .map(|f| f.mime().to_string())
            .collect()
    }

    /// Extensions (with dot) for the file input's `accept` attribute.
    pub fn accepted_extensions(&self) -> Vec<String> {
        self.inner
            .tool()
            .accepted_extensions()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Accept an upload by MIME type and get a ticket for its bytes.
    ///
    /// Throws if the tool does not accept the type; the current image is
    /// kept in that case.
    pub fn begin_load(&mut self, file_name: &str, mime: &str) -> Result<JsLoadTicket, JsValue> {
        self.inner
            .begin_load(file_name, mime)
            .map(|inner| JsLoadTicket { inner })
            .map_err(|e| js_error("upload", e))
    }

    /// Decode the bytes for `ticket`.
    ///
    /// Returns `false` if a newer upload has started since, in which case the
    /// bytes are ignored.
    pub fn finish_load(&mut self, ticket: JsLoadTicket, bytes: &[u8]) -> Result<bool, JsValue> {
        self.inner
            .finish_load(ticket.inner, bytes)
            .map_err(|e| js_error("upload", e))
    }

    /// Copy of the loaded image, if any.
    pub fn image(&self) -> Option<JsRasterImage> {
        self.inner.image().cloned().map(JsRasterImage::from_raster)
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.image().is_some()
    }

    pub fn download_name(&self) -> Option<String> {
        self.inner.download_name()
    }

    /// Encode `result` for download in this tool's output format.
    pub fn export(
        &self,
        result: &JsRasterImage,
        quality: Option<f32>,
    ) -> Result<JsExportedFile, JsValue> {
        self.inner
            .export(&result.to_raster(), quality)
            .map(|inner| JsExportedFile { inner })
            .map_err(|e| js_error("export", e))
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

/// Tests for decode bindings.
///
/// Note: Most decode tests use functions that return `Result<T, JsValue>`,
/// whose error paths only work on wasm32 targets. Success paths and plain
/// return types are tested here; see `artechway_core::decode` and
/// `artechway_core::session` for the underlying functionality.
#[cfg(test)]
mod tests {
    use super::*;
    use artechway_core::decode::RasterImage;
    use artechway_core::encode::encode_png;

    fn png_bytes() -> Vec<u8> {
        encode_png(&RasterImage::new(3, 2, [9, 8, 7, 255].repeat(6))).unwrap()
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(&png_bytes()).as_deref(), Some("image/png"));
        assert_eq!(detect_format(&[0, 1, 2, 3]), None);
    }

    #[test]
    fn test_decode_image_valid_png() {
        let img = decode_image(&png_bytes()).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.byte_length(), 24);
    }

    #[test]
    fn test_session_load_flow() {
        let mut session = JsToolSession::new("image-resizer").unwrap();
        assert_eq!(session.tool_slug(), "image-resizer");
        assert!(!session.has_image());

        let ticket = session.begin_load("pic.png", "image/png").unwrap();
        assert_eq!(ticket.file_name(), "pic.png");
        assert!(session.finish_load(ticket, &png_bytes()).unwrap());

        assert!(session.has_image());
        assert_eq!(session.download_name().as_deref(), Some("pic-resized.png"));
    }

    #[test]
    fn test_session_stale_ticket_ignored() {
        let mut session = JsToolSession::new("image-color-picker").unwrap();
        let old = session.begin_load("old.png", "image/png").unwrap();
        let new = session.begin_load("new.png", "image/png").unwrap();

        assert!(session.finish_load(new, &png_bytes()).unwrap());
        assert!(!session.finish_load(old, &png_bytes()).unwrap());
    }

    #[test]
    fn test_session_accepted_mime_types() {
        let session = JsToolSession::new("image-converter/webp-to-png").unwrap();
        assert_eq!(session.accepted_mime_types(), vec!["image/webp"]);
        assert_eq!(session.accepted_extensions(), vec![".webp"]);
    }

    #[test]
    fn test_session_export() {
        let mut session = JsToolSession::new("image-converter/png-to-jpg").unwrap();
        let ticket = session.begin_load("logo.png", "image/png").unwrap();
        session.finish_load(ticket, &png_bytes()).unwrap();

        let image = session.image().unwrap();
        let file = session.export(&image, Some(0.8)).unwrap();
        assert_eq!(file.file_name(), "logo.jpg");
        assert_eq!(file.mime(), "image/jpeg");
        assert_eq!(&file.bytes()[0..2], &[0xFF, 0xD8]);
    }
}

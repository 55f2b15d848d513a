//! Image encoding and format conversion WASM bindings.
//!
//! # Functions
//!
//! - [`encode_image`] - Encode a JsRasterImage to PNG, JPEG or WebP
//! - [`convert_image`] - Decode uploaded bytes and re-encode them for a converter route
//! - [`route_title`] - Page heading for a converter route
//! - [`conversion_file_name`] - Download name for a converted file
//!
//! # Example
//!
//! ```typescript
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const jpg = convert_image(bytes, 'png-to-jpg', 0.95);
//! const name = conversion_file_name(file.name, 'png-to-jpg');
//! ```

use artechway_core::encode::{self, ConversionRequest};
use artechway_core::format::{ContainerFormat, ConversionRoute, FormatError, Tool};
use wasm_bindgen::prelude::*;

use crate::logging::js_error;
use crate::types::JsRasterImage;

/// Encode an image to the format named by `mime` (`image/png`, `image/jpeg`
/// or `image/webp`).
///
/// `quality` (0.0 to 1.0, default 0.95) only affects JPEG. Transparent areas
/// become white in JPEG output.
#[wasm_bindgen]
pub fn encode_image(
    image: &JsRasterImage,
    mime: &str,
    quality: Option<f32>,
) -> Result<Vec<u8>, JsValue> {
    let Some(format) = ContainerFormat::from_mime(mime) else {
        return Err(js_error(
            "encode",
            FormatError::RejectedMime {
                mime: mime.to_string(),
                expected: "image/png, image/jpeg, image/webp".to_string(),
            },
        ));
    };

    encode::encode_as(&image.to_raster(), format, quality).map_err(|e| js_error("encode", e))
}

/// Convert uploaded file bytes along a `<from>-to-<to>` route such as
/// `png-to-jpg`.
#[wasm_bindgen]
pub fn convert_image(bytes: &[u8], route: &str, quality: Option<f32>) -> Result<Vec<u8>, JsValue> {
    let route = ConversionRoute::parse(route).map_err(|e| js_error("convert", e))?;

    let mut request = ConversionRequest::from_route(&route);
    request.quality = quality;

    encode::convert_bytes(bytes, &request).map_err(|e| js_error("convert", e))
}

/// Target MIME type for a route, or `undefined` for an unknown route.
#[wasm_bindgen]
pub fn route_target_mime(route: &str) -> Option<String> {
    ConversionRoute::parse(route)
        .ok()
        .map(|r| r.to.container().mime().to_string())
}

/// Heading for a converter page, e.g. `PNG to JPG`.
#[wasm_bindgen]
pub fn route_title(route: &str) -> Option<String> {
    ConversionRoute::parse(route).ok().map(|r| r.title())
}

/// `photo.png` + `png-to-webp` -> `photo.webp`.
#[wasm_bindgen]
pub fn conversion_file_name(original_name: &str, route: &str) -> Option<String> {
    let route = ConversionRoute::parse(route).ok()?;
    Tool::Converter(route).download_name(original_name)
}

/// Tests for encode bindings.
///
/// Note: error paths return `JsValue` and only work on wasm32 targets; see
/// `artechway_core::encode` for the underlying functionality.
#[cfg(test)]
mod tests {
    use super::*;
    use artechway_core::decode::RasterImage;

    fn transparent_square() -> JsRasterImage {
        JsRasterImage::from_raster(RasterImage::transparent(6, 6))
    }

    #[test]
    fn test_encode_image_jpeg() {
        let jpeg = encode_image(&transparent_square(), "image/jpeg", None).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_image_png_and_webp() {
        let png = encode_image(&transparent_square(), "image/png", None).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let webp = encode_image(&transparent_square(), "image/webp", Some(0.3)).unwrap();
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn test_convert_image_png_to_jpg() {
        let png = encode::encode_png(&RasterImage::new(2, 2, [1, 2, 3, 128].repeat(4))).unwrap();
        let jpeg = convert_image(&png, "png-to-jpg", Some(0.9)).unwrap();
        assert_eq!(ContainerFormat::detect(&jpeg), Some(ContainerFormat::Jpeg));
    }

    #[test]
    fn test_route_target_mime() {
        assert_eq!(route_target_mime("jfif-to-png").as_deref(), Some("image/png"));
        assert_eq!(route_target_mime("png-to-webp").as_deref(), Some("image/webp"));
        assert_eq!(route_target_mime("nonsense"), None);
    }

    #[test]
    fn test_route_title() {
        assert_eq!(route_title("heic-to-jpeg").as_deref(), Some("HEIC to JPG"));
        assert_eq!(route_title("png-to-gif"), None);
    }

    #[test]
    fn test_conversion_file_name() {
        assert_eq!(
            conversion_file_name("photo.png", "png-to-webp").as_deref(),
            Some("photo.webp")
        );
        assert_eq!(
            conversion_file_name("scan.final.jpeg", "jpeg-to-png").as_deref(),
            Some("scan.final.png")
        );
        assert_eq!(conversion_file_name("a.png", "png-to-bmp"), None);
    }
}

/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use artechway_core::decode::RasterImage;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_unknown_mime_errors() {
        let img = JsRasterImage::from_raster(RasterImage::transparent(2, 2));
        assert!(encode_image(&img, "image/bmp", None).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_heic_errors() {
        let img = JsRasterImage::from_raster(RasterImage::transparent(2, 2));
        assert!(encode_image(&img, "image/heic", None).is_err());
    }

    #[wasm_bindgen_test]
    fn test_convert_heic_source_errors() {
        assert!(convert_image(&[0, 0, 0, 24], "heic-to-jpg", None).is_err());
    }

    #[wasm_bindgen_test]
    fn test_convert_bad_route_errors() {
        assert!(convert_image(&[], "png-to-tiff", None).is_err());
    }
}

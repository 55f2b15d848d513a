//! Container formats, conversion routes, and per-tool upload rules.
//!
//! The converter pages are addressed by slugs such as `png-to-jpg`. A slug is
//! parsed into a [`ConversionRoute`] of two [`FormatCode`]s; each code maps to
//! a [`ContainerFormat`], which is what the encoder and the background-fill
//! policy actually match on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while resolving formats, routes, or uploads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The route slug is not `<from>-to-<to>` with two known codes.
    #[error("Unknown conversion route: {0}")]
    UnknownRoute(String),

    /// No tool page with this slug.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The uploaded file's MIME type is not accepted by the tool.
    #[error("Unsupported file type '{mime}', expected one of: {expected}")]
    RejectedMime { mime: String, expected: String },
}

/// An encoded image family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerFormat {
    /// Lossless, alpha.
    Png,
    /// Lossy, no alpha.
    Jpeg,
    /// Alpha; encoded losslessly here.
    Webp,
    /// Decode only.
    Gif,
    /// Neither decoded nor encoded.
    Heic,
}

impl ContainerFormat {
    pub fn mime(self) -> &'static str {
        match self {
            ContainerFormat::Png => "image/png",
            ContainerFormat::Jpeg => "image/jpeg",
            ContainerFormat::Webp => "image/webp",
            ContainerFormat::Gif => "image/gif",
            ContainerFormat::Heic => "image/heic",
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ContainerFormat::Png => "png",
            ContainerFormat::Jpeg => "jpg",
            ContainerFormat::Webp => "webp",
            ContainerFormat::Gif => "gif",
            ContainerFormat::Heic => "heic",
        }
    }

    /// Extensions (with dot) an upload of this format may carry.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ContainerFormat::Png => &[".png"],
            ContainerFormat::Jpeg => &[".jpg", ".jpeg"],
            ContainerFormat::Webp => &[".webp"],
            ContainerFormat::Gif => &[".gif"],
            ContainerFormat::Heic => &[".heic"],
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(ContainerFormat::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ContainerFormat::Jpeg),
            "image/webp" => Some(ContainerFormat::Webp),
            "image/gif" => Some(ContainerFormat::Gif),
            "image/heic" | "image/heif" => Some(ContainerFormat::Heic),
            _ => None,
        }
    }

    /// Sniff the container from the leading bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Png => Some(ContainerFormat::Png),
            image::ImageFormat::Jpeg => Some(ContainerFormat::Jpeg),
            image::ImageFormat::WebP => Some(ContainerFormat::Webp),
            image::ImageFormat::Gif => Some(ContainerFormat::Gif),
            _ => None,
        }
    }

    /// Whether the encoded form can carry an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, ContainerFormat::Jpeg)
    }

    /// Whether a quality setting affects the encoded output.
    pub fn is_lossy(self) -> bool {
        matches!(self, ContainerFormat::Jpeg)
    }

    pub fn is_decodable(self) -> bool {
        !matches!(self, ContainerFormat::Heic)
    }

    pub fn is_encodable(self) -> bool {
        matches!(
            self,
            ContainerFormat::Png | ContainerFormat::Jpeg | ContainerFormat::Webp
        )
    }
}

/// A format code as it appears in a converter route slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatCode {
    Png,
    Jpg,
    Jpeg,
    Webp,
    Heic,
    Jfif,
}

impl FormatCode {
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "png" => Some(FormatCode::Png),
            "jpg" => Some(FormatCode::Jpg),
            "jpeg" => Some(FormatCode::Jpeg),
            "webp" => Some(FormatCode::Webp),
            "heic" => Some(FormatCode::Heic),
            "jfif" => Some(FormatCode::Jfif),
            _ => None,
        }
    }

    /// The code itself; converted downloads use it as their extension.
    pub fn code(self) -> &'static str {
        match self {
            FormatCode::Png => "png",
            FormatCode::Jpg => "jpg",
            FormatCode::Jpeg => "jpeg",
            FormatCode::Webp => "webp",
            FormatCode::Heic => "heic",
            FormatCode::Jfif => "jfif",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormatCode::Png => "PNG",
            FormatCode::Jpg | FormatCode::Jpeg => "JPG",
            FormatCode::Webp => "WEBP",
            FormatCode::Heic => "HEIC",
            FormatCode::Jfif => "JFIF",
        }
    }

    pub fn container(self) -> ContainerFormat {
        match self {
            FormatCode::Png => ContainerFormat::Png,
            FormatCode::Jpg | FormatCode::Jpeg | FormatCode::Jfif => ContainerFormat::Jpeg,
            FormatCode::Webp => ContainerFormat::Webp,
            FormatCode::Heic => ContainerFormat::Heic,
        }
    }

    /// File extensions (with dot) accepted for uploads of this code.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FormatCode::Png => &[".png"],
            FormatCode::Jpg | FormatCode::Jpeg => &[".jpg", ".jpeg"],
            FormatCode::Webp => &[".webp"],
            FormatCode::Heic => &[".heic"],
            FormatCode::Jfif => &[".jfif", ".jpg", ".jpeg"],
        }
    }
}

/// A converter page: source and target format codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRoute {
    pub from: FormatCode,
    pub to: FormatCode,
}

impl ConversionRoute {
    /// Parse a `<from>-to-<to>` slug.
    pub fn parse(slug: &str) -> Result<Self, FormatError> {
        let unknown = || FormatError::UnknownRoute(slug.to_string());

        let mut parts = slug.split("-to-");
        let (Some(from), Some(to), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(unknown());
        };

        Ok(Self {
            from: FormatCode::parse(from).ok_or_else(unknown)?,
            to: FormatCode::parse(to).ok_or_else(unknown)?,
        })
    }

    pub fn slug(&self) -> String {
        format!("{}-to-{}", self.from.code(), self.to.code())
    }

    /// Page heading, e.g. `PNG to JPG`.
    pub fn title(&self) -> String {
        format!("{} to {}", self.from.label(), self.to.label())
    }
}

/// Which page an upload belongs to. Each tool has its own MIME allow-list
/// and download naming rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    /// Dominant-color palette.
    ColorPalette,
    /// Hover-and-click color picker.
    ColorPicker,
    Cropper,
    Resizer,
    Converter(ConversionRoute),
}

impl Tool {
    /// Resolve a page slug such as `image-cropper` or
    /// `image-converter/png-to-jpg`.
    pub fn from_slug(slug: &str) -> Result<Self, FormatError> {
        match slug.trim_matches('/') {
            "color-picker" => Ok(Tool::ColorPalette),
            "image-color-picker" => Ok(Tool::ColorPicker),
            "image-cropper" => Ok(Tool::Cropper),
            "image-resizer" => Ok(Tool::Resizer),
            "image-converter" => Ok(Tool::Converter(ConversionRoute {
                from: FormatCode::Png,
                to: FormatCode::Jpg,
            })),
            other => match other.strip_prefix("image-converter/") {
                Some(route) => Ok(Tool::Converter(ConversionRoute::parse(route)?)),
                None => Err(FormatError::UnknownTool(slug.to_string())),
            },
        }
    }

    pub fn slug(&self) -> String {
        match self {
            Tool::ColorPalette => "color-picker".to_string(),
            Tool::ColorPicker => "image-color-picker".to_string(),
            Tool::Cropper => "image-cropper".to_string(),
            Tool::Resizer => "image-resizer".to_string(),
            Tool::Converter(route) => format!("image-converter/{}", route.slug()),
        }
    }

    /// Formats accepted for upload.
    pub fn accepted_formats(&self) -> Vec<ContainerFormat> {
        use ContainerFormat::*;
        match self {
            Tool::ColorPalette => vec![Png, Jpeg, Webp, Gif],
            Tool::ColorPicker | Tool::Cropper | Tool::Resizer => vec![Png, Jpeg, Webp],
            Tool::Converter(route) => vec![route.from.container()],
        }
    }

    /// Extensions for the file input's `accept` attribute.
    pub fn accepted_extensions(&self) -> Vec<&'static str> {
        match self {
            Tool::Converter(route) => route.from.extensions().to_vec(),
            _ => self
                .accepted_formats()
                .into_iter()
                .flat_map(|f| f.extensions().iter().copied())
                .collect(),
        }
    }

    /// Gate an upload by its declared MIME type.
    pub fn check_mime(&self, mime: &str) -> Result<ContainerFormat, FormatError> {
        let accepted = self.accepted_formats();
        match ContainerFormat::from_mime(mime) {
            Some(format) if accepted.contains(&format) => Ok(format),
            _ => Err(FormatError::RejectedMime {
                mime: mime.to_string(),
                expected: accepted
                    .iter()
                    .map(|f| f.mime())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// Name for the downloaded result of this tool.
    ///
    /// Returns `None` for tools that do not produce a file.
    pub fn download_name(&self, original_name: &str) -> Option<String> {
        let (base, ext) = split_file_name(original_name);
        match self {
            Tool::ColorPalette | Tool::ColorPicker => None,
            Tool::Cropper => Some(format!("{base}-cropped.jpg")),
            Tool::Resizer => Some(match ext {
                Some(ext) => format!("{base}-resized.{ext}"),
                None => format!("{base}-resized"),
            }),
            Tool::Converter(route) => Some(format!("{base}.{}", route.to.code())),
        }
    }
}

/// Split `photo.final.png` into (`photo.final`, `Some("png")`).
fn split_file_name(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => (base, Some(ext)),
        _ => (name, None),
    }
}

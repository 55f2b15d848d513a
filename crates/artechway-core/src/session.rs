//! Per-tool upload state.
//!
//! Reading a file happens asynchronously on the page, and a user can pick a
//! second file before the first has finished decoding. Each upload gets a
//! [`LoadTicket`]; only the most recent ticket may install its image, so the
//! last file chosen always wins regardless of completion order.

use thiserror::Error;

use crate::decode::{decode_image, DecodeError, RasterImage};
use crate::encode::{encode_as, ConversionRequest, EncodeError};
use crate::format::{ContainerFormat, FormatError, Tool};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("No image loaded")]
    NoImage,

    #[error("This tool does not produce a file")]
    NothingToExport,
}

/// Handle for one in-flight upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    file_name: String,
    format: ContainerFormat,
}

impl LoadTicket {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn format(&self) -> ContainerFormat {
        self.format
    }
}

/// An image that finished loading.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub file_name: String,
    pub format: ContainerFormat,
    pub image: RasterImage,
}

/// An encoded result ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ToolSession {
    tool: Tool,
    generation: u64,
    current: Option<LoadedImage>,
}

impl ToolSession {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            generation: 0,
            current: None,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Start an upload.
    ///
    /// A rejected MIME type, or a converter route that cannot be carried out,
    /// fails here and leaves the session untouched. An accepted upload clears
    /// the current image and supersedes every earlier ticket.
    pub fn begin_load(&mut self, file_name: &str, mime: &str) -> Result<LoadTicket, SessionError> {
        if let Tool::Converter(route) = self.tool {
            ConversionRequest::from_route(&route).check_supported()?;
        }
        let format = self.tool.check_mime(mime)?;

        self.generation += 1;
        self.current = None;
        Ok(LoadTicket {
            generation: self.generation,
            file_name: file_name.to_owned(),
            format,
        })
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Finish an upload with the file's bytes.
    ///
    /// Returns `Ok(false)` without decoding if the ticket has been superseded.
    ///
    /// # Errors
    ///
    /// Decode failures for the current ticket; the session stays empty.
    pub fn finish_load(&mut self, ticket: LoadTicket, bytes: &[u8]) -> Result<bool, SessionError> {
        if !self.is_current(&ticket) {
            log::debug!(
                "discarding stale load of {} (generation {}, current {})",
                ticket.file_name,
                ticket.generation,
                self.generation
            );
            return Ok(false);
        }

        let image = decode_image(bytes)?;
        log::info!(
            "loaded {} ({}x{}) into {:?}",
            ticket.file_name,
            image.width,
            image.height,
            self.tool
        );

        self.current = Some(LoadedImage {
            file_name: ticket.file_name,
            format: ticket.format,
            image,
        });
        Ok(true)
    }

    /// Begin and finish in one step.
    pub fn load(&mut self, file_name: &str, mime: &str, bytes: &[u8]) -> Result<(), SessionError> {
        let ticket = self.begin_load(file_name, mime)?;
        self.finish_load(ticket, bytes)?;
        Ok(())
    }

    pub fn loaded(&self) -> Option<&LoadedImage> {
        self.current.as_ref()
    }

    pub fn image(&self) -> Option<&RasterImage> {
        self.current.as_ref().map(|loaded| &loaded.image)
    }

    /// Drop the current image and invalidate outstanding tickets.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.current = None;
    }

    pub fn download_name(&self) -> Option<String> {
        let loaded = self.current.as_ref()?;
        self.tool.download_name(&loaded.file_name)
    }

    /// Format a result is written in for download.
    pub fn export_format(&self) -> Option<ContainerFormat> {
        let loaded = self.current.as_ref()?;
        match self.tool {
            Tool::ColorPalette | Tool::ColorPicker => None,
            Tool::Cropper => Some(ContainerFormat::Jpeg),
            Tool::Resizer => Some(loaded.format),
            Tool::Converter(route) => Some(route.to.container()),
        }
    }

    /// Encode `result` (the cropped, resized or loaded image) for download.
    ///
    /// `quality` applies to lossy targets only.
    pub fn export(
        &self,
        result: &RasterImage,
        quality: Option<f32>,
    ) -> Result<ExportedFile, SessionError> {
        if self.current.is_none() {
            return Err(SessionError::NoImage);
        }
        let (Some(format), Some(file_name)) = (self.export_format(), self.download_name()) else {
            return Err(SessionError::NothingToExport);
        };

        let bytes = encode_as(result, format, quality)?;
        Ok(ExportedFile {
            file_name,
            mime: format.mime(),
            bytes,
        })
    }
}

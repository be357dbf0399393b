//! Request and result types for the edit pipeline.

use crate::encode::{split_data_url, SourceImage};
use crate::error::{EditError, Result};
use base64::Engine;
use std::path::Path;

/// Default file name for downloading an edited image.
pub const DOWNLOAD_FILE_NAME: &str = "gemini-edit.png";

/// A single stateless edit request: one instruction, one inline image.
///
/// No chat history and no multi-turn context; every request stands alone.
#[derive(Debug, Clone)]
pub struct EditRequest {
    /// The instruction describing the desired edit.
    pub prompt: String,
    /// Base64 payload of the original image, no data URL prefix.
    pub encoded_data: String,
    /// Declared media type of the original image.
    pub media_type: String,
}

impl EditRequest {
    /// Creates a new request from its parts.
    pub fn new(
        prompt: impl Into<String>,
        encoded_data: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            encoded_data: encoded_data.into(),
            media_type: media_type.into(),
        }
    }

    /// Creates a request against a loaded source image.
    pub fn from_source(prompt: impl Into<String>, source: &SourceImage) -> Self {
        Self::new(prompt, &source.encoded, &source.media_type)
    }
}

/// An edited image returned by the service.
#[derive(Debug, Clone)]
#[must_use = "edited image should be displayed or saved"]
pub struct EditedImage {
    /// Self-contained `data:` URL a rendering surface can use directly.
    pub data_url: String,
    /// The instruction that produced this image.
    pub source_prompt: String,
}

impl EditedImage {
    /// Creates an edited image from a returned payload and its media type.
    pub fn from_payload(
        media_type: &str,
        encoded_data: &str,
        source_prompt: impl Into<String>,
    ) -> Self {
        Self {
            data_url: format!("data:{media_type};base64,{encoded_data}"),
            source_prompt: source_prompt.into(),
        }
    }

    /// Media type embedded in the data URL.
    pub fn media_type(&self) -> Result<&str> {
        split_data_url(&self.data_url).map(|(mime, _)| mime)
    }

    /// Decodes the embedded payload back to raw image bytes.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        let (_, payload) = split_data_url(&self.data_url)?;
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| EditError::Decode(e.to_string()))
    }

    /// Saves the decoded image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.bytes()?)?;
        Ok(())
    }
}

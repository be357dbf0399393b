//! Source-image loading and transport encoding.
//!
//! Converts a picked image file into the payload the edit request carries:
//! a base64 string (no prefix) plus its declared media type, produced by
//! building a self-describing data URL and splitting it back apart. Also
//! owns the ephemeral on-disk preview of the original.

use crate::error::{EditError, Result};
use base64::Engine;
use std::io::Write;
use std::path::Path;

/// Image formats the loader recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
    /// GIF format (legacy, animated).
    Gif,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Gif => "gif",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Attempts to match a declared MIME type to a known format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        // GIF: GIF87a / GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        None
    }
}

/// Returns true if the declared media type belongs to the image category.
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Splits `data:<mediaType>;base64,<payload>` into its two parts.
///
/// Any string that does not match the two-part structured form is rejected.
pub fn split_data_url(url: &str) -> Result<(&str, &str)> {
    let rest = url.strip_prefix("data:").ok_or_else(parse_error)?;
    let (media_type, payload) = rest.split_once(";base64,").ok_or_else(parse_error)?;
    if media_type.is_empty() {
        return Err(parse_error());
    }
    Ok((media_type, payload))
}

/// Encodes raw bytes as a transport payload.
///
/// Builds the self-describing `data:<mediaType>;base64,<payload>` string,
/// then splits it back into `(media_type, payload)`.
pub fn encode_to_payload(bytes: &[u8], media_type: &str) -> Result<(String, String)> {
    let data_url = format!(
        "data:{};base64,{}",
        media_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    );
    let (media_type, payload) = split_data_url(&data_url)?;
    Ok((media_type.to_string(), payload.to_string()))
}

fn parse_error() -> EditError {
    EditError::Encoding("Failed to parse base64 data.".into())
}

/// Ephemeral on-disk copy of the original image for display surfaces.
///
/// The underlying temp file is removed when the handle is dropped, so a
/// preview superseded by a new selection never leaks.
#[derive(Debug)]
pub struct PreviewHandle {
    file: tempfile::NamedTempFile,
}

impl PreviewHandle {
    fn new(bytes: &[u8], media_type: &str) -> Result<Self> {
        let ext = ImageFormat::from_mime_type(media_type)
            .map(|f| f.extension())
            .unwrap_or("img");
        let mut file = tempfile::Builder::new()
            .prefix("nanostyle-preview-")
            .suffix(&format!(".{ext}"))
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    /// Local path a display surface can read the preview from.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// A loaded original image, ready to submit for editing.
///
/// Created whole on successful load and replaced whole on a new selection;
/// `encoded` always matches `data`.
#[derive(Debug)]
pub struct SourceImage {
    /// Raw bytes as read from the picked file.
    pub data: Vec<u8>,
    /// Declared media type, e.g. "image/jpeg".
    pub media_type: String,
    /// Base64 transport payload, no data URL prefix.
    pub encoded: String,
    /// Ephemeral local preview, freed when this image is replaced.
    pub preview: PreviewHandle,
}

impl SourceImage {
    /// Loads an image file, deriving its declared media type from magic
    /// bytes with the file extension as fallback.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "failed to read image file");
            EditError::Encoding("Failed to process image. Please try again.".into())
        })?;

        let media_type = ImageFormat::from_magic_bytes(&data)
            .or_else(|| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .and_then(ImageFormat::from_extension)
            })
            .map(|f| f.mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Self::from_bytes(data, media_type)
    }

    /// Builds a source image from raw bytes and a declared media type.
    ///
    /// A declared type outside the image category is rejected before any
    /// encoding happens.
    pub fn from_bytes(data: Vec<u8>, media_type: impl Into<String>) -> Result<Self> {
        let media_type = media_type.into();
        if !is_image_media_type(&media_type) {
            return Err(EditError::Validation(
                "Please upload a valid image file.".into(),
            ));
        }

        let (media_type, encoded) = encode_to_payload(&data, &media_type)?;
        let preview = PreviewHandle::new(&data, &media_type)?;

        Ok(Self {
            data,
            media_type,
            encoded,
            preview,
        })
    }
}

//! Error types for the edit pipeline.

/// Errors that can occur while preparing or performing an image edit.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Input rejected before any remote call (wrong file type, empty prompt).
    #[error("{0}")]
    Validation(String),

    /// Source file unreadable or its encoded form was malformed.
    #[error("{0}")]
    Encoding(String),

    /// The model answered with explanatory text instead of an image.
    #[error("{0}")]
    Refusal(String),

    /// The reply did not contain a usable image.
    #[error("{0}")]
    Service(String),

    /// API key missing or invalid.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Error text returned by the service.
        message: String,
    },

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (reading the source file, saving the result).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditError {
    /// Best-available message for a display surface.
    ///
    /// Transport-level failures carry internals that mean nothing to a user,
    /// so they collapse to a generic message; the underlying error has
    /// already been logged where it occurred.
    pub fn message(&self) -> String {
        match self {
            Self::Network(_) | Self::Io(_) | Self::Json(_) => "Failed to edit image.".into(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for edit pipeline operations.
pub type Result<T> = std::result::Result<T, EditError>;

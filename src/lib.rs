#![warn(missing_docs)]
//! NanoStyle - prompt-driven photo editing via the Gemini image model.
//!
//! Load a photo, describe the change in natural language, send both to
//! Gemini and get back a displayable edited image for comparison.
//!
//! # Quick Start
//!
//! ```no_run
//! use nanostyle::{GeminiEditor, Session, SourceImage};
//!
//! #[tokio::main]
//! async fn main() -> nanostyle::Result<()> {
//!     let editor = GeminiEditor::builder().build()?;
//!
//!     let mut session = Session::new();
//!     session.load_image(SourceImage::from_file("photo.jpg")?);
//!     session.set_prompt("Turn this into a pencil sketch");
//!     session.submit(&editor).await;
//!
//!     if let Some(result) = session.result() {
//!         result.save("gemini-edit.png")?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod edit;
pub mod encode;
mod error;
pub mod session;

pub use edit::{
    EditRequest, EditedImage, GeminiEditor, GeminiEditorBuilder, ImageEditor, DOWNLOAD_FILE_NAME,
    GEMINI_MODEL,
};
pub use encode::{ImageFormat, PreviewHandle, SourceImage};
pub use error::{EditError, Result};
pub use session::{RequestPhase, Session, SubmitTicket, SUGGESTED_PROMPTS};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::edit::{EditedImage, GeminiEditor, ImageEditor};
    pub use crate::encode::SourceImage;
    pub use crate::error::{EditError, Result};
    pub use crate::session::{RequestPhase, Session};
}

//! The edit pipeline: request packaging, the remote call, reply extraction.

mod editor;
mod gemini;
mod types;

pub use editor::ImageEditor;
pub use gemini::{GeminiEditor, GeminiEditorBuilder, GEMINI_MODEL};
pub use types::{EditRequest, EditedImage, DOWNLOAD_FILE_NAME};

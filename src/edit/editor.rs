//! The seam between the session and the remote generation service.

use crate::edit::types::{EditRequest, EditedImage};
use crate::error::Result;
use async_trait::async_trait;

/// A remote service that turns (image, instruction) into an edited image.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    /// Performs a single stateless edit.
    ///
    /// Exactly one outbound call per invocation; no retries, no caching.
    async fn edit(&self, request: &EditRequest) -> Result<EditedImage>;

    /// Checks that the service is reachable and the credential is accepted.
    async fn health_check(&self) -> Result<()>;
}

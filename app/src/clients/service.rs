//! High-level background-removal abstraction.
//!
//! The processor only sees this trait, so tests can swap the HTTP
//! implementation for a scripted one.

use async_trait::async_trait;
use nobg_session::{ProcessedImage, ProcessingError, SourceFile};

#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    /// Send the image to the removal service.
    ///
    /// # Returns
    /// * `Ok(ProcessedImage)` - Image with the background removed
    /// * `Err(ProcessingError)` - Always carries a displayable message, never a raw transport error
    async fn remove_background(&self, file: &SourceFile)
        -> Result<ProcessedImage, ProcessingError>;
}

use serde::{Deserialize, Serialize};

use crate::validator::Rejection;

/// Prefix applied to every message that comes back from the removal service
pub const REMOTE_ERROR_PREFIX: &str = "Failed to remove background: ";

/// Every way processing an image can fail.
///
/// All variants end up as a `Failed` record carrying [`ProcessingError::user_message`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessingError {
    /// Refused locally, the network was never touched
    #[error(transparent)]
    Validation(#[from] Rejection),
    /// Transport failure or non-success status from the removal service
    #[error("{0}")]
    Remote(String),
    /// The removal service did not answer within the processing deadline
    #[error("Request timeout. Please try again.")]
    Timeout,
    #[error("An unknown error occurred while processing the image")]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ErrorKind {
    Validation,
    Remote,
    Timeout,
    Unknown,
}

impl ProcessingError {
    /// Remote failure whose detail is prefixed for display
    pub fn remote(detail: impl AsRef<str>) -> Self {
        ProcessingError::Remote(format!("{}{}", REMOTE_ERROR_PREFIX, detail.as_ref()))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessingError::Validation(_) => ErrorKind::Validation,
            ProcessingError::Remote(_) => ErrorKind::Remote,
            ProcessingError::Timeout => ErrorKind::Timeout,
            ProcessingError::Unknown => ErrorKind::Unknown,
        }
    }

    /// Returns a user-friendly error message suitable for display in the UI
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

//! Checks applied where files enter the app, before the session sees them.
//!
//! A drop target or picker can refuse files on its own (too many at once,
//! wrong type, too big). Those refusals are reported with the same wording as
//! the validator and are cleared automatically after [`DROP_REJECTION_DISPLAY`].

use std::time::Duration;

use crate::validator::{is_accepted_mime_type, Rejection, SourceFile, MAX_FILE_SIZE_BYTES};

/// How long a drop-zone refusal stays on screen before the record clears itself
pub const DROP_REJECTION_DISPLAY: Duration = Duration::from_secs(5);

/// Refusal codes reported by a drop target
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum DropRejection {
    FileTooLarge,
    FileInvalidType,
    TooManyFiles,
}

impl From<DropRejection> for Rejection {
    fn from(rejection: DropRejection) -> Self {
        match rejection {
            DropRejection::FileTooLarge => Rejection::TooLarge,
            DropRejection::FileInvalidType => Rejection::InvalidType,
            DropRejection::TooManyFiles => Rejection::TooManyFiles,
        }
    }
}

/// Single-file drop target with its own size and type limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropZone {
    pub max_size_bytes: u64,
}

impl Default for DropZone {
    fn default() -> Self {
        Self {
            max_size_bytes: MAX_FILE_SIZE_BYTES,
        }
    }
}

impl DropZone {
    /// Pick the one file a drop delivers, or report why the drop was refused.
    pub fn accept(&self, mut files: Vec<SourceFile>) -> Result<Option<SourceFile>, DropRejection> {
        if files.len() > 1 {
            return Err(DropRejection::TooManyFiles);
        }

        let Some(file) = files.pop() else {
            return Ok(None);
        };

        // Same order as the validator: size first
        if file.size() > self.max_size_bytes {
            return Err(DropRejection::FileTooLarge);
        }

        if !is_accepted_mime_type(&file.mime_type) {
            return Err(DropRejection::FileInvalidType);
        }

        Ok(Some(file))
    }
}

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ProcessingError};
use crate::references::LocalReference;
use crate::state::ImageStatus;
use crate::validator::SourceFile;

/// Processed bytes returned by the removal service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub bytes: Bytes,
    pub content_type: String,
}

/// The single live image record. Each transition replaces or edits it in place.
#[derive(Debug, Default)]
pub struct ImageRecord {
    pub(crate) source_file: Option<SourceFile>,
    pub(crate) preview: Option<LocalReference>,
    pub(crate) result: Option<LocalReference>,
    pub(crate) status: ImageStatus,
    pub(crate) error: Option<ProcessingError>,
}

impl ImageRecord {
    pub fn source_file(&self) -> Option<&SourceFile> {
        self.source_file.as_ref()
    }

    pub fn preview(&self) -> Option<&LocalReference> {
        self.preview.as_ref()
    }

    pub fn result(&self) -> Option<&LocalReference> {
        self.result.as_ref()
    }

    pub fn status(&self) -> ImageStatus {
        self.status
    }

    pub fn error(&self) -> Option<&ProcessingError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ProcessingError::user_message)
    }
}

/// Read-only view of a record for presentation layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub generation: u64,
    pub status: ImageStatus,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub mime_type: Option<String>,
    pub preview_reference: Option<String>,
    pub result_reference: Option<String>,
    pub error_message: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

impl SessionSnapshot {
    pub(crate) fn of(record: &ImageRecord, generation: u64) -> Self {
        let file = record.source_file.as_ref();
        Self {
            generation,
            status: record.status,
            file_name: file.map(|f| f.name.clone()),
            file_size: file.map(SourceFile::size),
            mime_type: file.map(|f| f.mime_type.clone()),
            preview_reference: record.preview.as_ref().map(ToString::to_string),
            result_reference: record.result.as_ref().map(ToString::to_string),
            error_message: record.error_message(),
            error_kind: record.error.as_ref().map(ProcessingError::kind),
        }
    }

    /// Processing overlay should be shown
    pub fn is_processing(&self) -> bool {
        self.status.is_busy()
    }
}

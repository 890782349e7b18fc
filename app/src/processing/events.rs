//! State change events for presentation layers.
//!
//! One tagged event per distinct view of the record, derived from snapshots,
//! so a front end can render the drop target, processing overlay, error panel
//! or result panel without knowing the session's internals.

use nobg_session::{ErrorKind, ImageStatus, SessionSnapshot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ImageStateChanged {
    /// Nothing selected, show the drop target
    #[serde(rename = "idle")]
    Idle,
    /// File accepted and shown, not yet sent
    #[serde(rename = "previewing")]
    Previewing {
        #[serde(rename = "fileName")]
        file_name: String,
        #[serde(rename = "previewReference")]
        preview_reference: Option<String>,
    },
    /// Removal request in flight, show the processing overlay
    #[serde(rename = "processing")]
    Processing {
        #[serde(rename = "fileName")]
        file_name: String,
    },
    /// Processed image ready for display and download
    #[serde(rename = "succeeded")]
    Succeeded {
        #[serde(rename = "fileName")]
        file_name: String,
        #[serde(rename = "resultReference")]
        result_reference: Option<String>,
    },
    /// Show the error panel with a retry action
    #[serde(rename = "failed")]
    Failed {
        #[serde(rename = "errorKind")]
        error_kind: Option<ErrorKind>,
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl From<&SessionSnapshot> for ImageStateChanged {
    fn from(snapshot: &SessionSnapshot) -> Self {
        let file_name = snapshot.file_name.clone().unwrap_or_default();
        match snapshot.status {
            ImageStatus::Idle => ImageStateChanged::Idle,
            ImageStatus::Previewing => ImageStateChanged::Previewing {
                file_name,
                preview_reference: snapshot.preview_reference.clone(),
            },
            ImageStatus::Processing => ImageStateChanged::Processing { file_name },
            ImageStatus::Succeeded => ImageStateChanged::Succeeded {
                file_name,
                result_reference: snapshot.result_reference.clone(),
            },
            ImageStatus::Failed => ImageStateChanged::Failed {
                error_kind: snapshot.error_kind,
                error_message: snapshot.error_message.clone().unwrap_or_default(),
            },
        }
    }
}

//! Image State Machine - single source of truth for valid status transitions
//!
//! State diagram:
//! ```text
//!            ┌───────────Reject──────────────┐
//!            │                               ↓
//! Idle ──Accept──> Previewing ──Begin──> Processing ──Fail──> Failed
//!   ↑                                        │
//!   │                                     Succeed
//!   │                                        ↓
//!   └──────────────Reset────────────── Succeeded ──Download──┐
//!                                            ↑               │
//!                                            └───────────────┘
//! ```
//!
//! `Accept`, `Reject` and `Reset` are valid from every status: a new selection
//! always replaces whatever record was live.

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum ImageStatus {
    /// Nothing selected
    #[default]
    Idle,
    /// File accepted and previewable, not yet sent
    Previewing,
    /// Exactly one removal request is in flight
    Processing,
    /// Processed image is available
    Succeeded,
    /// Error message is available, preview and result are released
    Failed,
}

impl ImageStatus {
    pub fn is_busy(self) -> bool {
        self == Self::Processing
    }
}

/// Events that can trigger status transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SessionEvent {
    /// Selected file passed validation
    Accept,
    /// Selected or dropped file was refused
    Reject,
    /// Send the previewed file to the removal service
    Begin,
    /// Removal service returned an image
    Succeed,
    /// Removal failed or timed out
    Fail,
    /// Retry or reset back to an empty record
    Reset,
    /// Save the processed image
    Download,
}

/// Reason a transition was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{attempted_event} event rejected in {current_status} state")]
pub struct TransitionRejection {
    pub current_status: ImageStatus,
    pub attempted_event: SessionEvent,
}

/// Pure function: compute what status an event leads to.
/// Returns None if the transition is invalid.
pub fn compute_transition(current: ImageStatus, event: SessionEvent) -> Option<ImageStatus> {
    match event {
        SessionEvent::Accept => Some(ImageStatus::Previewing),
        SessionEvent::Reject => Some(ImageStatus::Failed),
        SessionEvent::Reset => Some(ImageStatus::Idle),
        SessionEvent::Begin => {
            (current == ImageStatus::Previewing).then_some(ImageStatus::Processing)
        }
        SessionEvent::Succeed => {
            (current == ImageStatus::Processing).then_some(ImageStatus::Succeeded)
        }
        SessionEvent::Fail => (current == ImageStatus::Processing).then_some(ImageStatus::Failed),
        SessionEvent::Download => {
            (current == ImageStatus::Succeeded).then_some(ImageStatus::Succeeded)
        }
    }
}

/// [`compute_transition`] as a `Result`, for callers that propagate rejections.
pub fn transition(
    current: ImageStatus,
    event: SessionEvent,
) -> Result<ImageStatus, TransitionRejection> {
    compute_transition(current, event).ok_or(TransitionRejection {
        current_status: current,
        attempted_event: event,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [ImageStatus; 5] = [
        ImageStatus::Idle,
        ImageStatus::Previewing,
        ImageStatus::Processing,
        ImageStatus::Succeeded,
        ImageStatus::Failed,
    ];

    #[test]
    fn test_selection_and_reset_valid_everywhere() {
        for status in ALL_STATUSES {
            assert_eq!(
                compute_transition(status, SessionEvent::Accept),
                Some(ImageStatus::Previewing)
            );
            assert_eq!(
                compute_transition(status, SessionEvent::Reject),
                Some(ImageStatus::Failed)
            );
            assert_eq!(
                compute_transition(status, SessionEvent::Reset),
                Some(ImageStatus::Idle)
            );
        }
    }

    #[test]
    fn test_guarded_transitions() {
        let test_cases = vec![
            (
                ImageStatus::Previewing,
                SessionEvent::Begin,
                Some(ImageStatus::Processing),
            ),
            (ImageStatus::Idle, SessionEvent::Begin, None),
            (ImageStatus::Processing, SessionEvent::Begin, None),
            (
                ImageStatus::Processing,
                SessionEvent::Succeed,
                Some(ImageStatus::Succeeded),
            ),
            (
                ImageStatus::Processing,
                SessionEvent::Fail,
                Some(ImageStatus::Failed),
            ),
            (ImageStatus::Idle, SessionEvent::Succeed, None),
            (ImageStatus::Failed, SessionEvent::Fail, None),
            (
                ImageStatus::Succeeded,
                SessionEvent::Download,
                Some(ImageStatus::Succeeded),
            ),
            (ImageStatus::Processing, SessionEvent::Download, None),
            (ImageStatus::Failed, SessionEvent::Download, None),
        ];

        for (current, event, expected) in test_cases {
            assert_eq!(
                compute_transition(current, event),
                expected,
                "{} in {}",
                event,
                current
            );
        }
    }

    #[test]
    fn test_rejection_message() {
        let rejection = transition(ImageStatus::Idle, SessionEvent::Download).unwrap_err();
        assert_eq!(
            rejection.to_string(),
            "Download event rejected in Idle state"
        );
    }

    #[test]
    fn test_only_processing_is_busy() {
        for status in ALL_STATUSES {
            assert_eq!(status.is_busy(), status == ImageStatus::Processing);
        }
    }
}

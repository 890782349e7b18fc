//! The image session: owner of the live record and every reference it holds.
//!
//! The session is the only writer of the record. All I/O (the removal
//! request, the deadline, writing downloads) happens outside; the caller
//! feeds outcomes back tagged with the [`Generation`] they were started under.
//! `select`, `reset`, `retry` and `reject_dropped` advance the generation, so
//! an outcome that arrives after the record was replaced is ignored.

use std::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::download::{download_file_name, DownloadRequest};
use crate::dropzone::DropRejection;
use crate::error::ProcessingError;
use crate::record::{ImageRecord, ProcessedImage, SessionSnapshot};
use crate::references::{Blob, LocalReference, ReferenceRegistry};
use crate::state::{transition, ImageStatus, SessionEvent, TransitionRejection};
use crate::validator::{self, SourceFile};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Work order for one removal request.
#[derive(Debug, Clone)]
pub struct RemovalTicket {
    generation: Generation,
    file: SourceFile,
}

impl RemovalTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn file(&self) -> &SourceFile {
        &self.file
    }
}

/// What happened to a removal outcome handed to [`Session::complete`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Applied to the current record, which now has this status
    Applied(ImageStatus),
    /// The record moved on, nothing changed
    Stale,
}

#[derive(Debug, Default)]
pub struct Session {
    registry: ReferenceRegistry,
    record: ImageRecord,
    generation: Generation,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> &ImageRecord {
        &self.record
    }

    pub fn status(&self) -> ImageStatus {
        self.record.status
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn references(&self) -> &ReferenceRegistry {
        &self.registry
    }

    /// Bytes behind one of this session's references
    pub fn resolve(&self, reference: &LocalReference) -> Option<&Blob> {
        self.registry.get(reference)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::of(&self.record, self.generation.value())
    }

    /// Replace the record with a new selection.
    ///
    /// On acceptance the record is `Previewing` with a fresh preview reference
    /// and the new generation is returned; call [`Session::begin_processing`]
    /// next. On rejection the record is `Failed` and nothing was allocated.
    pub fn select(
        &mut self,
        file: impl Into<Option<SourceFile>>,
    ) -> Result<Generation, ProcessingError> {
        let file = file.into();
        self.replace_record();

        if let Err(rejection) = validator::validate(file.as_ref()) {
            warn!("Selection rejected: {}", rejection);
            let error = ProcessingError::Validation(rejection);
            self.record.status = transition(self.record.status, SessionEvent::Reject)
                .unwrap_or(ImageStatus::Failed);
            self.record.error = Some(error.clone());
            return Err(error);
        }

        let Some(file) = file else {
            return Err(ProcessingError::Unknown);
        };

        let status = transition(self.record.status, SessionEvent::Accept)
            .unwrap_or(ImageStatus::Previewing);
        let preview = self
            .registry
            .create(file.bytes.clone(), file.mime_type.clone());

        info!(
            "Selected {} ({} bytes, {}) as generation {}",
            file.name,
            file.size(),
            file.mime_type,
            self.generation
        );

        self.record = ImageRecord {
            source_file: Some(file),
            preview: Some(preview),
            result: None,
            status,
            error: None,
        };

        Ok(self.generation)
    }

    /// Move a previewed record into `Processing` and hand out the request to run.
    pub fn begin_processing(&mut self) -> Result<RemovalTicket, TransitionRejection> {
        let next = transition(self.record.status, SessionEvent::Begin)?;
        let file = self.record.source_file.clone().ok_or(TransitionRejection {
            current_status: self.record.status,
            attempted_event: SessionEvent::Begin,
        })?;

        self.record.status = next;
        debug!("Processing {} under generation {}", file.name, self.generation);

        Ok(RemovalTicket {
            generation: self.generation,
            file,
        })
    }

    /// Apply the outcome of a removal request started under `generation`.
    ///
    /// The result reference is only allocated when the outcome is applied, so
    /// a stale success never leaves anything behind.
    pub fn complete(
        &mut self,
        generation: Generation,
        outcome: Result<ProcessedImage, ProcessingError>,
    ) -> Outcome {
        if generation != self.generation || self.record.status != ImageStatus::Processing {
            warn!(
                "Ignoring removal outcome for generation {} (current {}, {})",
                generation, self.generation, self.record.status
            );
            return Outcome::Stale;
        }

        match outcome {
            Ok(image) => {
                let status = match transition(self.record.status, SessionEvent::Succeed) {
                    Ok(status) => status,
                    Err(rejection) => {
                        warn!("{}", rejection);
                        return Outcome::Stale;
                    }
                };
                info!(
                    "Background removed ({} bytes, {})",
                    image.bytes.len(),
                    image.content_type
                );
                let result = self.registry.create(image.bytes, image.content_type);
                if let Some(previous) = self.record.result.replace(result) {
                    self.registry.revoke(previous);
                }
                self.record.error = None;
                self.record.status = status;
                Outcome::Applied(status)
            }
            Err(error) => {
                self.fail(error);
                Outcome::Applied(self.record.status)
            }
        }
    }

    /// Record a refusal made by the drop target. Returns the generation the
    /// refusal lives under, for [`Session::clear_dropped_rejection`].
    pub fn reject_dropped(&mut self, rejection: DropRejection) -> Generation {
        self.replace_record();
        let error = ProcessingError::Validation(rejection.into());
        warn!("Drop rejected ({}): {}", rejection, error);

        self.record.status =
            transition(self.record.status, SessionEvent::Reject).unwrap_or(ImageStatus::Failed);
        self.record.error = Some(error);
        self.generation
    }

    /// Return to `Idle` once a drop refusal has been displayed long enough.
    ///
    /// Does nothing if anything happened since the refusal.
    pub fn clear_dropped_rejection(&mut self, generation: Generation) -> bool {
        if generation != self.generation || self.record.status != ImageStatus::Failed {
            return false;
        }
        debug!("Clearing drop refusal {}", generation);
        self.reset();
        true
    }

    /// Drop the record and everything it references.
    pub fn reset(&mut self) {
        self.replace_record();
        self.record.status =
            transition(self.record.status, SessionEvent::Reset).unwrap_or(ImageStatus::Idle);
        debug!("Session reset to {}", self.generation);
    }

    /// Leave the error panel. Same effect as [`Session::reset`].
    pub fn retry(&mut self) {
        info!("Retry requested after {}", self.record.status);
        self.reset();
    }

    /// Prepare the processed image for saving. Only valid in `Succeeded`.
    pub fn download(&self) -> Result<DownloadRequest, TransitionRejection> {
        let rejection = TransitionRejection {
            current_status: self.record.status,
            attempted_event: SessionEvent::Download,
        };
        transition(self.record.status, SessionEvent::Download)?;

        let blob = self
            .record
            .result
            .as_ref()
            .and_then(|reference| self.registry.get(reference))
            .ok_or(rejection)?;
        let file = self.record.source_file.as_ref().ok_or(rejection)?;

        Ok(DownloadRequest {
            file_name: download_file_name(&file.name),
            bytes: blob.bytes.clone(),
        })
    }

    fn fail(&mut self, error: ProcessingError) {
        let status = match transition(self.record.status, SessionEvent::Fail) {
            Ok(status) => status,
            Err(rejection) => {
                warn!("{}", rejection);
                return;
            }
        };
        warn!("Processing failed: {}", error);
        self.release();
        self.record.status = status;
        self.record.error = Some(error);
    }

    /// Invalidate in-flight work and free the current record.
    fn replace_record(&mut self) {
        self.release();
        self.record = ImageRecord::default();
        self.generation = self.generation.next();
    }

    fn release(&mut self) {
        if let Some(preview) = self.record.preview.take() {
            self.registry.revoke(preview);
        }
        if let Some(result) = self.record.result.take() {
            self.registry.revoke(result);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
        if self.registry.live_count() > 0 {
            warn!(
                "{} references still live at teardown",
                self.registry.live_count()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    use crate::validator::MAX_FILE_SIZE_BYTES;

    fn jpeg(len: usize) -> SourceFile {
        SourceFile::new("photo.JPG", "image/jpeg", vec![0xFFu8; len])
    }

    fn png_result() -> ProcessedImage {
        ProcessedImage {
            bytes: Bytes::from_static(b"\x89PNG processed"),
            content_type: "image/png".to_string(),
        }
    }

    fn processing_session() -> (Session, RemovalTicket) {
        let mut session = Session::new();
        session.select(jpeg(2 * 1024 * 1024)).unwrap();
        let ticket = session.begin_processing().unwrap();
        (session, ticket)
    }

    #[test]
    fn test_oversized_file_fails_without_ticket() {
        let mut session = Session::new();
        let file = SourceFile::new(
            "huge.png",
            "image/png",
            vec![0u8; (MAX_FILE_SIZE_BYTES + 1) as usize],
        );

        let err = session.select(file).unwrap_err();

        assert_eq!(err.user_message(), "File is too large. Maximum size is 12MB.");
        assert_eq!(session.status(), ImageStatus::Failed);
        assert!(session.record().preview().is_none());
        assert!(session.record().source_file().is_none());
        assert_eq!(session.references().live_count(), 0);
        assert!(session.begin_processing().is_err());
    }

    #[test]
    fn test_invalid_type_and_missing_file() {
        let mut session = Session::new();

        let err = session
            .select(SourceFile::new("anim.gif", "image/gif", vec![1, 2, 3]))
            .unwrap_err();
        assert_eq!(
            session.record().error_message().as_deref(),
            Some("Invalid file type. Please upload JPG, PNG, or WebP images only.")
        );
        assert_eq!(err, ProcessingError::Validation(validator::Rejection::InvalidType));

        session.select(None).unwrap_err();
        assert_eq!(
            session.record().error_message().as_deref(),
            Some("No file selected.")
        );
    }

    #[test]
    fn test_accepted_file_previews_then_processes() {
        let mut session = Session::new();
        let generation = session.select(jpeg(128)).unwrap();

        assert_eq!(session.status(), ImageStatus::Previewing);
        let preview = session.record().preview().expect("preview allocated");
        assert_eq!(session.resolve(preview).unwrap().mime_type, "image/jpeg");
        assert_eq!(session.references().live_count(), 1);

        let ticket = session.begin_processing().unwrap();
        assert_eq!(ticket.generation(), generation);
        assert_eq!(ticket.file().name, "photo.JPG");
        assert_eq!(session.status(), ImageStatus::Processing);

        // Only one request per record
        assert!(session.begin_processing().is_err());
    }

    #[test]
    fn test_success_sets_result_and_clears_error() {
        let (mut session, ticket) = processing_session();

        let outcome = session.complete(ticket.generation(), Ok(png_result()));

        assert_eq!(outcome, Outcome::Applied(ImageStatus::Succeeded));
        let record = session.record();
        assert!(record.result().is_some());
        assert!(record.preview().is_some());
        assert!(record.error().is_none());
        assert_eq!(session.references().live_count(), 2);
    }

    #[test]
    fn test_remote_failure_releases_references() {
        let (mut session, ticket) = processing_session();
        let preview_id = session.record().preview().unwrap().id();

        let outcome = session.complete(
            ticket.generation(),
            Err(ProcessingError::remote("Invalid API key")),
        );

        assert_eq!(outcome, Outcome::Applied(ImageStatus::Failed));
        assert!(!session.references().contains(preview_id));
        assert!(session.record().preview().is_none());
        assert!(session.record().result().is_none());
        assert_eq!(
            session.record().error_message().as_deref(),
            Some("Failed to remove background: Invalid API key")
        );
    }

    #[test]
    fn test_timeout_is_a_failure() {
        let (mut session, ticket) = processing_session();

        session.complete(ticket.generation(), Err(ProcessingError::Timeout));

        assert_eq!(session.status(), ImageStatus::Failed);
        assert_eq!(
            session.record().error_message().as_deref(),
            Some("Request timeout. Please try again.")
        );
        assert_eq!(session.references().live_count(), 0);
    }

    #[test]
    fn test_late_success_after_timeout_is_ignored() {
        let (mut session, ticket) = processing_session();
        session.complete(ticket.generation(), Err(ProcessingError::Timeout));

        let outcome = session.complete(ticket.generation(), Ok(png_result()));

        assert_eq!(outcome, Outcome::Stale);
        assert_eq!(session.status(), ImageStatus::Failed);
        assert_eq!(session.references().live_count(), 0);
    }

    #[test]
    fn test_second_selection_supersedes_first_request() {
        let (mut session, first) = processing_session();
        let first_preview = session.record().preview().unwrap().id();

        session
            .select(SourceFile::new("second.png", "image/png", vec![7u8; 64]))
            .unwrap();
        let second = session.begin_processing().unwrap();

        assert!(!session.references().contains(first_preview));
        assert_ne!(first.generation(), second.generation());

        assert_eq!(
            session.complete(first.generation(), Ok(png_result())),
            Outcome::Stale
        );
        assert_eq!(session.status(), ImageStatus::Processing);
        assert_eq!(session.references().live_count(), 1);

        assert_eq!(
            session.complete(second.generation(), Ok(png_result())),
            Outcome::Applied(ImageStatus::Succeeded)
        );
        assert_eq!(
            session.record().source_file().map(|f| f.name.as_str()),
            Some("second.png")
        );
    }

    #[test]
    fn test_reset_after_success_releases_everything() {
        let (mut session, ticket) = processing_session();
        session.complete(ticket.generation(), Ok(png_result()));
        let result_id = session.record().result().unwrap().id();

        session.reset();

        assert_eq!(session.status(), ImageStatus::Idle);
        assert!(!session.references().contains(result_id));
        assert_eq!(session.references().live_count(), 0);
        assert!(session.record().source_file().is_none());
        assert!(session.record().error().is_none());
    }

    #[test]
    fn test_reset_while_processing_ignores_outcome() {
        let (mut session, ticket) = processing_session();
        session.reset();

        assert_eq!(
            session.complete(ticket.generation(), Err(ProcessingError::Unknown)),
            Outcome::Stale
        );
        assert_eq!(session.status(), ImageStatus::Idle);
        assert!(session.record().error().is_none());
    }

    #[test]
    fn test_retry_returns_to_idle() {
        let mut session = Session::new();
        session.select(None).unwrap_err();

        session.retry();

        assert_eq!(session.status(), ImageStatus::Idle);
        assert!(session.record().error().is_none());
    }

    #[test]
    fn test_download_only_after_success() {
        let (mut session, ticket) = processing_session();
        assert!(session.download().is_err());

        session.complete(ticket.generation(), Ok(png_result()));
        let request = session.download().unwrap();

        assert_eq!(request.file_name, "photo_nobg.png");
        assert_eq!(request.bytes, png_result().bytes);
        assert_eq!(session.status(), ImageStatus::Succeeded);
    }

    #[test]
    fn test_dropped_rejection_clears_only_if_current() {
        let mut session = Session::new();
        let generation = session.reject_dropped(DropRejection::FileTooLarge);

        assert_eq!(session.status(), ImageStatus::Failed);
        assert_eq!(
            session.record().error_message().as_deref(),
            Some("File is too large. Maximum size is 12MB.")
        );
        assert!(session.clear_dropped_rejection(generation));
        assert_eq!(session.status(), ImageStatus::Idle);

        let generation = session.reject_dropped(DropRejection::TooManyFiles);
        session.select(jpeg(16)).unwrap();
        assert!(!session.clear_dropped_rejection(generation));
        assert_eq!(session.status(), ImageStatus::Previewing);
    }

    #[test]
    fn test_snapshot_reflects_record() {
        let (mut session, ticket) = processing_session();
        let snapshot = session.snapshot();
        assert!(snapshot.is_processing());
        assert_eq!(snapshot.file_name.as_deref(), Some("photo.JPG"));
        assert_eq!(snapshot.file_size, Some(2 * 1024 * 1024));
        assert!(snapshot.preview_reference.unwrap().starts_with("blob:nobg/"));

        session.complete(ticket.generation(), Err(ProcessingError::Timeout));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, ImageStatus::Failed);
        assert_eq!(snapshot.error_kind, Some(crate::ErrorKind::Timeout));
        assert!(snapshot.preview_reference.is_none());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["errorMessage"], "Request timeout. Please try again.");
    }
}

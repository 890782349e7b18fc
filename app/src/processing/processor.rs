//! Imperative shell around [`Session`].
//!
//! The processor owns the session, runs the removal request raced against
//! [`PROCESSING_TIMEOUT`], and publishes a [`SessionSnapshot`] after every
//! change. The session lock is never held across an await.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use log::{debug, info, warn};
use nobg_session::{
    DownloadRequest, DropRejection, DropZone, Generation, Outcome, ProcessedImage,
    ProcessingError, RemovalTicket, Session, SessionSnapshot, SourceFile, TransitionRejection,
    DROP_REJECTION_DISPLAY,
};
use tokio::sync::watch;

use crate::clients::BackgroundRemover;
use crate::error::Error;

use super::files;

/// Deadline for one removal request
pub const PROCESSING_TIMEOUT: Duration = Duration::from_secs(60);

struct Shared {
    session: Mutex<Session>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl Shared {
    /// Run `f` against the session, then publish the resulting snapshot
    fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut session);
        self.snapshots.send_replace(session.snapshot());
        result
    }

    fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }
}

pub struct ImageProcessor {
    shared: Arc<Shared>,
    remover: Arc<dyn BackgroundRemover>,
    drop_zone: DropZone,
    timeout: Duration,
}

impl ImageProcessor {
    pub fn new(remover: Arc<dyn BackgroundRemover>) -> Self {
        let session = Session::new();
        let (snapshots, _) = watch::channel(session.snapshot());

        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                snapshots,
            }),
            remover,
            drop_zone: DropZone::default(),
            timeout: PROCESSING_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Receive a snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.read(Session::snapshot)
    }

    /// Select a file and, if it is accepted, process it.
    ///
    /// Resolves once this selection's request has settled. Returns
    /// [`Outcome::Stale`] if another selection or a reset replaced the record
    /// in the meantime; the late outcome is then discarded.
    pub async fn select(&self, file: impl Into<Option<SourceFile>>) -> Outcome {
        // Select and begin under one lock so no other selection can take this ticket
        let started = self.shared.update(|session| -> Result<RemovalTicket, Error> {
            session.select(file)?;
            Ok(session.begin_processing()?)
        });

        let ticket = match started {
            Ok(ticket) => ticket,
            Err(Error::Processing(e)) => {
                debug!("Selection not processed: {}", e);
                return Outcome::Applied(self.snapshot().status);
            }
            Err(e) => {
                warn!("{}", e);
                return Outcome::Applied(self.snapshot().status);
            }
        };

        let result = self.run_removal(ticket.file()).await;
        let outcome = self
            .shared
            .update(|session| session.complete(ticket.generation(), result));

        if outcome == Outcome::Stale {
            info!(
                "Discarded outcome of superseded request {}",
                ticket.generation()
            );
        }
        outcome
    }

    /// Files delivered by a drop or picker. Refusals from the drop zone are
    /// shown and then cleared after [`DROP_REJECTION_DISPLAY`].
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn drop_files(&self, files: Vec<SourceFile>) -> Outcome {
        match self.drop_zone.accept(files) {
            Ok(Some(file)) => self.select(file).await,
            Ok(None) => Outcome::Applied(self.snapshot().status),
            Err(rejection) => {
                self.reject_dropped(rejection);
                Outcome::Applied(self.snapshot().status)
            }
        }
    }

    /// Show a drop-zone refusal and schedule it to clear.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn reject_dropped(&self, rejection: DropRejection) -> Generation {
        let generation = self
            .shared
            .update(|session| session.reject_dropped(rejection));

        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            tokio::time::sleep(DROP_REJECTION_DISPLAY).await;
            if let Some(shared) = shared.upgrade() {
                shared.update(|session| session.clear_dropped_rejection(generation));
            }
        });

        generation
    }

    pub fn reset(&self) {
        self.shared.update(Session::reset);
    }

    pub fn retry(&self) {
        self.shared.update(Session::retry);
    }

    pub fn download(&self) -> Result<DownloadRequest, TransitionRejection> {
        self.shared.read(Session::download)
    }

    /// Write the processed image into `dir` under its download name.
    pub async fn download_to(&self, dir: &Path) -> Result<PathBuf, Error> {
        let request = self.download()?;
        let path = files::save_download(&request, dir).await?;
        info!("Saved {}", path.display());
        Ok(path)
    }

    async fn run_removal(&self, file: &SourceFile) -> Result<ProcessedImage, ProcessingError> {
        match tokio::time::timeout(self.timeout, self.remover.remove_background(file)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Removal of {} did not finish within {}s",
                    file.name,
                    self.timeout.as_secs()
                );
                Err(ProcessingError::Timeout)
            }
        }
    }
}

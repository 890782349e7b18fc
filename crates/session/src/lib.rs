//! Selection, validation and result lifecycle for background removal.
//!
//! This crate holds no I/O. A [`Session`] owns the one live image record and
//! every [`LocalReference`] allocated for it; the caller runs the network
//! request and the deadline, then reports back with [`Session::complete`].
//!
//! # Example
//!
//! ```
//! use nobg_session::{ImageStatus, ProcessedImage, Session, SourceFile};
//!
//! let mut session = Session::new();
//! session
//!     .select(SourceFile::new("photo.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF]))
//!     .expect("valid jpeg");
//! let ticket = session.begin_processing().expect("previewing");
//!
//! // ... send ticket.file() to the removal service ...
//! let processed = ProcessedImage {
//!     bytes: b"\x89PNG".as_slice().into(),
//!     content_type: "image/png".to_string(),
//! };
//! session.complete(ticket.generation(), Ok(processed));
//!
//! assert_eq!(session.status(), ImageStatus::Succeeded);
//! assert_eq!(session.download().unwrap().file_name, "photo_nobg.png");
//! ```

mod download;
mod dropzone;
mod error;
mod record;
mod references;
mod session;
mod state;
mod validator;

pub use download::{download_file_name, DownloadRequest, DOWNLOAD_SUFFIX};
pub use dropzone::{DropRejection, DropZone, DROP_REJECTION_DISPLAY};
pub use error::{ErrorKind, ProcessingError, REMOTE_ERROR_PREFIX};
pub use record::{ImageRecord, ProcessedImage, SessionSnapshot};
pub use references::{Blob, LocalReference, ReferenceRegistry};
pub use session::{Generation, Outcome, RemovalTicket, Session};
pub use state::{compute_transition, transition, ImageStatus, SessionEvent, TransitionRejection};
pub use validator::{
    is_accepted_mime_type, validate, validate_metadata, Rejection, SourceFile,
    ACCEPTED_MIME_TYPES, MAX_FILE_SIZE_BYTES,
};

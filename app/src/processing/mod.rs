mod events;
mod files;
mod processor;

// Public exports
pub use events::ImageStateChanged;
pub use files::{declared_mime_type, load_source_file, save_download};
pub use processor::{ImageProcessor, PROCESSING_TIMEOUT};

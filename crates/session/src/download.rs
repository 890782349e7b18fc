use bytes::Bytes;

/// Appended to the original stem of every saved result
pub const DOWNLOAD_SUFFIX: &str = "_nobg.png";

/// A processed image ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Build the save-as name for a processed image: `photo.JPG` becomes `photo_nobg.png`.
///
/// Only the last extension is stripped, and only when it sits in the final
/// path segment.
pub fn download_file_name(original: &str) -> String {
    format!("{}{}", strip_extension(original), DOWNLOAD_SUFFIX)
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() && !name[dot + 1..].contains('/') => &name[..dot],
        _ => name,
    }
}

use bytes::Bytes;
use thiserror::Error;

/// Largest image the removal service accepts (12 MiB)
pub const MAX_FILE_SIZE_BYTES: u64 = 12 * 1024 * 1024;

/// MIME types accepted for upload, compared case-insensitively
pub const ACCEPTED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// An image picked by the user, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Display name, usually the file name without directories
    pub name: String,
    /// MIME type declared for the payload
    pub mime_type: String,
    pub bytes: Bytes,
}

impl SourceFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Byte length of the payload
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Why a candidate file was refused before upload.
///
/// The `Display` output is the exact message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("No file selected.")]
    NoFile,
    #[error("File is too large. Maximum size is 12MB.")]
    TooLarge,
    #[error("Invalid file type. Please upload JPG, PNG, or WebP images only.")]
    InvalidType,
    #[error("Please upload one image at a time.")]
    TooManyFiles,
}

/// Validate a candidate file. The first failing rule wins.
pub fn validate(file: Option<&SourceFile>) -> Result<(), Rejection> {
    let file = file.ok_or(Rejection::NoFile)?;
    validate_metadata(file.size(), &file.mime_type)
}

/// Size and type rules on bare metadata, for callers that have not read the bytes yet.
pub fn validate_metadata(size_bytes: u64, mime_type: &str) -> Result<(), Rejection> {
    if size_bytes > MAX_FILE_SIZE_BYTES {
        return Err(Rejection::TooLarge);
    }

    if !is_accepted_mime_type(mime_type) {
        return Err(Rejection::InvalidType);
    }

    Ok(())
}

pub fn is_accepted_mime_type(mime_type: &str) -> bool {
    ACCEPTED_MIME_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(mime_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_metadata_rules() {
        let test_cases = vec![
            ("small jpeg", 2 * 1024 * 1024, "image/jpeg", Ok(())),
            ("jpg alias", 1024, "image/jpg", Ok(())),
            ("uppercase png", 1024, "IMAGE/PNG", Ok(())),
            ("webp", 1024, "image/webp", Ok(())),
            ("exactly 12MiB", MAX_FILE_SIZE_BYTES, "image/png", Ok(())),
            (
                "one byte over",
                MAX_FILE_SIZE_BYTES + 1,
                "image/png",
                Err(Rejection::TooLarge),
            ),
            ("gif", 1024, "image/gif", Err(Rejection::InvalidType)),
            ("empty type", 1024, "", Err(Rejection::InvalidType)),
            (
                "type with parameters",
                1024,
                "image/png; charset=binary",
                Err(Rejection::InvalidType),
            ),
            ("prefix only", 1024, "image/pn", Err(Rejection::InvalidType)),
            (
                "size checked before type",
                MAX_FILE_SIZE_BYTES + 1,
                "application/pdf",
                Err(Rejection::TooLarge),
            ),
        ];

        for (description, size, mime, expected) in test_cases {
            assert_eq!(
                validate_metadata(size, mime),
                expected,
                "{}: unexpected verdict",
                description
            );
        }
    }

    #[test]
    fn test_missing_file_is_rejected_first() {
        assert_eq!(validate(None), Err(Rejection::NoFile));
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(Rejection::NoFile.to_string(), "No file selected.");
        assert_eq!(
            Rejection::TooLarge.to_string(),
            "File is too large. Maximum size is 12MB."
        );
        assert_eq!(
            Rejection::InvalidType.to_string(),
            "Invalid file type. Please upload JPG, PNG, or WebP images only."
        );
    }

    #[test]
    fn test_validate_uses_payload_length() {
        let file = SourceFile::new("big.png", "image/png", vec![0u8; 15 * 1024 * 1024]);
        assert_eq!(file.size(), 15 * 1024 * 1024);
        assert_eq!(validate(Some(&file)), Err(Rejection::TooLarge));

        let file = SourceFile::new("ok.webp", "image/webp", vec![0u8; 64]);
        assert_eq!(validate(Some(&file)), Ok(()));
    }
}

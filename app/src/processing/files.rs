//! Reading picked images from disk and writing processed ones back.

use std::io;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use log::debug;
use nobg_session::{DownloadRequest, SourceFile};

/// Declared type for content that is neither sniffable nor has a known extension
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Load a file the way a picker would hand it over: name, declared type, bytes.
pub async fn load_source_file(path: &Path) -> io::Result<SourceFile> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let mime_type = declared_mime_type(path, &bytes);

    debug!(
        "Loaded {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        mime_type
    );
    Ok(SourceFile::new(name, mime_type, bytes))
}

/// MIME type from the content signature, else from the extension.
pub fn declared_mime_type(path: &Path, bytes: &[u8]) -> String {
    image::guess_format(bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| FALLBACK_MIME_TYPE.to_string())
}

/// Write a processed image into `dir`, creating the directory if needed.
pub async fn save_download(request: &DownloadRequest, dir: &Path) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(&request.file_name);
    tokio::fs::write(&path, &request.bytes).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG_SIGNATURE: &[u8] = b"\xFF\xD8\xFF\xE0\0\x10JFIF";

    #[test]
    fn test_declared_mime_type() {
        let test_cases = vec![
            ("sniffed png", "photo.jpg", PNG_SIGNATURE, "image/png"),
            ("sniffed jpeg", "photo", JPEG_SIGNATURE, "image/jpeg"),
            ("extension fallback", "photo.webp", b"????".as_slice(), "image/webp"),
            (
                "unknown content",
                "notes.txt",
                b"hello".as_slice(),
                FALLBACK_MIME_TYPE,
            ),
        ];

        for (description, name, bytes, expected) in test_cases {
            assert_eq!(
                declared_mime_type(Path::new(name), bytes),
                expected,
                "{}",
                description
            );
        }
    }

    #[tokio::test]
    async fn test_load_and_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Holiday.PNG");
        std::fs::write(&input, PNG_SIGNATURE).unwrap();

        let file = load_source_file(&input).await.unwrap();
        assert_eq!(file.name, "Holiday.PNG");
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.size(), PNG_SIGNATURE.len() as u64);

        let request = DownloadRequest {
            file_name: nobg_session::download_file_name(&file.name),
            bytes: file.bytes.clone(),
        };
        let saved = save_download(&request, &dir.path().join("out")).await.unwrap();
        assert_eq!(saved.file_name().unwrap(), "Holiday_nobg.png");
        assert_eq!(std::fs::read(saved).unwrap(), PNG_SIGNATURE);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_source_file(&dir.path().join("absent.jpg"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

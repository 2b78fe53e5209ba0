//! Self-contained image encoding
//!
//! Uploaded images are stored inline as `data:<mime>;base64,<payload>`
//! strings, so a collection never points at files outside the store.

use base64::{engine::general_purpose, Engine as _};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use crate::error::{GalleryError, Result};

/// Extensions accepted as images (the `image/*` filter)
pub const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

/// What the admin sees when any file in a batch could not be encoded
pub const UPLOAD_FAILED: &str = "Error uploading files. Please try again.";

/// An image file turned into its stored form
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFile {
    pub name: String,
    pub data_url: String,
}

/// Result of encoding a batch of files in order
///
/// Encoding stops at the first failure; everything before it is kept.
#[derive(Debug, Clone, Default)]
pub struct EncodedBatch {
    pub files: Vec<EncodedFile>,
    pub failure: Option<String>,
}

/// Display name of a selected file
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Whether `path` has an image extension
pub fn is_image(path: &Path) -> bool {
    match path.extension() {
        Some(extension) => {
            let ext = extension.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Build a data URL from raw bytes
pub fn encode_bytes(name: &str, bytes: &[u8]) -> String {
    let mime = mime_guess::from_path(name).first_or_octet_stream();
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}

/// Read one image file and encode it
pub fn encode_file(path: &Path) -> Result<EncodedFile> {
    let name = file_name(path);
    if !is_image(path) {
        return Err(GalleryError::UnsupportedImage { name });
    }

    let bytes = std::fs::read(path).map_err(|source| GalleryError::Encode {
        name: name.clone(),
        source,
    })?;

    debug!("Encoded {} ({} bytes)", name, bytes.len());

    Ok(EncodedFile {
        data_url: encode_bytes(&name, &bytes),
        name,
    })
}

/// Encode files one after another, stopping at the first failure.
///
/// The cause is only logged; the batch carries the generic upload message.
pub fn encode_batch(paths: &[PathBuf]) -> EncodedBatch {
    let mut batch = EncodedBatch::default();
    for path in paths {
        match encode_file(path) {
            Ok(file) => batch.files.push(file),
            Err(e) => {
                warn!("⚠️  Could not encode {}: {}", path.display(), e);
                batch.failure = Some(UPLOAD_FAILED.to_string());
                break;
            }
        }
    }
    batch
}

/// `encode_batch` on a blocking thread
pub async fn encode_files(paths: Vec<PathBuf>) -> EncodedBatch {
    tokio::task::spawn_blocking(move || encode_batch(&paths))
        .await
        .unwrap_or_else(|e| {
            error!("Task join error: {}", e);
            EncodedBatch {
                files: Vec::new(),
                failure: Some(UPLOAD_FAILED.to_string()),
            }
        })
}

/// Split a data URL back into its MIME type and bytes
pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>)> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| GalleryError::Decode("missing data: prefix".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| GalleryError::Decode("missing payload".to_string()))?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| GalleryError::Decode("not base64 encoded".to_string()))?;

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| GalleryError::Decode(e.to_string()))?;

    Ok((mime.to_string(), bytes))
}

/// Collect every image under `folder`, sorted by path
pub fn scan_folder(folder: &Path) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_image(path))
        .collect();

    images.sort();
    images
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let url = encode_bytes("photo.jpg", &[0xFF, 0xD8, 0xFF, 0xD9]);
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_data_url("https://example.com/a.jpg").is_err());
        assert!(decode_data_url("data:image/png;base64").is_err());
        assert!(decode_data_url("data:image/png,raw").is_err());
        assert!(decode_data_url("data:image/png;base64,***").is_err());
    }

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("a.JPG")));
        assert!(is_image(Path::new("dir/b.webp")));
        assert!(!is_image(Path::new("notes.txt")));
        assert!(!is_image(Path::new("README")));
    }

    #[test]
    fn test_encode_file_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        std::fs::write(&path, b"png-bytes").unwrap();

        let encoded = encode_file(&path).unwrap();
        assert_eq!(encoded.name, "shot.png");
        let (mime, bytes) = decode_data_url(&encoded.data_url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"png-bytes");
    }

    #[test]
    fn test_encode_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = encode_file(&dir.path().join("gone.jpg")).unwrap_err();
        assert!(matches!(err, GalleryError::Encode { .. }));
    }

    #[test]
    fn test_encode_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hi").unwrap();
        assert!(matches!(encode_file(&path), Err(GalleryError::UnsupportedImage { .. })));
    }

    #[test]
    fn test_scan_folder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("day2")).unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"b").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("day2").join("a.png"), b"a").unwrap();

        let found = scan_folder(dir.path());
        let names: Vec<String> = found.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["b.jpg", "a.png"]);
    }

    #[tokio::test]
    async fn test_encode_files_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("one.jpg");
        let also_good = dir.path().join("three.jpg");
        std::fs::write(&good, b"1").unwrap();
        std::fs::write(&also_good, b"3").unwrap();

        let batch = encode_files(vec![good, dir.path().join("two.jpg"), also_good]).await;
        assert_eq!(batch.files.len(), 1);
        assert_eq!(batch.files[0].name, "one.jpg");
        assert_eq!(batch.failure.as_deref(), Some("Error uploading files. Please try again."));
    }

    #[test]
    fn test_non_image_in_batch_gets_generic_message() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("keep.png");
        let notes = dir.path().join("notes.txt");
        std::fs::write(&photo, b"p").unwrap();
        std::fs::write(&notes, b"n").unwrap();

        let batch = encode_batch(&[photo, notes]);
        assert_eq!(batch.files.len(), 1);
        assert_eq!(batch.failure.as_deref(), Some(UPLOAD_FAILED));
        assert!(!batch.failure.unwrap().contains("notes.txt"));
    }
}

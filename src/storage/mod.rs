//! Upload file storage
//!
//! Product images and payment slips live as flat files under
//! `work_dir/uploads`, addressed by a generated filename. Product images
//! are recompressed to JPEG before storage; payment slips are kept
//! byte-for-byte as uploaded.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use uuid::Uuid;

use crate::utils::{AppError, AppResult};

/// Maximum upload size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// JPEG quality for product images
const JPEG_QUALITY: u8 = 85;

/// File storage rooted at the uploads directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    uploads_dir: PathBuf,
}

impl FileStorage {
    pub fn new(uploads_dir: PathBuf) -> Self {
        Self { uploads_dir }
    }

    /// Store raw bytes under a fresh name, returning the stored filename
    pub async fn save_bytes(&self, data: &[u8], ext: &str) -> AppResult<String> {
        if data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::validation(format!(
                "File too large, maximum is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }

        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        let path = self.uploads_dir.join(&filename);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::internal(format!("Failed to store upload: {}", e)))?;
        Ok(filename)
    }

    /// Decode, recompress to JPEG and store a product image
    pub async fn save_product_image(&self, data: &[u8]) -> AppResult<String> {
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::validation(format!(
                "Image too large, maximum is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }

        let img = image::load_from_memory(data)
            .map_err(|e| AppError::validation(format!("Invalid image: {}", e)))?;
        let compressed = compress_to_jpeg(&img)?;
        self.save_bytes(&compressed, "jpg").await
    }

    /// Read a stored file back; rejects anything that is not a bare
    /// filename so a crafted path cannot escape the uploads directory
    pub async fn read(&self, filename: &str) -> AppResult<Vec<u8>> {
        if !is_safe_filename(filename) {
            return Err(AppError::not_found(format!("File {} not found", filename)));
        }
        let path = self.uploads_dir.join(filename);
        tokio::fs::read(&path)
            .await
            .map_err(|_| AppError::not_found(format!("File {} not found", filename)))
    }

    /// Best guess at a stored file's mime type
    pub fn mime_for(&self, filename: &str) -> String {
        mime_guess::from_path(Path::new(filename))
            .first_or_octet_stream()
            .to_string()
    }
}

fn compress_to_jpeg(img: &DynamicImage) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    let rgb = img.to_rgb8();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| AppError::internal(format!("Failed to compress image: {}", e)))?;
    Ok(buffer)
}

fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());

        let filename = storage.save_bytes(b"slip bytes", "png").await.unwrap();
        assert!(filename.ends_with(".png"));

        let back = storage.read(&filename).await.unwrap();
        assert_eq!(back, b"slip bytes");
    }

    #[tokio::test]
    async fn rejects_traversal_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());

        assert!(storage.read("../etc/passwd").await.is_err());
        assert!(storage.read("a/b.png").await.is_err());
        assert!(storage.read("").await.is_err());
    }

    #[tokio::test]
    async fn rejects_empty_upload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());
        assert!(storage.save_bytes(b"", "png").await.is_err());
    }

    #[test]
    fn guesses_mime_from_extension() {
        let storage = FileStorage::new(PathBuf::from("/tmp"));
        assert_eq!(storage.mime_for("a.png"), "image/png");
        assert_eq!(storage.mime_for("a.jpg"), "image/jpeg");
    }
}

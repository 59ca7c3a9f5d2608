//! File storage collaborator: receives uploaded bytes, validates them, writes
//! them under the upload directory and returns the stored filename. Callers
//! persist that filename as a plain string and never interpret file contents.

use std::path::PathBuf;

use uuid::Uuid;

use crate::error::AppError;

/// Upload payload cap; bytes are held in memory only for the request duration.
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

fn validate_image_magic_bytes(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 4 {
        return None;
    }
    match bytes {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        // GIF: 47 49 46 38
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        // WebP: 52 49 46 46 ... 57 45 42 50
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

/// Disk-backed upload store.
#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Validate and persist one uploaded file, returning the stored filename.
    ///
    /// The stored name is UUID-derived, so the original name is only consulted
    /// for its extension and can never traverse out of the upload directory.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, AppError> {
        if bytes.is_empty() {
            return Err(AppError::Validation("Empty file".to_string()));
        }
        if bytes.len() > MAX_FILE_SIZE {
            return Err(AppError::Validation(
                "File too large. Maximum size is 5MB.".to_string(),
            ));
        }

        let original_ext = original_name
            .rsplit('.')
            .next()
            .unwrap_or("")
            .to_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&original_ext.as_str()) {
            return Err(AppError::Validation(
                "Unsupported file type. Allowed: JPEG, PNG, WebP, GIF.".to_string(),
            ));
        }

        let mime = validate_image_magic_bytes(bytes).ok_or_else(|| {
            AppError::Validation("File content does not match an allowed image type.".to_string())
        })?;

        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = format!("{}.{}", Uuid::new_v4(), extension_for_mime(mime));
        tokio::fs::write(self.dir.join(&filename), bytes).await?;

        tracing::info!("Stored upload {} ({} bytes)", filename, bytes.len());
        Ok(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn temp_store() -> UploadStore {
        let dir = std::env::temp_dir().join(format!("clinic-uploads-{}", Uuid::new_v4()));
        UploadStore::new(dir)
    }

    #[tokio::test]
    async fn test_store_accepts_png_and_renames() {
        let store = temp_store();
        let name = store.store("photo.png", PNG_HEADER).await.unwrap();
        assert!(name.ends_with(".png"));
        assert_ne!(name, "photo.png");
        assert!(store.dir.join(&name).exists());
    }

    #[tokio::test]
    async fn test_store_rejects_empty_file() {
        let err = temp_store().store("photo.png", &[]).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_rejects_disallowed_extension() {
        let err = temp_store().store("script.exe", PNG_HEADER).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_rejects_mismatched_content() {
        // .png extension but not PNG bytes.
        let err = temp_store()
            .store("fake.png", b"GIF-but-not-really")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_rejects_oversized_file() {
        let mut big = PNG_HEADER.to_vec();
        big.resize(MAX_FILE_SIZE + 1, 0);
        let err = temp_store().store("big.png", &big).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_magic_bytes_detection() {
        assert_eq!(validate_image_magic_bytes(PNG_HEADER), Some("image/png"));
        assert_eq!(
            validate_image_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some("image/jpeg")
        );
        assert_eq!(validate_image_magic_bytes(b"GIF89a"), Some("image/gif"));
        assert_eq!(validate_image_magic_bytes(b"ordinary text"), None);
    }
}

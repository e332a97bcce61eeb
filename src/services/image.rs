use crate::constants::uploads::{FALLBACK_EXTENSION, IMAGE_EXTENSIONS, PUBLIC_PREFIX};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// An image part taken from the submission form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Content-addressed sink for uploaded images.
///
/// Files are named after the blake3 hash of their bytes, so identical uploads
/// share one file and different uploads can never overwrite each other.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persists the upload and returns its public relative reference,
    /// e.g. `uploads/<hash>.jpg`.
    pub async fn save(&self, upload: &ImageUpload) -> Result<String> {
        let filename = format!(
            "{}.{}",
            content_address(&upload.bytes),
            extension_of(&upload.filename)
        );

        if !self.root.exists() {
            fs::create_dir_all(&self.root)
                .await
                .with_context(|| format!("Failed to create {}", self.root.display()))?;
        }

        let file_path = self.root.join(&filename);

        if fs::try_exists(&file_path).await.unwrap_or(false) {
            debug!(path = %file_path.display(), "Image already stored");
        } else {
            // Write beside the target then rename so readers never see a partial file.
            let tmp_path = self
                .root
                .join(format!(".{filename}.{}.tmp", uuid::Uuid::new_v4()));
            fs::write(&tmp_path, &upload.bytes)
                .await
                .with_context(|| format!("Failed to write image to {}", tmp_path.display()))?;
            fs::rename(&tmp_path, &file_path)
                .await
                .with_context(|| format!("Failed to move image to {}", file_path.display()))?;

            info!(
                path = %file_path.display(),
                bytes = upload.bytes.len(),
                "Stored uploaded image"
            );
        }

        Ok(format!("{PUBLIC_PREFIX}/{filename}"))
    }
}

#[must_use]
pub fn content_address(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Lowercased extension of the client filename when it names a raster image
/// format, otherwise the fallback.
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("zamculture-images-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), "jpg");
        assert_eq!(extension_of("dancers.webp"), "webp");
        assert_eq!(extension_of("noext"), "bin");
        assert_eq!(extension_of("weird.p/n"), "bin");
        assert_eq!(extension_of("../../etc/passwd.png"), "png");
    }

    #[test]
    fn test_active_content_extensions_fall_back() {
        for name in ["x.html", "x.svg", "x.htm", "x.js", "archive.tar.gz", "x.png.html"] {
            assert_eq!(extension_of(name), "bin", "{name}");
        }
    }

    #[tokio::test]
    async fn test_identical_bytes_share_one_file() {
        let store = ImageStore::new(temp_root());
        let a = ImageUpload {
            filename: "festival.jpg".to_string(),
            bytes: b"same-bytes".to_vec(),
        };
        let b = ImageUpload {
            filename: "copy.jpg".to_string(),
            bytes: b"same-bytes".to_vec(),
        };

        let first = store.save(&a).await.unwrap();
        let second = store.save(&b).await.unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("uploads/"));
        assert!(first.ends_with(".jpg"));

        let _ = std::fs::remove_dir_all(store.root());
    }

    #[tokio::test]
    async fn test_same_name_different_bytes_do_not_overwrite() {
        let store = ImageStore::new(temp_root());
        let first = store
            .save(&ImageUpload {
                filename: "photo.png".to_string(),
                bytes: b"one".to_vec(),
            })
            .await
            .unwrap();
        let second = store
            .save(&ImageUpload {
                filename: "photo.png".to_string(),
                bytes: b"two".to_vec(),
            })
            .await
            .unwrap();

        assert_ne!(first, second);
        let name = first.trim_start_matches("uploads/");
        let on_disk = std::fs::read(store.root().join(name)).unwrap();
        assert_eq!(on_disk, b"one");

        let _ = std::fs::remove_dir_all(store.root());
    }
}

//! Disk-backed content store for uploaded documents.
//!
//! Files land under a single root that is also served read-only at `/uploads`.
//! Names are unique per write (field, epoch millis, random suffix), so
//! concurrent requests never contend for a path.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use chrono::Utc;
use rand::Rng;

use crate::prelude::Result;

pub const PUBLIC_PREFIX: &str = "/uploads";
pub const PDF_MIME: &str = "application/pdf";
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// A file part that passed upload validation, held in memory until stored.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        UploadStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Writes the file under a fresh unique name and returns its storage path.
    pub async fn store(&self, file: &UploadedFile) -> Result<String> {
        let path = self.root.join(unique_name(&file.field, &file.file_name));
        tokio::fs::write(&path, &file.data).await?;
        tracing::debug!("stored {} ({} bytes)", path.display(), file.data.len());
        Ok(path.to_string_lossy().into_owned())
    }

    /// Best-effort removal; failures are logged and otherwise ignored.
    pub async fn discard(&self, paths: &[String]) {
        for path in paths {
            if let Err(e) = tokio::fs::remove_file(path).await {
                tracing::warn!("could not remove orphaned upload {}: {}", path, e);
            }
        }
    }
}

/// Client-facing path of a stored file, e.g. `/uploads/offerLetter-1-2.pdf`.
pub fn public_path(stored: &str) -> String {
    let name = Path::new(stored)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}/{}", PUBLIC_PREFIX, name)
}

fn unique_name(field: &str, original: &str) -> String {
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!(
        "{}-{}-{}{}",
        field,
        Utc::now().timestamp_millis(),
        suffix,
        extension(original)
    )
}

/// Extension of the client file name including the dot, or empty. Anything that
/// is not plain alphanumerics is dropped so it cannot escape the root.
fn extension(original: &str) -> String {
    Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(field: &str) -> UploadedFile {
        UploadedFile {
            field: field.into(),
            file_name: "marks memo.pdf".into(),
            content_type: PDF_MIME.into(),
            data: Bytes::from_static(b"%PDF-1.4 test"),
        }
    }

    #[test]
    fn names_keep_field_and_extension() {
        let name = unique_name("sscDoc", "certificate.PDF");
        assert!(name.starts_with("sscDoc-"));
        assert!(name.ends_with(".PDF"));
        assert_eq!(name.matches('-').count(), 2);
    }

    #[test]
    fn suspicious_extensions_are_dropped() {
        assert_eq!(extension("a.pdf"), ".pdf");
        assert_eq!(extension("noext"), "");
        assert_eq!(extension("x.p/df"), "");
        assert_eq!(extension("weird.p df"), "");
    }

    #[test]
    fn public_path_strips_storage_root() {
        assert_eq!(
            public_path("/srv/app/uploads/offerLetter-1700000000000-42.pdf"),
            "/uploads/offerLetter-1700000000000-42.pdf"
        );
    }

    #[tokio::test]
    async fn store_and_discard_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"));
        store.ensure_root().await.unwrap();

        let a = store.store(&pdf("sscDoc")).await.unwrap();
        let b = store.store(&pdf("sscDoc")).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(tokio::fs::read(&a).await.unwrap(), b"%PDF-1.4 test");

        store.discard(&[a.clone(), b.clone()]).await;
        assert!(!Path::new(&a).exists());
        assert!(!Path::new(&b).exists());
    }
}

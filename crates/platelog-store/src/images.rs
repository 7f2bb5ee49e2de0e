//! Uploads image store.
//!
//! Uploaded captures are persisted under a single directory with names
//! derived from the capture timestamp at second resolution. Two uploads
//! within the same second collide on the same name; known edge case, not
//! handled.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::fs;
use tracing::{debug, warn};

use platelog_core::defaults::CAPTURE_STAMP_FORMAT;
use platelog_core::{Error, Result};

/// Storage for uploaded capture images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `data` under `filename`, creating the directory if needed.
    async fn save(&self, filename: &str, data: &[u8]) -> Result<()>;

    /// Read a stored image back. `Error::NotFound` when absent.
    async fn open(&self, filename: &str) -> Result<Vec<u8>>;

    /// Delete a stored image. Deleting a missing file is not an error.
    async fn delete(&self, filename: &str) -> Result<()>;
}

/// File name for a capture taken at `now`: `plate_<YYYYMMDD_HHMMSS>.jpg`.
pub fn capture_filename(now: DateTime<Local>) -> String {
    format!("plate_{}.jpg", now.format(CAPTURE_STAMP_FORMAT))
}

/// [`ImageStore`] backed by one directory on disk.
pub struct DirImageStore {
    base: PathBuf,
}

impl DirImageStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolve `filename` under the base directory, rejecting anything that
    /// is not a bare file name (path separators, `..`, empty).
    fn resolve(&self, filename: &str) -> Result<PathBuf> {
        if filename.is_empty()
            || filename == ".."
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(Error::NotFound(filename.to_string()));
        }
        Ok(self.base.join(filename))
    }
}

#[async_trait]
impl ImageStore for DirImageStore {
    async fn save(&self, filename: &str, data: &[u8]) -> Result<()> {
        let path = self.resolve(filename)?;
        fs::create_dir_all(&self.base)
            .await
            .map_err(|e| Error::Image(format!("create {:?}: {}", self.base, e)))?;
        fs::write(&path, data)
            .await
            .map_err(|e| Error::Image(format!("write {:?}: {}", path, e)))?;
        debug!(filename, bytes = data.len(), "Stored capture image");
        Ok(())
    }

    async fn open(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.resolve(filename)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(filename.to_string()))
            }
            Err(e) => Err(Error::Image(format!("read {:?}: {}", path, e))),
        }
    }

    async fn delete(&self, filename: &str) -> Result<()> {
        let path = self.resolve(filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(filename, "Image already gone at delete");
                Ok(())
            }
            Err(e) => Err(Error::Image(format!("delete {:?}: {}", path, e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_capture_filename_format() {
        let ts = Local.with_ymd_and_hms(2026, 8, 6, 9, 30, 5).unwrap();
        assert_eq!(capture_filename(ts), "plate_20260806_093005.jpg");
    }

    #[tokio::test]
    async fn test_save_and_open_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = DirImageStore::new(dir.path().join("uploads"));

        store.save("plate_1.jpg", b"jpegdata").await.unwrap();
        let data = store.open("plate_1.jpg").await.unwrap();
        assert_eq!(data, b"jpegdata");
    }

    #[tokio::test]
    async fn test_open_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = DirImageStore::new(dir.path());

        match store.open("nope.jpg").await {
            Err(Error::NotFound(name)) => assert_eq!(name, "nope.jpg"),
            other => panic!("expected NotFound, got {:?}", other.map(|d| d.len())),
        }
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let dir = TempDir::new().unwrap();
        let store = DirImageStore::new(dir.path());

        store.save("plate_1.jpg", b"x").await.unwrap();
        store.delete("plate_1.jpg").await.unwrap();
        assert!(store.open("plate_1.jpg").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_of_missing_file_succeeds() {
        let dir = TempDir::new().unwrap();
        let store = DirImageStore::new(dir.path());
        store.delete("ghost.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn test_traversal_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = DirImageStore::new(dir.path());

        for name in ["../secret", "a/b.jpg", "..\\win", "", ".."] {
            assert!(
                matches!(store.open(name).await, Err(Error::NotFound(_))),
                "{name:?} should be rejected"
            );
        }
    }
}

//! Local image storage for imported photos.
//!
//! Imported photos are copied verbatim into a dedicated directory under the
//! file-storage root, each under a fresh random name. Deletion is
//! best-effort and reports an explicit outcome instead of raising.

use crate::constants::{IMAGES_SUBDIR, IMAGE_FILE_EXTENSION};
use crate::errors::AppResult;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Outcome of a best-effort file deletion.
///
/// Implements the explicit three-way result for swallow-and-continue
/// cleanup: the caller's flow proceeds in every case, but a `Failed` outcome
/// keeps the cause available for logging.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// A file existed and was removed.
    Removed,
    /// Nothing to do: blank path, or no file at the path.
    Missing,
    /// A file may exist but could not be removed.
    Failed(io::Error),
}

impl DeleteOutcome {
    /// Whether a file was actually removed.
    pub fn removed(&self) -> bool {
        matches!(self, DeleteOutcome::Removed)
    }
}

/// Persists imported photos under the file-storage root.
#[derive(Debug, Clone)]
pub struct ImageStore {
    images_dir: PathBuf,
}

impl ImageStore {
    /// Creates a store rooted at `<files_dir>/images`.
    pub fn new(files_dir: &Path) -> Self {
        ImageStore {
            images_dir: files_dir.join(IMAGES_SUBDIR),
        }
    }

    /// Directory the store writes into.
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Copies a readable image source into the store under a fresh name.
    ///
    /// The image directory is created if absent. Returns the path of the
    /// stored file; the caller records it on the entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or the destination
    /// cannot be written.
    pub fn persist(&self, source: &mut impl Read) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.images_dir)?;

        let name = format!("{}.{}", Uuid::new_v4(), IMAGE_FILE_EXTENSION);
        let dest = self.images_dir.join(name);

        let mut out = File::create(&dest)?;
        let bytes = io::copy(source, &mut out)?;
        out.sync_all()?;

        debug!("Persisted image {:?} ({} bytes)", dest, bytes);
        Ok(dest)
    }

    /// Attempts to delete a stored image file.
    ///
    /// A blank or absent path is a no-op. Filesystem errors are swallowed
    /// into the outcome; deletion failure is never fatal to the caller's
    /// flow.
    pub fn delete_file(&self, path: Option<&Path>) -> DeleteOutcome {
        let path = match path {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => return DeleteOutcome::Missing,
        };

        if !path.exists() {
            return DeleteOutcome::Missing;
        }

        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Deleted image {:?}", path);
                DeleteOutcome::Removed
            }
            Err(e) => {
                warn!("Failed to delete image {:?}: {}", path, e);
                DeleteOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_persist_writes_source_verbatim() {
        let temp = TempDir::new().unwrap();
        let store = ImageStore::new(temp.path());

        let payload = b"\xFF\xD8\xFF jpeg-ish bytes".to_vec();
        let path = store.persist(&mut Cursor::new(payload.clone())).unwrap();

        assert!(path.starts_with(temp.path().join("images")));
        assert_eq!(fs::read(&path).unwrap(), payload);
    }

    #[test]
    fn test_persist_generates_unique_names() {
        let temp = TempDir::new().unwrap();
        let store = ImageStore::new(temp.path());

        let a = store.persist(&mut Cursor::new(b"a".to_vec())).unwrap();
        let b = store.persist(&mut Cursor::new(b"b".to_vec())).unwrap();

        assert_ne!(a, b);
        assert!(a.exists());
        assert!(b.exists());
    }

    #[test]
    fn test_delete_file_removes_existing() {
        let temp = TempDir::new().unwrap();
        let store = ImageStore::new(temp.path());

        let path = store.persist(&mut Cursor::new(b"x".to_vec())).unwrap();
        let outcome = store.delete_file(Some(&path));

        assert!(outcome.removed());
        assert!(!path.exists());
    }

    #[test]
    fn test_delete_file_missing_path_is_noop() {
        let temp = TempDir::new().unwrap();
        let store = ImageStore::new(temp.path());

        let outcome = store.delete_file(Some(Path::new("/nonexistent/image.jpg")));
        assert!(!outcome.removed());
        assert!(matches!(outcome, DeleteOutcome::Missing));
    }

    #[test]
    fn test_delete_file_blank_path_is_noop() {
        let temp = TempDir::new().unwrap();
        let store = ImageStore::new(temp.path());

        assert!(!store.delete_file(None).removed());
        assert!(!store.delete_file(Some(Path::new(""))).removed());
    }
}

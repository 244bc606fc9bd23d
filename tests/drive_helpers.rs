//! Shared in-memory drive session for backup integration tests.
//!
//! Implements the `DriveSession` contract over a process-local object list.
//! Upload order determines modification times; `list` deliberately returns
//! results unsorted so tests exercise the engine's defensive re-sort.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use minimalog::{DriveError, DriveSession, DriveSessionFactory, ListQuery, RemoteFile};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory stand-in for a provider's app-private folder.
pub struct InMemoryDrive {
    objects: Mutex<Vec<(RemoteFile, Vec<u8>)>>,
    clock: AtomicI64,
    /// When set, downloads write a zero-byte file regardless of content.
    pub serve_empty: AtomicBool,
}

impl InMemoryDrive {
    pub fn new() -> Arc<Self> {
        Arc::new(InMemoryDrive {
            objects: Mutex::new(Vec::new()),
            clock: AtomicI64::new(0),
            serve_empty: AtomicBool::new(false),
        })
    }

    fn next_modified(&self) -> DateTime<Utc> {
        let tick = self.clock.fetch_add(1, Ordering::SeqCst);
        Utc.with_ymd_and_hms(2025, 9, 20, 9, 0, 0).unwrap() + Duration::seconds(tick)
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Stores an object directly, bypassing the upload path. Later seeds get
    /// later modification times.
    pub fn seed_object(&self, name: &str, mime_type: &str, bytes: Vec<u8>) -> RemoteFile {
        let mut objects = self.objects.lock().unwrap();
        let remote = RemoteFile {
            id: format!("obj-{}", objects.len() + 1),
            name: name.to_string(),
            modified: self.next_modified(),
            size: bytes.len() as u64,
            mime_type: mime_type.to_string(),
        };
        objects.push((remote.clone(), bytes));
        remote
    }
}

#[async_trait]
impl DriveSession for InMemoryDrive {
    async fn list(&self, query: &ListQuery) -> Result<Vec<RemoteFile>, DriveError> {
        let objects = self.objects.lock().unwrap();
        let matches: Vec<RemoteFile> = objects
            .iter()
            .filter(|(remote, _)| {
                remote.name.contains(&query.name_contains)
                    && query.mime_types.contains(&remote.mime_type)
            })
            .map(|(remote, _)| remote.clone())
            .take(query.page_size)
            .collect();
        Ok(matches)
    }

    async fn upload(
        &self,
        name: &str,
        mime_type: &str,
        content: &Path,
    ) -> Result<RemoteFile, DriveError> {
        let bytes = fs::read(content).map_err(DriveError::Io)?;
        Ok(self.seed_object(name, mime_type, bytes))
    }

    async fn download(&self, id: &str, dest: &Path) -> Result<(), DriveError> {
        if self.serve_empty.load(Ordering::SeqCst) {
            fs::write(dest, b"").map_err(DriveError::Io)?;
            return Ok(());
        }

        let objects = self.objects.lock().unwrap();
        let bytes = objects
            .iter()
            .find(|(remote, _)| remote.id == id)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| DriveError::Transport(format!("no object with id {}", id)))?;
        drop(objects);

        fs::write(dest, bytes).map_err(DriveError::Io)?;
        Ok(())
    }
}

/// Factory handing out the shared in-memory session.
pub struct InMemoryDriveFactory {
    pub drive: Arc<InMemoryDrive>,
    /// When set, session creation fails like an expired sign-in.
    pub fail_auth: AtomicBool,
}

impl InMemoryDriveFactory {
    pub fn new(drive: Arc<InMemoryDrive>) -> Self {
        InMemoryDriveFactory {
            drive,
            fail_auth: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl DriveSessionFactory for InMemoryDriveFactory {
    async fn create(&self, account: &str) -> Result<Arc<dyn DriveSession>, DriveError> {
        if self.fail_auth.load(Ordering::SeqCst) {
            return Err(DriveError::Auth(format!("no valid token for {}", account)));
        }
        Ok(self.drive.clone())
    }
}

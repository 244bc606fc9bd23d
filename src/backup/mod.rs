//! Backup and restore engine for local journal state.
//!
//! This module bundles all local persistent state (database files plus the
//! image tree) into a single ZIP archive, uploads it to the signed-in
//! account's app-private drive folder, and symmetrically restores the most
//! recent remote archive over local state.
//!
//! # Module Structure
//!
//! - `archive`: ZIP construction and extraction
//! - `prefs`: persisted backup preferences
//!
//! Both flows are linear with no internal retry, and the engine is not
//! re-entrant: callers serialize invocations, typically by disabling the
//! triggering control while an operation is in flight. Scratch archives
//! live in the cache directory and are removed on success and on every
//! known failure path.

pub mod archive;
pub mod prefs;

use crate::config::Config;
use crate::constants::{
    BACKUP_LIST_PAGE_SIZE, BACKUP_PREFIX, BACKUP_TIMESTAMP_FORMAT, MIME_OCTET_STREAM, MIME_ZIP,
};
use crate::drive::{DriveSession, DriveSessionFactory, ListQuery, RemoteFile};
use crate::errors::{AppResult, BackupError};
use chrono::{Local, Utc};
use prefs::BackupPreferences;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Report of a completed backup operation.
#[derive(Debug, Clone)]
pub struct BackupReport {
    /// Id of the created remote object.
    pub remote_id: String,
    /// Name of the created remote object.
    pub remote_name: String,
    /// Database files included in the archive.
    pub databases_archived: usize,
    /// Storage files included in the archive.
    pub files_archived: usize,
    /// Size of the uploaded archive in bytes.
    pub archive_size: u64,
    /// BLAKE3 checksum of the uploaded archive.
    pub checksum: String,
}

/// Report of a completed restore operation.
#[derive(Debug, Clone)]
pub struct RestoreReport {
    /// Id of the remote object that was restored.
    pub remote_id: String,
    /// Name of the remote object that was restored.
    pub remote_name: String,
    /// Database files replaced locally.
    pub databases_restored: usize,
    /// Storage files replaced locally.
    pub files_restored: usize,
    /// Archive entries ignored (unknown groups, unsafe paths).
    pub entries_skipped: usize,
}

/// Engine driving the backup and restore flows.
///
/// Works directly on the configured database and file directories; it needs
/// raw file paths, not domain objects, so it deliberately bypasses the
/// repository layer.
pub struct BackupEngine {
    db_dir: PathBuf,
    files_dir: PathBuf,
    cache_dir: PathBuf,
    prefs: BackupPreferences,
    factory: Arc<dyn DriveSessionFactory>,
}

impl BackupEngine {
    /// Creates an engine over the configured layout and a session factory.
    pub fn new(config: &Config, factory: Arc<dyn DriveSessionFactory>) -> Self {
        BackupEngine {
            db_dir: config.database_dir(),
            files_dir: config.files_dir(),
            cache_dir: config.cache_dir.clone(),
            prefs: BackupPreferences::new(config.prefs_path()),
            factory,
        }
    }

    /// The preference store this engine records into.
    pub fn preferences(&self) -> &BackupPreferences {
        &self.prefs
    }

    /// Backs up all local state to the given account's app-private folder.
    ///
    /// Collects database artifacts and the image tree into a scratch ZIP,
    /// uploads it as `minimalog_backup_<timestamp>.zip`, records the backup
    /// time, and removes the scratch archive whether or not the flow
    /// succeeded.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::Upload` for session/transport failures,
    /// `BackupError::Archive` when the archive cannot be built, or an I/O
    /// error for local file failures. Nothing is retried.
    pub async fn backup_now(&self, account: &str) -> AppResult<BackupReport> {
        info!("Starting backup for account {}", account);

        let session = self
            .factory
            .create(account)
            .await
            .map_err(BackupError::Upload)?;

        fs::create_dir_all(&self.cache_dir)?;
        let scratch = self
            .cache_dir
            .join(format!("backup_{}.zip", Utc::now().timestamp_millis()));

        let result = self.run_backup(session.as_ref(), &scratch).await;
        remove_scratch(&scratch);

        let report = result?;
        info!(
            "Backup complete: {} as {} ({} bytes)",
            report.remote_id, report.remote_name, report.archive_size
        );
        Ok(report)
    }

    async fn run_backup(
        &self,
        session: &dyn DriveSession,
        scratch: &Path,
    ) -> AppResult<BackupReport> {
        let summary = archive::build_archive(&self.db_dir, &self.files_dir, scratch)?;
        debug!(
            "Archive built: {} database files, {} storage files",
            summary.databases, summary.files
        );

        let archive_size = fs::metadata(scratch)?.len();
        let checksum = file_checksum(scratch)?;
        debug!("Archive checksum: {}", checksum);

        let name = format!(
            "{}{}.zip",
            BACKUP_PREFIX,
            Local::now().format(BACKUP_TIMESTAMP_FORMAT)
        );
        let remote = session
            .upload(&name, MIME_ZIP, scratch)
            .await
            .map_err(BackupError::Upload)?;

        self.prefs
            .set_last_backup_time(Utc::now().timestamp_millis())?;

        Ok(BackupReport {
            remote_id: remote.id,
            remote_name: remote.name,
            databases_archived: summary.databases,
            files_archived: summary.files,
            archive_size,
            checksum,
        })
    }

    /// Restores the most recent remote backup over local state.
    ///
    /// Lists the app-private folder for backup archives, downloads the most
    /// recently modified one, validates it, and replaces local database and
    /// storage files entry by entry with atomic writes. On success the
    /// `db_restored` flag is set; the host must reload before using the
    /// database again, because swapping files underneath an open connection
    /// is undefined behavior for the embedded engine.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::NotFound` when no remote backup exists (local
    /// state untouched), `BackupError::Download` for session/transport
    /// failures, `BackupError::Corrupt` for an empty or unreadable archive,
    /// or an I/O error when a destination write fails.
    pub async fn restore_latest(&self, account: &str) -> AppResult<RestoreReport> {
        info!("Starting restore for account {}", account);

        let session = self
            .factory
            .create(account)
            .await
            .map_err(BackupError::Download)?;

        let query = ListQuery {
            name_contains: BACKUP_PREFIX.to_string(),
            mime_types: vec![MIME_ZIP.to_string(), MIME_OCTET_STREAM.to_string()],
            page_size: BACKUP_LIST_PAGE_SIZE,
        };
        let mut listed = session.list(&query).await.map_err(BackupError::Download)?;
        listed.sort_by(|a, b| b.modified.cmp(&a.modified));

        let newest = listed.into_iter().next().ok_or(BackupError::NotFound)?;
        info!(
            "Selected remote backup {} ({}, {} bytes)",
            newest.name, newest.id, newest.size
        );

        fs::create_dir_all(&self.cache_dir)?;
        let scratch = self
            .cache_dir
            .join(format!("restore_{}.zip", Utc::now().timestamp_millis()));

        let result = self.run_restore(session.as_ref(), &newest, &scratch).await;
        remove_scratch(&scratch);

        let report = result?;
        info!(
            "Restore complete: {} database files, {} storage files, {} skipped",
            report.databases_restored, report.files_restored, report.entries_skipped
        );
        Ok(report)
    }

    async fn run_restore(
        &self,
        session: &dyn DriveSession,
        remote: &RemoteFile,
        scratch: &Path,
    ) -> AppResult<RestoreReport> {
        session
            .download(&remote.id, scratch)
            .await
            .map_err(BackupError::Download)?;

        let size = fs::metadata(scratch).map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            return Err(BackupError::Corrupt {
                id: remote.id.clone(),
                name: remote.name.clone(),
            }
            .into());
        }
        debug!("Downloaded archive: {} bytes", size);

        let summary =
            archive::extract_archive(scratch, &self.db_dir, &self.files_dir).map_err(|e| {
                match e {
                    BackupError::Archive(_) => BackupError::Corrupt {
                        id: remote.id.clone(),
                        name: remote.name.clone(),
                    },
                    other => other,
                }
            })?;

        self.prefs.set_db_restored(true)?;

        Ok(RestoreReport {
            remote_id: remote.id.clone(),
            remote_name: remote.name.clone(),
            databases_restored: summary.databases,
            files_restored: summary.files,
            entries_skipped: summary.skipped,
        })
    }
}

/// Best-effort scratch cleanup; failures are logged, never propagated.
fn remove_scratch(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed scratch archive {:?}", path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove scratch archive {:?}: {}", path, e),
    }
}

fn file_checksum(path: &Path) -> AppResult<String> {
    let mut hasher = blake3::Hasher::new();
    hasher.update_reader(File::open(path)?)?;
    Ok(hasher.finalize().to_hex().to_string())
}

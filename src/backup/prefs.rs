//! Persisted backup preferences.
//!
//! A small key/value state file shared between the backup engine (which
//! writes after each successful operation) and the presentation layer (which
//! reads it at any time): the last signed-in account, the last successful
//! backup timestamp, and the flag telling the host that a restore has just
//! replaced local state and a reload is due.

use crate::errors::{AppError, AppResult};
use crate::fsutil;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PrefsState {
    #[serde(default)]
    account: Option<String>,
    #[serde(default)]
    last_backup: Option<i64>,
    #[serde(default)]
    db_restored: bool,
}

/// Injected state store for backup-related preferences.
///
/// Values live in a single JSON file, written atomically so a crashed write
/// never corrupts the state. A missing file reads as all-defaults.
#[derive(Debug, Clone)]
pub struct BackupPreferences {
    path: PathBuf,
}

impl BackupPreferences {
    /// Creates a preferences store backed by the given file path.
    pub fn new(path: PathBuf) -> Self {
        BackupPreferences { path }
    }

    fn read(&self) -> AppResult<PrefsState> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Config(format!(
                    "invalid preferences file {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PrefsState::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, state: &PrefsState) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(state).map_err(|e| {
            AppError::Config(format!("failed to serialize preferences: {}", e))
        })?;
        fsutil::write_file_atomic(&self.path, &bytes)?;
        debug!("Preferences written to {:?}", self.path);
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut PrefsState)) -> AppResult<()> {
        let mut state = self.read()?;
        apply(&mut state);
        self.write(&state)
    }

    /// Last-known signed-in account name.
    pub fn account(&self) -> AppResult<Option<String>> {
        Ok(self.read()?.account)
    }

    /// Persists (or clears) the signed-in account name.
    pub fn set_account(&self, account: Option<&str>) -> AppResult<()> {
        self.update(|s| s.account = account.map(str::to_string))
    }

    /// Timestamp of the last successful backup, epoch milliseconds.
    ///
    /// A stored value of zero or less reads as "never backed up".
    pub fn last_backup_time(&self) -> AppResult<Option<i64>> {
        Ok(self.read()?.last_backup.filter(|ts| *ts > 0))
    }

    /// Records the last successful backup timestamp.
    pub fn set_last_backup_time(&self, epoch_millis: i64) -> AppResult<()> {
        self.update(|s| s.last_backup = Some(epoch_millis))
    }

    /// Whether a restore has just replaced local state.
    ///
    /// The host observes this and performs a full reload before touching the
    /// database again; it clears the flag afterwards via
    /// [`set_db_restored`](Self::set_db_restored).
    pub fn db_restored(&self) -> AppResult<bool> {
        Ok(self.read()?.db_restored)
    }

    /// Sets or clears the restored-state flag.
    pub fn set_db_restored(&self, restored: bool) -> AppResult<()> {
        self.update(|s| s.db_restored = restored)
    }
}

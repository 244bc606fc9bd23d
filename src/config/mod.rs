//! Configuration management for the minimalog core.
//!
//! This module handles loading and validating configuration settings from
//! environment variables, with sensible defaults. The configuration derives
//! the whole on-disk layout used by the entry store, the image store, and
//! the backup engine.
//!
//! # Environment Variables
//!
//! - `MINIMALOG_DATA_DIR`: Root of persistent app data (defaults to
//!   `~/.local/share/minimalog`)
//! - `MINIMALOG_CACHE_DIR`: Scratch area for transient backup archives
//!   (defaults to `~/.cache/minimalog`)
//! - `HOME`: Used for expanding the default paths
//!
//! # Layout
//!
//! ```text
//! <data_dir>/
//!   databases/          SQLite database files (backed up)
//!   files/
//!     images/           imported photos (backed up)
//!   drive.json          backup preferences (not backed up)
//! <cache_dir>/          scratch archives, deleted after use
//! ```

use crate::constants::{
    DATABASES_SUBDIR, DATABASE_FILE_NAME, DEFAULT_CACHE_SUBDIR, DEFAULT_DATA_SUBDIR,
    ENV_VAR_CACHE_DIR, ENV_VAR_DATA_DIR, ENV_VAR_HOME, FILES_SUBDIR, IMAGES_SUBDIR,
    PREFS_FILE_NAME,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Configuration for the minimalog core.
///
/// This struct holds the two root directories everything else is derived
/// from. The accessor methods give the concrete locations the stores and the
/// backup engine operate on.
///
/// # Examples
///
/// Creating a configuration manually (e.g. in tests):
/// ```
/// use minimalog::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/tmp/minimalog-data"),
///     cache_dir: PathBuf::from("/tmp/minimalog-cache"),
/// };
/// assert!(config.database_dir().ends_with("databases"));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of persistent application data.
    pub data_dir: PathBuf,

    /// Scratch area for transient backup archives.
    pub cache_dir: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither an explicit directory nor a
    /// usable `HOME` is available to derive the defaults from.
    pub fn load() -> AppResult<Self> {
        let data_dir = Self::dir_from_env(ENV_VAR_DATA_DIR, DEFAULT_DATA_SUBDIR)?;
        let cache_dir = Self::dir_from_env(ENV_VAR_CACHE_DIR, DEFAULT_CACHE_SUBDIR)?;

        let config = Config {
            data_dir,
            cache_dir,
        };
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    fn dir_from_env(var: &str, default_subdir: &str) -> AppResult<PathBuf> {
        match env::var(var) {
            Ok(value) if !value.trim().is_empty() => {
                let expanded = shellexpand::tilde(value.trim());
                Ok(PathBuf::from(expanded.as_ref()))
            }
            _ => {
                let home = env::var(ENV_VAR_HOME).map_err(|_| {
                    AppError::Config(format!(
                        "{} is not set and HOME is unavailable to derive a default",
                        var
                    ))
                })?;
                if home.trim().is_empty() {
                    return Err(AppError::Config(format!(
                        "{} is not set and HOME is empty",
                        var
                    )));
                }
                Ok(PathBuf::from(home).join(default_subdir))
            }
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if either root directory is empty or
    /// relative; everything downstream assumes absolute paths.
    pub fn validate(&self) -> AppResult<()> {
        for (label, dir) in [("data", &self.data_dir), ("cache", &self.cache_dir)] {
            if dir.as_os_str().is_empty() {
                return Err(AppError::Config(format!(
                    "{} directory must not be empty",
                    label
                )));
            }
            if dir.is_relative() {
                return Err(AppError::Config(format!(
                    "{} directory must be an absolute path: {}",
                    label,
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Creates the on-disk layout if it does not exist yet.
    ///
    /// This is idempotent and safe to call on every startup.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    pub fn ensure_layout(&self) -> AppResult<()> {
        fs::create_dir_all(self.database_dir())?;
        fs::create_dir_all(self.images_dir())?;
        fs::create_dir_all(&self.cache_dir)?;
        debug!("Ensured directory layout under {:?}", self.data_dir);
        Ok(())
    }

    /// Directory holding the SQLite database files.
    pub fn database_dir(&self) -> PathBuf {
        self.data_dir.join(DATABASES_SUBDIR)
    }

    /// Path of the main entry database.
    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join(DATABASE_FILE_NAME)
    }

    /// Root of the file storage tree.
    pub fn files_dir(&self) -> PathBuf {
        self.data_dir.join(FILES_SUBDIR)
    }

    /// Directory holding imported images, inside the file storage tree.
    pub fn images_dir(&self) -> PathBuf {
        self.files_dir().join(IMAGES_SUBDIR)
    }

    /// Path of the persisted backup preferences file.
    ///
    /// Lives directly under the data root, outside the `databases/` and
    /// `files/` trees, so it is never swept into a backup archive.
    pub fn prefs_path(&self) -> PathBuf {
        self.data_dir.join(PREFS_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_env() {
        env::remove_var(ENV_VAR_DATA_DIR);
        env::remove_var(ENV_VAR_CACHE_DIR);
    }

    #[test]
    #[serial]
    fn test_load_uses_explicit_dirs() {
        clear_env();
        env::set_var(ENV_VAR_DATA_DIR, "/srv/minimalog/data");
        env::set_var(ENV_VAR_CACHE_DIR, "/srv/minimalog/cache");

        let config = Config::load().unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/minimalog/data"));
        assert_eq!(config.cache_dir, PathBuf::from("/srv/minimalog/cache"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_defaults_under_home() {
        clear_env();
        let home = TempDir::new().unwrap();
        env::set_var(ENV_VAR_HOME, home.path());

        let config = Config::load().unwrap();
        assert_eq!(config.data_dir, home.path().join(DEFAULT_DATA_SUBDIR));
        assert_eq!(config.cache_dir, home.path().join(DEFAULT_CACHE_SUBDIR));
    }

    #[test]
    #[serial]
    fn test_load_expands_tilde() {
        clear_env();
        let home = TempDir::new().unwrap();
        env::set_var(ENV_VAR_HOME, home.path());
        env::set_var(ENV_VAR_DATA_DIR, "~/minimalog");

        let config = Config::load().unwrap();
        assert_eq!(config.data_dir, home.path().join("minimalog"));

        clear_env();
    }

    #[test]
    fn test_validate_rejects_relative_dir() {
        let config = Config {
            data_dir: PathBuf::from("relative/data"),
            cache_dir: PathBuf::from("/abs/cache"),
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(format!("{}", result.unwrap_err()).contains("absolute"));
    }

    #[test]
    fn test_validate_rejects_empty_dir() {
        let config = Config {
            data_dir: PathBuf::from("/abs/data"),
            cache_dir: PathBuf::new(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_layout_accessors() {
        let config = Config {
            data_dir: PathBuf::from("/data"),
            cache_dir: PathBuf::from("/cache"),
        };
        assert_eq!(config.database_dir(), PathBuf::from("/data/databases"));
        assert_eq!(
            config.database_path(),
            PathBuf::from("/data/databases/minimalog.db")
        );
        assert_eq!(config.files_dir(), PathBuf::from("/data/files"));
        assert_eq!(config.images_dir(), PathBuf::from("/data/files/images"));
        assert_eq!(config.prefs_path(), PathBuf::from("/data/drive.json"));
    }

    #[test]
    fn test_ensure_layout_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp.path().join("data"),
            cache_dir: temp.path().join("cache"),
        };

        config.ensure_layout().unwrap();
        config.ensure_layout().unwrap();

        assert!(config.database_dir().is_dir());
        assert!(config.images_dir().is_dir());
        assert!(config.cache_dir.is_dir());
    }
}

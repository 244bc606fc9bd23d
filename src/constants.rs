//! Constants used throughout the application.
//!
//! This module contains all constants used in the minimalog core, organized
//! into logical groups. Having constants centralized makes them easier to
//! find, modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "minimalog";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the data directory.
pub const ENV_VAR_DATA_DIR: &str = "MINIMALOG_DATA_DIR";
/// Environment variable for specifying the cache directory.
pub const ENV_VAR_CACHE_DIR: &str = "MINIMALOG_CACHE_DIR";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default data directory relative to the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".local/share/minimalog";
/// Default cache directory relative to the user's home directory.
pub const DEFAULT_CACHE_SUBDIR: &str = ".cache/minimalog";

// On-Disk Layout
/// Sub-directory of the data directory holding SQLite database files.
pub const DATABASES_SUBDIR: &str = "databases";
/// Sub-directory of the data directory holding file storage.
pub const FILES_SUBDIR: &str = "files";
/// Sub-directory of the file storage root holding imported images.
pub const IMAGES_SUBDIR: &str = "images";
/// File name of the main entry database.
pub const DATABASE_FILE_NAME: &str = "minimalog.db";
/// File name of the persisted backup preferences.
pub const PREFS_FILE_NAME: &str = "drive.json";
/// Extension given to imported image files.
pub const IMAGE_FILE_EXTENSION: &str = "jpg";

// Backup Archive
/// Name prefix for remote backup objects.
pub const BACKUP_PREFIX: &str = "minimalog_backup_";
/// Timestamp format embedded in remote backup names.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
/// Mime type declared for uploaded backup archives.
pub const MIME_ZIP: &str = "application/zip";
/// Alternate mime type accepted when listing remote backups.
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";
/// Archive path group for database files.
pub const ARCHIVE_GROUP_DATABASES: &str = "databases/";
/// Archive path group for file storage.
pub const ARCHIVE_GROUP_FILES: &str = "files/";
/// Page size requested when listing remote backups.
pub const BACKUP_LIST_PAGE_SIZE: usize = 5;
/// Primary database file suffixes selected for backup (case-insensitive).
pub const DB_FILE_SUFFIXES: &[&str] = &[".db", ".sqlite"];
/// Auxiliary database file suffixes selected for backup (case-insensitive).
///
/// SQLite side files must travel with the main database file so a restore
/// sees a consistent snapshot even when the write-ahead log holds data.
pub const DB_AUX_SUFFIXES: &[&str] = &["-wal", "-shm", "-journal"];

// Logging Configuration
/// Default log filter when RUST_LOG is not set.
pub const DEFAULT_LOG_FILTER: &str = "minimalog=info";

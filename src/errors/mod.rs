//! Error handling utilities for the minimalog core.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the crate, as well as the
//! convenience type alias `AppResult` for functions that can return these
//! errors.

use std::io;
use thiserror::Error;

/// Represents specific error cases that can occur during database operations.
///
/// This enum provides detailed, contextual error information for different
/// failure modes when interacting with the SQLite entry store.
///
/// # Examples
///
/// ```
/// use minimalog::errors::DatabaseError;
///
/// let error = DatabaseError::NotFound("memory with id 123 not found".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}")]
    Pool(#[from] r2d2::Error),

    /// Requested row not found in database.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Custom database error with detailed message.
    #[error("Database error: {0}")]
    Custom(String),
}

/// Represents failures of the remote drive session.
///
/// The engine treats these opaquely: any drive failure during a backup flow
/// surfaces as [`BackupError::Upload`], any during a restore flow as
/// [`BackupError::Download`]. Session implementations choose the variant
/// that best describes the underlying cause.
#[derive(Debug, Error)]
pub enum DriveError {
    /// Authentication or session creation failure for the given account.
    #[error("Drive authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure while talking to the remote provider.
    #[error("Drive transport error: {0}")]
    Transport(String),

    /// Local I/O failure while streaming remote content.
    #[error("Drive I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Represents specific error cases that can occur during backup and restore.
///
/// Each variant carries enough context (remote object id/name, underlying
/// cause) for the caller to display or log; none of them is retried
/// automatically.
///
/// # Examples
///
/// ```
/// use minimalog::errors::BackupError;
///
/// let error = BackupError::Corrupt {
///     id: "f1".to_string(),
///     name: "minimalog_backup_20250101_0900.zip".to_string(),
/// };
/// let message = format!("{}", error);
/// assert!(message.contains("f1"));
/// assert!(message.contains("minimalog_backup_20250101_0900.zip"));
/// ```
#[derive(Debug, Error)]
pub enum BackupError {
    /// Local file read/write failure during a backup or restore flow.
    #[error("I/O error during backup: {0}")]
    Io(#[from] io::Error),

    /// Failure while constructing or reading the backup archive.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Transport or authentication failure while uploading a backup.
    #[error("Upload failed: {0}")]
    Upload(#[source] DriveError),

    /// Transport or authentication failure while downloading a backup.
    #[error("Download failed: {0}")]
    Download(#[source] DriveError),

    /// No backup object exists in the remote app folder.
    #[error("No backup found in the remote app folder")]
    NotFound,

    /// The downloaded archive is empty or unreadable.
    #[error("Downloaded backup is empty or unreadable (id={id}, name={name})")]
    Corrupt {
        /// Remote object id of the offending backup.
        id: String,
        /// Remote object name of the offending backup.
        name: String,
    },
}

/// Represents all possible errors that can occur in the minimalog core.
///
/// This enum is the central error type used across the crate, with variants
/// for different error categories. It uses `thiserror` for deriving the
/// `Error` trait implementation and formatted error messages.
///
/// Note: This type does not implement `Clone` to avoid losing error context
/// when cloning `std::io::Error` values.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use minimalog::errors::AppError;
///
/// let error = AppError::Config("Missing data directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing data directory");
/// ```
///
/// Converting from an IO error:
/// ```
/// use minimalog::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    ///
    /// This variant automatically converts from `std::io::Error` through the
    /// `From` trait.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors related to database operations.
    ///
    /// This variant uses a dedicated DatabaseError type to provide detailed
    /// information about what went wrong with the entry store.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Errors related to backup and restore operations.
    ///
    /// This variant uses a dedicated BackupError type covering the full
    /// taxonomy of archive, upload, download, and validation failures.
    #[error("Backup error: {0}")]
    Backup(#[from] BackupError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// This type alias is used throughout the crate to represent operations
/// that may fail with an `AppError`.
///
/// # Examples
///
/// ```
/// use minimalog::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Config("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_app_error_from_database_error() {
        let db_error = DatabaseError::NotFound("memory with id 7 not found".to_string());
        let app_error: AppError = db_error.into();

        let message = format!("{}", app_error);
        assert!(message.contains("not found"));
    }

    #[test]
    fn test_backup_error_not_found_message() {
        let error = BackupError::NotFound;
        assert_eq!(
            format!("{}", error),
            "No backup found in the remote app folder"
        );
    }

    #[test]
    fn test_backup_error_corrupt_names_remote_object() {
        let error = BackupError::Corrupt {
            id: "abc".to_string(),
            name: "minimalog_backup_20250102_1200.zip".to_string(),
        };
        let message = format!("{}", error);
        assert!(message.contains("abc"));
        assert!(message.contains("minimalog_backup_20250102_1200.zip"));
    }

    #[test]
    fn test_upload_error_preserves_drive_context() {
        let drive = DriveError::Auth("token expired for user@example.com".to_string());
        let error = BackupError::Upload(drive);
        let message = format!("{}", error);
        assert!(message.starts_with("Upload failed"));

        // The drive cause stays reachable through the source chain.
        let source = std::error::Error::source(&error);
        assert!(source.is_some());
        assert!(format!("{}", source.unwrap()).contains("token expired"));
    }
}

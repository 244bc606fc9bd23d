//! Remote drive session contract.
//!
//! The backup engine talks to cloud storage through the object-safe
//! [`DriveSession`] trait; a [`DriveSessionFactory`] turns a signed-in
//! account name into an authenticated session. Concrete providers (and their
//! sign-in flows) live in the host application; this crate only defines the
//! contract the engine consumes, scoped to the provider's app-private
//! folder.

use crate::errors::DriveError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;

/// Metadata of a remote object in the app-private folder.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    /// Provider-assigned object id.
    pub id: String,
    /// Object name, e.g. `minimalog_backup_20250920_0915.zip`.
    pub name: String,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// Object size in bytes.
    pub size: u64,
    /// Declared mime type.
    pub mime_type: String,
}

/// Filter for listing remote objects.
///
/// Implementations must exclude trashed objects and should return results
/// newest-first; the engine re-sorts defensively before selecting.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Substring the object name must contain.
    pub name_contains: String,
    /// Acceptable mime types (any match qualifies).
    pub mime_types: Vec<String>,
    /// Maximum number of results to return.
    pub page_size: usize,
}

/// An authenticated client for the provider's app-private folder.
///
/// Implement this to plug in a storage provider (or an in-memory double in
/// tests). All failures are reported as an opaque [`DriveError`]; the engine
/// maps them to upload or download errors depending on the flow.
#[async_trait]
pub trait DriveSession: Send + Sync {
    /// Lists objects in the app-private folder matching the query.
    async fn list(&self, query: &ListQuery) -> Result<Vec<RemoteFile>, DriveError>;

    /// Creates a remote object with the given name and mime type, uploading
    /// the full content of the local file at `content`.
    async fn upload(
        &self,
        name: &str,
        mime_type: &str,
        content: &Path,
    ) -> Result<RemoteFile, DriveError>;

    /// Streams the full content of the object identified by `id` into the
    /// local file at `dest`.
    async fn download(&self, id: &str, dest: &Path) -> Result<(), DriveError>;
}

/// Obtains an authenticated session for a signed-in account.
#[async_trait]
pub trait DriveSessionFactory: Send + Sync {
    /// Creates a session for the given account name.
    ///
    /// # Errors
    ///
    /// Returns a [`DriveError`] when the account cannot be authenticated or
    /// the provider is unreachable.
    async fn create(&self, account: &str) -> Result<Arc<dyn DriveSession>, DriveError>;
}

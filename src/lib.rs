/*!
# Minimalog

Minimalog is the core of a personal journaling application: users record
dated "memory" entries (title, description, photo, tags, favorite flag),
browse and filter them, and optionally back their data up to a cloud drive.
This crate is the app-internal subsystem behind the screens; it has no CLI
and is invoked programmatically by a host presentation layer.

## Core Features

- Reactive entry store: live, push-on-change views over all entries,
  favorites, text/tag search, a single entry, and the "today" pick
- Image store: imported photos persisted under generated names, cleaned up
  best-effort with the owning entry
- Backup engine: local database files and the image tree bundled into a ZIP
  archive and uploaded to the account's app-private drive folder; restore
  downloads the most recent archive and atomically replaces local state

## Architecture

The codebase follows a modular architecture with clear separation of
concerns:

- `config`: directory layout and environment-driven configuration
- `errors`: error handling infrastructure
- `db`: SQLite schema and row-level entry operations
- `store` / `live`: reactive CRUD with live queries
- `repository`: domain mapping and entry/image lifecycle
- `images`: photo persistence
- `backup` / `drive`: archive engine and the remote session contract

## Usage Example

```rust,no_run
use minimalog::{Config, Database, ImageStore, MemoryRepository, MemoryStore};

fn main() -> minimalog::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;
    config.ensure_layout()?;

    let db = Database::open(&config.database_path())?;
    db.initialize_schema()?;

    let repository = MemoryRepository::new(
        MemoryStore::new(db),
        ImageStore::new(&config.files_dir()),
    );
    let all = repository.observe_all();
    println!("{} memories", all.snapshot()?.len());
    Ok(())
}
```
*/

/// Backup and restore engine
pub mod backup;
/// Configuration loading and management
pub mod config;
/// Centralized constants
pub mod constants;
/// Database schema and row-level operations
pub mod db;
/// Remote drive session contract
pub mod drive;
/// Error types and utilities for error handling
pub mod errors;
/// Atomic file replacement utilities
pub mod fsutil;
/// Local image storage
pub mod images;
/// Live query primitive
pub mod live;
/// Logging initialization for host applications
pub mod logging;
/// Domain model and storage mapping
pub mod model;
/// Domain repository over the stores
pub mod repository;
/// Reactive entry store
pub mod store;

// Re-export important types for convenience
pub use backup::prefs::BackupPreferences;
pub use backup::{BackupEngine, BackupReport, RestoreReport};
pub use config::Config;
pub use db::Database;
pub use drive::{DriveSession, DriveSessionFactory, ListQuery, RemoteFile};
pub use errors::{AppError, AppResult, BackupError, DatabaseError, DriveError};
pub use images::{DeleteOutcome, ImageStore};
pub use live::LiveQuery;
pub use model::Memory;
pub use repository::MemoryRepository;
pub use store::MemoryStore;

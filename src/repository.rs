//! Repository composing the entry store and the image store.
//!
//! The repository is the domain-facing surface: it maps storage rows to
//! [`Memory`] values and ties the image lifecycle to the entry lifecycle.
//! Reads are pass-through projections of the store's live queries.

use crate::errors::AppResult;
use crate::images::{DeleteOutcome, ImageStore};
use crate::live::LiveQuery;
use crate::model::Memory;
use crate::store::MemoryStore;
use chrono::NaiveDate;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Domain repository for memory entries.
#[derive(Clone)]
pub struct MemoryRepository {
    store: MemoryStore,
    images: ImageStore,
}

impl MemoryRepository {
    pub fn new(store: MemoryStore, images: ImageStore) -> Self {
        MemoryRepository { store, images }
    }

    /// Imports a photo into local storage, returning the stored path to
    /// record on the entry before [`add`](Self::add).
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or the destination
    /// cannot be written.
    pub fn persist_image(&self, source: &mut impl Read) -> AppResult<PathBuf> {
        self.images.persist(source)
    }

    /// Saves a memory, returning its stored id.
    ///
    /// A memory with id 0 is inserted fresh; a memory carrying an existing
    /// id replaces that entry.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the insert fails.
    pub fn add(&self, memory: Memory) -> AppResult<i64> {
        let id = self.store.insert(memory.into_row())?;
        debug!("Memory saved with id {}", id);
        Ok(id)
    }

    /// Deletes a memory and its photo.
    ///
    /// The photo is cleaned up first, best-effort: a failed image delete is
    /// logged and the entry record is removed regardless. Deleting an
    /// unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a storage error if reading or deleting the record fails.
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let row = self.store.get_by_id(id)?;
        let image_path = row.and_then(|r| r.image_path).map(PathBuf::from);

        match self.images.delete_file(image_path.as_deref()) {
            DeleteOutcome::Failed(e) => {
                warn!("Image cleanup for memory {} failed: {}", id, e);
            }
            outcome => {
                debug!("Image cleanup for memory {}: removed={}", id, outcome.removed());
            }
        }

        self.store.delete(id)
    }

    /// Flips the favorite flag, returning the new state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or a storage error.
    pub fn toggle_favorite(&self, id: i64) -> AppResult<bool> {
        self.store.toggle_favorite(id)
    }

    /// Live list of all memories, newest first.
    pub fn observe_all(&self) -> LiveQuery<Vec<Memory>> {
        self.store.observe_all().try_map(rows_to_memories)
    }

    /// Live view of a single memory by id.
    pub fn observe_by_id(&self, id: i64) -> LiveQuery<Option<Memory>> {
        self.store
            .observe_by_id(id)
            .try_map(|row| row.map(Memory::from_row).transpose())
    }

    /// Live view of the memory shown for "today" relative to the given date.
    pub fn observe_today(&self, date: NaiveDate) -> LiveQuery<Option<Memory>> {
        self.store
            .observe_today(date)
            .try_map(|row| row.map(Memory::from_row).transpose())
    }

    /// Live list of favorite memories.
    pub fn observe_favorites(&self) -> LiveQuery<Vec<Memory>> {
        self.store.observe_favorites().try_map(rows_to_memories)
    }

    /// Live filtered list; empty filter returns everything.
    pub fn observe_search(&self, filter: &str) -> LiveQuery<Vec<Memory>> {
        self.store.observe_search(filter).try_map(rows_to_memories)
    }

    /// Directory the image store writes into, for hosts that need to show
    /// or clear it.
    pub fn images_dir(&self) -> &Path {
        self.images.images_dir()
    }
}

fn rows_to_memories(rows: Vec<crate::db::memories::MemoryRow>) -> AppResult<Vec<Memory>> {
    rows.into_iter().map(Memory::from_row).collect()
}

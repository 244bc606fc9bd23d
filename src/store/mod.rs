//! Reactive CRUD store for memory entries.
//!
//! [`MemoryStore`] wraps the row-level operations in `db::memories` and adds
//! change propagation: every mutation bumps a watch-backed counter, and the
//! `observe_*` methods hand out [`LiveQuery`] views that re-evaluate against
//! the live database whenever the counter moves.

use crate::db::memories::{self, MemoryRow};
use crate::db::Database;
use crate::errors::AppResult;
use crate::live::LiveQuery;
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Entry store with live queries.
///
/// Cloning is cheap; clones share the database pool and the change signal,
/// so a mutation through any clone wakes every live query.
#[derive(Clone)]
pub struct MemoryStore {
    db: Database,
    changes: Arc<watch::Sender<u64>>,
}

impl MemoryStore {
    /// Creates a store over an opened database.
    pub fn new(db: Database) -> Self {
        let (tx, _rx) = watch::channel(0u64);
        MemoryStore {
            db,
            changes: Arc::new(tx),
        }
    }

    fn notify(&self) {
        self.changes.send_modify(|v| *v += 1);
        debug!("Store change signalled");
    }

    /// Inserts a row, or replaces the row with the same id. Returns the
    /// stored id.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the operation fails; live queries are not
    /// notified in that case.
    pub fn insert(&self, row: MemoryRow) -> AppResult<i64> {
        let conn = self.db.get_conn()?;
        let id = memories::insert_or_replace(&conn, &row)?;
        drop(conn);
        self.notify();
        Ok(id)
    }

    /// One-shot read of a row by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails.
    pub fn get_by_id(&self, id: i64) -> AppResult<Option<MemoryRow>> {
        let conn = self.db.get_conn()?;
        memories::get_by_id(&conn, id)
    }

    /// Live list of all rows, newest first (day descending, id descending).
    pub fn observe_all(&self) -> LiveQuery<Vec<MemoryRow>> {
        let db = self.db.clone();
        self.live(move || {
            let conn = db.get_conn()?;
            memories::list_all(&conn)
        })
    }

    /// Live view of a single row by id.
    pub fn observe_by_id(&self, id: i64) -> LiveQuery<Option<MemoryRow>> {
        let db = self.db.clone();
        self.live(move || {
            let conn = db.get_conn()?;
            memories::get_by_id(&conn, id)
        })
    }

    /// Live view of the entry shown for "today".
    ///
    /// Prefers the most recent row whose month-and-day match the given
    /// date's, regardless of year, falling back to the most recent row
    /// overall; `None` only when the store is empty.
    pub fn observe_today(&self, date: NaiveDate) -> LiveQuery<Option<MemoryRow>> {
        let db = self.db.clone();
        let (month, day) = (date.month(), date.day());
        self.live(move || {
            let conn = db.get_conn()?;
            memories::pick_for_day(&conn, month, day)
        })
    }

    /// Live list of favorite rows only, newest first.
    pub fn observe_favorites(&self) -> LiveQuery<Vec<MemoryRow>> {
        let db = self.db.clone();
        self.live(move || {
            let conn = db.get_conn()?;
            memories::list_favorites(&conn)
        })
    }

    /// Live filtered list: case-insensitive substring match on title,
    /// description, or the tag field. An empty filter matches everything.
    pub fn observe_search(&self, filter: &str) -> LiveQuery<Vec<MemoryRow>> {
        let db = self.db.clone();
        let filter = filter.to_string();
        self.live(move || {
            let conn = db.get_conn()?;
            memories::search(&conn, &filter)
        })
    }

    /// Flips the favorite flag of a row and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or a storage error.
    pub fn toggle_favorite(&self, id: i64) -> AppResult<bool> {
        let conn = self.db.get_conn()?;
        let state = memories::toggle_favorite(&conn, id)?;
        drop(conn);
        self.notify();
        Ok(state)
    }

    /// Deletes a row by id. Deleting an absent row is not an error.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the operation fails.
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.db.get_conn()?;
        memories::delete_by_id(&conn, id)?;
        drop(conn);
        self.notify();
        Ok(())
    }

    fn live<T: 'static>(
        &self,
        query: impl Fn() -> AppResult<T> + Send + Sync + 'static,
    ) -> LiveQuery<T> {
        LiveQuery::new(self.changes.subscribe(), query)
    }
}

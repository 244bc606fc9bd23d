//! Row-level CRUD operations for memory entries.
//!
//! This module provides functions for creating, reading, updating, and
//! querying memory rows. All list queries share the same recency ordering:
//! day descending, then id descending, so same-day entries keep a stable
//! newest-first order.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::{params, Connection, Row};
use tracing::debug;

/// A memory entry as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRow {
    /// Row id; 0 means "not yet assigned" and allocates a fresh id on insert.
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_path: Option<String>,
    /// Days since 1970-01-01.
    pub epoch_day: i64,
    /// Comma-joined tag labels; empty string means no tags.
    pub tags_csv: String,
    pub is_favorite: bool,
}

const SELECT_COLUMNS: &str =
    "id, title, description, image_path, epoch_day, tags_csv, is_favorite";

fn row_from_sql(row: &Row) -> rusqlite::Result<MemoryRow> {
    Ok(MemoryRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        image_path: row.get(3)?,
        epoch_day: row.get(4)?,
        tags_csv: row.get(5)?,
        is_favorite: row.get(6)?,
    })
}

/// Inserts a memory row, or replaces the existing row with the same id.
///
/// A row with id 0 is treated as new and gets a fresh autoincrement id.
/// Returns the id under which the row is stored.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_or_replace(conn: &Connection, row: &MemoryRow) -> AppResult<i64> {
    debug!("Inserting memory row (id {})", row.id);

    if row.id == 0 {
        conn.execute(
            r#"
            INSERT INTO memories (title, description, image_path, epoch_day, tags_csv, is_favorite)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                row.title,
                row.description,
                row.image_path,
                row.epoch_day,
                row.tags_csv,
                row.is_favorite
            ],
        )
        .map_err(DatabaseError::Sqlite)?;
        let id = conn.last_insert_rowid();
        debug!("Memory inserted with id {}", id);
        Ok(id)
    } else {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO memories
                (id, title, description, image_path, epoch_day, tags_csv, is_favorite)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                row.id,
                row.title,
                row.description,
                row.image_path,
                row.epoch_day,
                row.tags_csv,
                row.is_favorite
            ],
        )
        .map_err(DatabaseError::Sqlite)?;
        Ok(row.id)
    }
}

/// Retrieves a memory row by id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
/// Returns `Ok(None)` if no row exists with the given id.
pub fn get_by_id(conn: &Connection, id: i64) -> AppResult<Option<MemoryRow>> {
    let result = conn.query_row(
        &format!("SELECT {SELECT_COLUMNS} FROM memories WHERE id = ?1"),
        params![id],
        row_from_sql,
    );

    match result {
        Ok(row) => Ok(Some(row)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::Sqlite(e).into()),
    }
}

/// Lists all memory rows, newest first.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list_all(conn: &Connection) -> AppResult<Vec<MemoryRow>> {
    query_rows(
        conn,
        &format!("SELECT {SELECT_COLUMNS} FROM memories ORDER BY epoch_day DESC, id DESC"),
        [],
    )
}

/// Lists favorite memory rows only, newest first.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list_favorites(conn: &Connection) -> AppResult<Vec<MemoryRow>> {
    query_rows(
        conn,
        &format!(
            "SELECT {SELECT_COLUMNS} FROM memories WHERE is_favorite = 1
             ORDER BY epoch_day DESC, id DESC"
        ),
        [],
    )
}

/// Searches title, description, and tags for a case-insensitive substring.
///
/// An empty (or all-whitespace) filter matches every row.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn search(conn: &Connection, filter: &str) -> AppResult<Vec<MemoryRow>> {
    let q = filter.trim();
    let like = format!("%{}%", q);
    query_rows(
        conn,
        &format!(
            "SELECT {SELECT_COLUMNS} FROM memories
             WHERE ?1 = '' OR title LIKE ?2 OR description LIKE ?2 OR tags_csv LIKE ?2
             ORDER BY epoch_day DESC, id DESC"
        ),
        params![q, like],
    )
}

/// Picks the entry shown for "today" on the given calendar month and day.
///
/// Prefers the most recent row whose month-and-day match (a year-independent
/// anniversary match), falling back to the most recent row overall. Returns
/// `None` only when the table is empty.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn pick_for_day(conn: &Connection, month: u32, day: u32) -> AppResult<Option<MemoryRow>> {
    let mm = format!("{:02}", month);
    let dd = format!("{:02}", day);

    let result = conn.query_row(
        &format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM memories
            ORDER BY
                CASE
                  WHEN strftime('%m', date(epoch_day * 86400, 'unixepoch')) = ?1
                   AND strftime('%d', date(epoch_day * 86400, 'unixepoch')) = ?2
                  THEN 1 ELSE 0
                END DESC,
                epoch_day DESC,
                id DESC
            LIMIT 1
            "#
        ),
        params![mm, dd],
        row_from_sql,
    );

    match result {
        Ok(row) => Ok(Some(row)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::Sqlite(e).into()),
    }
}

/// Flips the favorite flag of a row and returns the new state.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no row exists with the given id, or
/// an error if the database operation fails.
pub fn toggle_favorite(conn: &Connection, id: i64) -> AppResult<bool> {
    let updated = conn
        .execute(
            r#"
            UPDATE memories
            SET is_favorite = CASE WHEN is_favorite = 1 THEN 0 ELSE 1 END
            WHERE id = ?1
            "#,
            params![id],
        )
        .map_err(DatabaseError::Sqlite)?;

    if updated == 0 {
        return Err(DatabaseError::NotFound(format!("memory with id {} not found", id)).into());
    }

    let state: bool = conn
        .query_row(
            "SELECT is_favorite FROM memories WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Sqlite)?;

    debug!("Memory {} favorite toggled to {}", id, state);
    Ok(state)
}

/// Deletes a row by id.
///
/// Returns whether a row was actually removed.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_by_id(conn: &Connection, id: i64) -> AppResult<bool> {
    let deleted = conn
        .execute("DELETE FROM memories WHERE id = ?1", params![id])
        .map_err(DatabaseError::Sqlite)?;
    debug!("Deleted memory {} ({} rows)", id, deleted);
    Ok(deleted > 0)
}

fn query_rows<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> AppResult<Vec<MemoryRow>> {
    let mut stmt = conn.prepare(sql).map_err(DatabaseError::Sqlite)?;
    let rows = stmt
        .query_map(params, row_from_sql)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(rows)
}

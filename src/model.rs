//! Domain model for memory entries.
//!
//! The storage layer keeps dates as integer day counts and tags as a single
//! delimited text field; this module owns the domain type and the mapping in
//! both directions.

use crate::db::memories::MemoryRow;
use crate::errors::{AppResult, DatabaseError};
use chrono::{Duration, NaiveDate};
use std::path::PathBuf;

/// A single journaled memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    /// Entry id; 0 means "new, not yet saved".
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Path of the persisted photo, if the entry has one.
    pub image_path: Option<PathBuf>,
    /// Calendar day the memory belongs to.
    pub date: NaiveDate,
    /// Ordered tag labels. Storage does not enforce uniqueness.
    pub tags: Vec<String>,
    pub is_favorite: bool,
}

impl Memory {
    /// Builds a domain memory from a storage row.
    ///
    /// # Errors
    ///
    /// Returns a database error if the stored day count does not map to a
    /// representable calendar date.
    pub fn from_row(row: MemoryRow) -> AppResult<Memory> {
        let date = date_from_epoch_day(row.epoch_day)?;
        Ok(Memory {
            id: row.id,
            title: row.title,
            description: row.description,
            image_path: row.image_path.map(PathBuf::from),
            date,
            tags: tags_from_csv(&row.tags_csv),
            is_favorite: row.is_favorite,
        })
    }

    /// Translates this memory into its storage row shape.
    pub fn into_row(self) -> MemoryRow {
        MemoryRow {
            id: self.id,
            title: self.title,
            description: self.description,
            image_path: self
                .image_path
                .map(|p| p.to_string_lossy().into_owned()),
            epoch_day: epoch_day_from_date(self.date),
            tags_csv: tags_to_csv(&self.tags),
            is_favorite: self.is_favorite,
        }
    }
}

/// Days since 1970-01-01 for the given date.
pub fn epoch_day_from_date(date: NaiveDate) -> i64 {
    date.signed_duration_since(NaiveDate::default()).num_days()
}

/// Calendar date for a day count since 1970-01-01.
///
/// # Errors
///
/// Returns a database error when the day count overflows the representable
/// date range, which only happens with a corrupted row.
pub fn date_from_epoch_day(epoch_day: i64) -> AppResult<NaiveDate> {
    Duration::try_days(epoch_day)
        .and_then(|days| NaiveDate::default().checked_add_signed(days))
        .ok_or_else(|| {
            DatabaseError::Custom(format!("epoch day {} out of range", epoch_day)).into()
        })
}

fn tags_to_csv(tags: &[String]) -> String {
    tags.join(",")
}

fn tags_from_csv(csv: &str) -> Vec<String> {
    if csv.is_empty() {
        Vec::new()
    } else {
        csv.split(',').map(str::to_string).collect()
    }
}

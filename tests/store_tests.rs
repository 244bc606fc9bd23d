//! Integration tests for the entry store and repository.
//!
//! These tests verify the observable behavior the presentation layer relies
//! on: recency ordering, the "today" pick, favorites, search, and the entry
//! and image lifecycle.

use chrono::NaiveDate;
use minimalog::{Config, Database, ImageStore, Memory, MemoryRepository, MemoryStore};
use std::io::Cursor;
use tempfile::TempDir;

fn setup_repo(temp: &TempDir) -> MemoryRepository {
    let config = Config {
        data_dir: temp.path().join("data"),
        cache_dir: temp.path().join("cache"),
    };
    config.ensure_layout().unwrap();

    let db = Database::open(&config.database_path()).unwrap();
    db.initialize_schema().unwrap();

    MemoryRepository::new(MemoryStore::new(db), ImageStore::new(&config.files_dir()))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn memory(title: &str, date: NaiveDate) -> Memory {
    Memory {
        id: 0,
        title: title.to_string(),
        description: format!("{} description", title),
        image_path: None,
        date,
        tags: Vec::new(),
        is_favorite: false,
    }
}

#[tokio::test]
async fn test_observe_all_orders_by_date_then_id_descending() {
    let temp = TempDir::new().unwrap();
    let repo = setup_repo(&temp);

    // Increasing ids with non-decreasing dates, including a same-day pair.
    let a = repo.add(memory("a", date(2025, 1, 1))).unwrap();
    let b = repo.add(memory("b", date(2025, 3, 1))).unwrap();
    let c = repo.add(memory("c", date(2025, 3, 1))).unwrap();
    let d = repo.add(memory("d", date(2025, 6, 1))).unwrap();

    let ids: Vec<i64> = repo
        .observe_all()
        .snapshot()
        .unwrap()
        .iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec![d, c, b, a]);
}

#[tokio::test]
async fn test_observe_today_prefers_anniversary_match() {
    let temp = TempDir::new().unwrap();
    let repo = setup_repo(&temp);

    let anniversary = repo.add(memory("a year ago", date(2024, 9, 20))).unwrap();
    repo.add(memory("yesterday", date(2025, 9, 19))).unwrap();

    let today = repo
        .observe_today(date(2025, 9, 20))
        .snapshot()
        .unwrap()
        .unwrap();
    assert_eq!(today.id, anniversary);
}

#[tokio::test]
async fn test_observe_today_falls_back_to_most_recent() {
    let temp = TempDir::new().unwrap();
    let repo = setup_repo(&temp);

    repo.add(memory("older", date(2025, 1, 10))).unwrap();
    let newest = repo.add(memory("newest", date(2025, 5, 5))).unwrap();

    let today = repo
        .observe_today(date(2025, 12, 24))
        .snapshot()
        .unwrap()
        .unwrap();
    assert_eq!(today.id, newest);
}

#[tokio::test]
async fn test_observe_today_empty_store_is_none() {
    let temp = TempDir::new().unwrap();
    let repo = setup_repo(&temp);

    assert!(repo
        .observe_today(date(2025, 9, 20))
        .snapshot()
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_favorite_toggle_lists_and_delists() {
    let temp = TempDir::new().unwrap();
    let repo = setup_repo(&temp);

    let mut trip = memory("Trip", date(2025, 9, 20));
    trip.tags = vec!["travel".to_string()];
    let id = repo.add(trip).unwrap();

    assert!(repo.toggle_favorite(id).unwrap());
    let favorites = repo.observe_favorites().snapshot().unwrap();
    assert!(favorites.iter().any(|m| m.id == id));

    assert!(!repo.toggle_favorite(id).unwrap());
    let favorites = repo.observe_favorites().snapshot().unwrap();
    assert!(!favorites.iter().any(|m| m.id == id));
}

#[tokio::test]
async fn test_search_covers_title_description_and_tags() {
    let temp = TempDir::new().unwrap();
    let repo = setup_repo(&temp);

    let mut tagged = memory("Harbor walk", date(2025, 6, 1));
    tagged.tags = vec!["sea".to_string(), "sunset".to_string()];
    repo.add(tagged).unwrap();
    repo.add(memory("Grocery run", date(2025, 6, 2))).unwrap();

    // Case-insensitive title match.
    assert_eq!(repo.observe_search("HARBOR").snapshot().unwrap().len(), 1);
    // Description match hits both entries.
    assert_eq!(
        repo.observe_search("description").snapshot().unwrap().len(),
        2
    );
    // Tag match.
    assert_eq!(repo.observe_search("sunset").snapshot().unwrap().len(), 1);
    // Empty filter returns everything.
    assert_eq!(repo.observe_search("").snapshot().unwrap().len(), 2);
    // No match.
    assert!(repo.observe_search("mountain").snapshot().unwrap().is_empty());
}

#[tokio::test]
async fn test_live_query_pushes_after_mutation() {
    let temp = TempDir::new().unwrap();
    let repo = setup_repo(&temp);

    let mut live = repo.observe_all();
    assert!(live.snapshot().unwrap().is_empty());

    repo.add(memory("first", date(2025, 2, 2))).unwrap();

    let rows = live.changed().await.unwrap().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "first");
}

#[tokio::test]
async fn test_entry_lifecycle_with_image() {
    let temp = TempDir::new().unwrap();
    let repo = setup_repo(&temp);

    let image_path = repo
        .persist_image(&mut Cursor::new(b"jpeg bytes".to_vec()))
        .unwrap();
    assert!(image_path.exists());

    let mut m = memory("With photo", date(2025, 4, 4));
    m.image_path = Some(image_path.clone());
    let id = repo.add(m).unwrap();

    let loaded = repo.observe_by_id(id).snapshot().unwrap().unwrap();
    assert_eq!(loaded.image_path.as_deref(), Some(image_path.as_path()));

    repo.delete(id).unwrap();
    assert!(repo.observe_by_id(id).snapshot().unwrap().is_none());
    assert!(!image_path.exists(), "photo is cleaned up with its entry");
}

#[tokio::test]
async fn test_edit_replaces_in_place() {
    let temp = TempDir::new().unwrap();
    let repo = setup_repo(&temp);

    let id = repo.add(memory("draft", date(2025, 7, 1))).unwrap();

    let mut edited = memory("final", date(2025, 7, 2));
    edited.id = id;
    let id2 = repo.add(edited).unwrap();
    assert_eq!(id, id2);

    let all = repo.observe_all().snapshot().unwrap();
    assert_eq!(all.len(), 1, "editing must not duplicate the entry");
    assert_eq!(all[0].title, "final");
    assert_eq!(all[0].date, date(2025, 7, 2));
}

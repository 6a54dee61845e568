//! Unit tests for the key-value stores behind `KeyValueStoreTrait`.

use quran_bookmarks::database::Database;
use quran_bookmarks::services::storage::{
    KeyValueStoreTrait, MemoryKeyValueStore, SqliteKeyValueStore,
};
use rstest::rstest;
use tempfile::TempDir;

fn sqlite_in_memory() -> Box<dyn KeyValueStoreTrait> {
    Box::new(SqliteKeyValueStore::new(Database::open_in_memory().unwrap()))
}

fn memory() -> Box<dyn KeyValueStoreTrait> {
    Box::new(MemoryKeyValueStore::new())
}

#[rstest]
#[case::sqlite(sqlite_in_memory())]
#[case::memory(memory())]
fn test_set_then_get(#[case] mut store: Box<dyn KeyValueStoreTrait>) {
    assert_eq!(store.get("bookmarks").unwrap(), None);

    store.set("bookmarks", "[]").unwrap();
    assert_eq!(store.get("bookmarks").unwrap().as_deref(), Some("[]"));

    store.set("bookmarks", r#"[{"type":"chapter"}]"#).unwrap();
    assert_eq!(
        store.get("bookmarks").unwrap().as_deref(),
        Some(r#"[{"type":"chapter"}]"#)
    );
}

#[rstest]
#[case::sqlite(sqlite_in_memory())]
#[case::memory(memory())]
fn test_keys_are_independent(#[case] mut store: Box<dyn KeyValueStoreTrait>) {
    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.set("a", "3").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("3"));
    assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
}

#[test]
fn test_sqlite_value_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookmarks.db");

    {
        let mut store = SqliteKeyValueStore::new(Database::open(&path).unwrap());
        store.set("bookmarks", "[1,2,3]").unwrap();
    }

    let store = SqliteKeyValueStore::new(Database::open(&path).unwrap());
    assert_eq!(store.get("bookmarks").unwrap().as_deref(), Some("[1,2,3]"));
}

#[test]
fn test_sqlite_stores_unicode_verbatim() {
    let mut store = SqliteKeyValueStore::new(Database::open_in_memory().unwrap());
    let arabic = "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ";
    store.set("bookmarks", arabic).unwrap();
    assert_eq!(store.get("bookmarks").unwrap().as_deref(), Some(arabic));
}

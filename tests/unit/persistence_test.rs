//! Unit tests for the background persistence worker.
//!
//! Covers load callbacks, ordering of fire-and-forget writes, coalescing of
//! superseded snapshots and failure accounting.

use std::sync::mpsc;

use quran_bookmarks::services::persistence::PersistenceHandle;
use quran_bookmarks::services::storage::{KeyValueStoreTrait, MemoryKeyValueStore};
use quran_bookmarks::types::errors::StorageError;

/// Store whose reads announce themselves and then block until released.
struct GatedStore {
    inner: MemoryKeyValueStore,
    entered: mpsc::Sender<()>,
    gate: mpsc::Receiver<()>,
}

impl KeyValueStoreTrait for GatedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _ = self.entered.send(());
        let _ = self.gate.recv();
        self.inner.get(key)
    }
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value)
    }
}

struct BrokenStore;

impl KeyValueStoreTrait for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("no storage".to_string()))
    }
    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("no storage".to_string()))
    }
}

#[test]
fn test_load_reports_stored_value() {
    let kv = MemoryKeyValueStore::with_entry("bookmarks", "[]");
    let handle = PersistenceHandle::spawn(kv).unwrap();

    let (tx, rx) = mpsc::channel();
    handle.load("bookmarks", Box::new(move |result| tx.send(result).unwrap()));
    let loaded = rx.recv().unwrap().unwrap();
    assert_eq!(loaded.as_deref(), Some("[]"));
}

#[test]
fn test_load_reports_missing_key_as_none() {
    let handle = PersistenceHandle::spawn(MemoryKeyValueStore::new()).unwrap();

    let (tx, rx) = mpsc::channel();
    handle.load("bookmarks", Box::new(move |result| tx.send(result).unwrap()));
    assert!(rx.recv().unwrap().unwrap().is_none());
}

#[test]
fn test_load_reports_storage_error() {
    let handle = PersistenceHandle::spawn(BrokenStore).unwrap();

    let (tx, rx) = mpsc::channel();
    handle.load("bookmarks", Box::new(move |result| tx.send(result).unwrap()));
    assert!(matches!(rx.recv().unwrap(), Err(StorageError::Unavailable(_))));
}

#[test]
fn test_last_issued_write_dominates() {
    let kv = MemoryKeyValueStore::new();
    let handle = PersistenceHandle::spawn(kv.clone()).unwrap();

    for seq in 1..=100u64 {
        handle.write(seq, "bookmarks", format!("[{}]", seq));
    }
    handle.flush_blocking();

    assert_eq!(kv.snapshot("bookmarks").as_deref(), Some("[100]"));
    let stats = handle.stats();
    assert_eq!(stats.issued, 100);
    assert_eq!(stats.completed + stats.coalesced, 100);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.last_written_seq, 100);
}

#[test]
fn test_queued_writes_are_coalesced() {
    let (gate_tx, gate_rx) = mpsc::channel();
    let (entered_tx, entered_rx) = mpsc::channel();
    let kv = MemoryKeyValueStore::new();
    let handle = PersistenceHandle::spawn(GatedStore {
        inner: kv.clone(),
        entered: entered_tx,
        gate: gate_rx,
    })
    .unwrap();

    // Park the worker inside a load so the writes pile up behind it
    let (loaded_tx, loaded_rx) = mpsc::channel();
    handle.load("bookmarks", Box::new(move |_| loaded_tx.send(()).unwrap()));
    entered_rx.recv().unwrap();
    for seq in 1..=5u64 {
        handle.write(seq, "bookmarks", format!("[{}]", seq));
    }
    gate_tx.send(()).unwrap();
    loaded_rx.recv().unwrap();
    handle.flush_blocking();

    let stats = handle.stats();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.coalesced, 4);
    assert_eq!(stats.last_written_seq, 5);
    assert_eq!(kv.snapshot("bookmarks").as_deref(), Some("[5]"));
}

#[test]
fn test_writes_to_different_keys_are_not_coalesced() {
    let kv = MemoryKeyValueStore::new();
    let handle = PersistenceHandle::spawn(kv.clone()).unwrap();

    handle.write(1, "bookmarks", "[1]".to_string());
    handle.write(2, "reading-position", "\"2:255\"".to_string());
    handle.flush_blocking();

    assert_eq!(kv.snapshot("bookmarks").as_deref(), Some("[1]"));
    assert_eq!(kv.snapshot("reading-position").as_deref(), Some("\"2:255\""));
}

#[test]
fn test_failed_writes_are_counted_not_raised() {
    let handle = PersistenceHandle::spawn(BrokenStore).unwrap();

    handle.write(1, "bookmarks", "[]".to_string());
    handle.flush_blocking();
    handle.write(2, "bookmarks", "[]".to_string());
    handle.flush_blocking();

    let stats = handle.stats();
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.completed, 0);
    assert_eq!(stats.last_written_seq, 0);
}

#[tokio::test]
async fn test_async_flush_waits_for_prior_writes() {
    let kv = MemoryKeyValueStore::new();
    let handle = PersistenceHandle::spawn(kv.clone()).unwrap();

    handle.write(1, "bookmarks", "[\"a\"]".to_string());
    handle.flush().await;
    assert_eq!(kv.snapshot("bookmarks").as_deref(), Some("[\"a\"]"));
}

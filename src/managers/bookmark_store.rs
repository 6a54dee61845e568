//! Bookmark Store.
//!
//! Holds the authoritative, de-duplicated list of verse and chapter bookmarks,
//! newest first, and keeps a durable copy in sync through the persistence
//! worker. Every mutation is computed from the in-memory snapshot under a
//! lock, and the full collection is enqueued for writing before the lock is
//! released, so write issue order always matches mutation order.
//!
//! The initial load runs in the background. Until it settles the store reports
//! `is_loading() == true`; mutations made in that window apply to the
//! in-memory view at once, are held back from storage, and are replayed on top
//! of the loaded collection when it arrives.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, SubsecRound, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::services::notifier::Notifier;
use crate::services::persistence::{PersistenceHandle, PersistenceStats};
use crate::types::bookmark::{
    Bookmark, BookmarkId, BookmarkKind, NewChapterBookmark, NewVerseBookmark, ToggleOutcome,
    VerseKey,
};
use crate::types::errors::{BookmarkError, StorageError};
use crate::types::notification::Notification;

/// Trait defining bookmark store operations.
pub trait BookmarkStoreTrait {
    fn is_loading(&self) -> bool;
    fn is_verse_bookmarked(&self, verse_key: &VerseKey) -> bool;
    fn is_chapter_bookmarked(&self, chapter_id: u16) -> bool;
    fn toggle_verse_bookmark(&self, data: NewVerseBookmark) -> ToggleOutcome;
    fn toggle_chapter_bookmark(&self, data: NewChapterBookmark) -> ToggleOutcome;
    /// Snapshot of the collection, newest first.
    fn bookmarks(&self) -> Vec<Bookmark>;
    fn bookmarks_of_kind(&self, kind: BookmarkKind) -> Vec<Bookmark>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Removes every bookmark. Persisted like any other mutation, without a notification.
    fn clear(&self);
}

/// A mutation recorded while the initial load is in flight, replayed by intent.
#[derive(Debug, Clone)]
enum PendingChange {
    Upsert(Bookmark),
    Remove(BookmarkId),
    Clear,
}

impl PendingChange {
    fn apply(self, bookmarks: &mut Vec<Bookmark>) {
        match self {
            PendingChange::Upsert(bookmark) => {
                let id = bookmark.id();
                bookmarks.retain(|b| b.id() != id);
                bookmarks.insert(0, bookmark);
            }
            PendingChange::Remove(id) => bookmarks.retain(|b| b.id() != id),
            PendingChange::Clear => bookmarks.clear(),
        }
    }
}

#[derive(Debug)]
struct StoreState {
    bookmarks: Vec<Bookmark>,
    loading: bool,
    pending: Vec<PendingChange>,
    next_seq: u64,
}

/// State shared between the store and the load completion running on the worker.
struct Shared {
    state: Mutex<StoreState>,
    persistence: PersistenceHandle,
    storage_key: String,
    loaded_tx: watch::Sender<bool>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // Transitions never leave the collection half-mutated, so a poisoned
        // lock still guards a consistent collection.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records `change` for replay while loading, otherwise writes the collection.
    fn commit(&self, state: &mut StoreState, change: PendingChange) {
        if state.loading {
            state.pending.push(change);
        } else {
            self.persist(state);
        }
    }

    /// Enqueues a full-collection write. Must be called with the state lock held.
    fn persist(&self, state: &mut StoreState) {
        state.next_seq += 1;
        match serde_json::to_string(&state.bookmarks) {
            Ok(payload) => self
                .persistence
                .write(state.next_seq, &self.storage_key, payload),
            Err(e) => warn!(error = %e, "Failed to serialize bookmarks, skipping write"),
        }
    }

    fn finish_load(&self, result: Result<Option<String>, StorageError>) {
        let loaded = match result {
            Ok(Some(payload)) => decode_collection(&payload).unwrap_or_else(|e| {
                warn!(error = %e, "Persisted bookmarks are unreadable, starting empty");
                Vec::new()
            }),
            Ok(None) => {
                debug!(key = %self.storage_key, "No persisted bookmarks");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load bookmarks, starting empty");
                Vec::new()
            }
        };

        let mut state = self.lock();
        if !state.loading {
            return;
        }
        let pending = std::mem::take(&mut state.pending);
        let replayed = pending.len();
        state.bookmarks = loaded;
        for change in pending {
            change.apply(&mut state.bookmarks);
        }
        state.loading = false;
        if replayed > 0 {
            self.persist(&mut state);
        }
        debug!(count = state.bookmarks.len(), replayed, "Bookmarks loaded");
        drop(state);

        self.loaded_tx.send_replace(true);
    }
}

/// Parses a persisted collection, keeping only the first (newest) bookmark per id.
///
/// Verse entries whose key disagrees with their chapter and verse fields are dropped.
fn decode_collection(payload: &str) -> Result<Vec<Bookmark>, BookmarkError> {
    let decoded: Vec<Bookmark> = serde_json::from_str(payload)?;
    let total = decoded.len();
    let (consistent, mismatched): (Vec<Bookmark>, Vec<Bookmark>) =
        decoded.into_iter().partition(|b| match b {
            Bookmark::Verse(verse) => verse.key_matches_fields(),
            Bookmark::Chapter(_) => true,
        });
    if !mismatched.is_empty() {
        warn!(
            dropped = mismatched.len(),
            "Dropped persisted verse bookmarks whose key disagrees with their fields"
        );
    }

    let mut seen = HashSet::new();
    let bookmarks: Vec<Bookmark> = consistent
        .into_iter()
        .filter(|b| seen.insert(b.id()))
        .collect();
    let duplicates = total - mismatched.len() - bookmarks.len();
    if duplicates > 0 {
        debug!(dropped = duplicates, "Dropped duplicate persisted bookmarks");
    }
    Ok(bookmarks)
}

/// Current time at the precision the stored timestamps keep.
fn bookmark_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Bookmark store backed by a persistence worker and a notifier.
pub struct BookmarkStore {
    shared: Arc<Shared>,
    notifier: Arc<dyn Notifier>,
}

impl BookmarkStore {
    /// Creates a store and starts loading the collection stored under `storage_key`.
    ///
    /// Returns immediately with `is_loading() == true`.
    pub fn new(
        persistence: PersistenceHandle,
        storage_key: &str,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (loaded_tx, _) = watch::channel(false);
        let shared = Arc::new(Shared {
            state: Mutex::new(StoreState {
                bookmarks: Vec::new(),
                loading: true,
                pending: Vec::new(),
                next_seq: 0,
            }),
            persistence,
            storage_key: storage_key.to_string(),
            loaded_tx,
        });

        let loader = shared.clone();
        shared
            .persistence
            .load(storage_key, Box::new(move |result| loader.finish_load(result)));

        Self { shared, notifier }
    }

    /// Resolves once the initial load has settled (success, not found, or error).
    pub async fn wait_until_loaded(&self) {
        let mut loaded = self.shared.loaded_tx.subscribe();
        let _ = loaded.wait_for(|done| *done).await;
    }

    /// Resolves once every write issued so far has been attempted.
    pub async fn flush(&self) {
        self.shared.persistence.flush().await;
    }

    /// Blocking variant of [`flush`](Self::flush); not for use inside async code.
    pub fn flush_blocking(&self) {
        self.shared.persistence.flush_blocking();
    }

    pub fn persistence_stats(&self) -> PersistenceStats {
        self.shared.persistence.stats()
    }

    pub fn storage_key(&self) -> &str {
        &self.shared.storage_key
    }

    fn toggle(&self, id: BookmarkId, create: impl FnOnce() -> Bookmark) -> ToggleOutcome {
        let mut state = self.shared.lock();
        let (outcome, change) = match state.bookmarks.iter().position(|b| b.id() == id) {
            Some(index) => {
                state.bookmarks.remove(index);
                (ToggleOutcome::Removed, PendingChange::Remove(id))
            }
            None => {
                let bookmark = create();
                state.bookmarks.insert(0, bookmark.clone());
                (ToggleOutcome::Added, PendingChange::Upsert(bookmark))
            }
        };
        self.shared.commit(&mut state, change);
        drop(state);

        debug!(bookmark = %id, ?outcome, "Toggled bookmark");
        outcome
    }

    fn announce(&self, kind: BookmarkKind, outcome: ToggleOutcome) {
        let notification = Notification::for_toggle(kind, outcome);
        self.notifier.notify(&notification.message, notification.icon);
    }
}

impl BookmarkStoreTrait for BookmarkStore {
    fn is_loading(&self) -> bool {
        self.shared.lock().loading
    }

    fn is_verse_bookmarked(&self, verse_key: &VerseKey) -> bool {
        self.shared.lock().bookmarks.iter().any(|b| b.is_verse(verse_key))
    }

    fn is_chapter_bookmarked(&self, chapter_id: u16) -> bool {
        self.shared
            .lock()
            .bookmarks
            .iter()
            .any(|b| b.is_chapter(chapter_id))
    }

    fn toggle_verse_bookmark(&self, data: NewVerseBookmark) -> ToggleOutcome {
        let id = BookmarkId::Verse(data.verse_key());
        let outcome = self.toggle(id, || data.into_bookmark(bookmark_time()));
        self.announce(BookmarkKind::Verse, outcome);
        outcome
    }

    fn toggle_chapter_bookmark(&self, data: NewChapterBookmark) -> ToggleOutcome {
        let id = BookmarkId::Chapter(data.chapter_id);
        let outcome = self.toggle(id, || data.into_bookmark(bookmark_time()));
        self.announce(BookmarkKind::Chapter, outcome);
        outcome
    }

    fn bookmarks(&self) -> Vec<Bookmark> {
        self.shared.lock().bookmarks.clone()
    }

    fn bookmarks_of_kind(&self, kind: BookmarkKind) -> Vec<Bookmark> {
        self.shared
            .lock()
            .bookmarks
            .iter()
            .filter(|b| b.kind() == kind)
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.shared.lock().bookmarks.len()
    }

    fn clear(&self) {
        let mut state = self.shared.lock();
        state.bookmarks.clear();
        self.shared.commit(&mut state, PendingChange::Clear);
    }
}

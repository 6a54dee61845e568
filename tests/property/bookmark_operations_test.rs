//! Property-based tests for bookmark store toggles.
//!
//! Checks that arbitrary toggle sequences keep the collection free of
//! duplicates, newest first, and that the persisted snapshot matches memory
//! once background writes have drained.

use std::sync::Arc;

use proptest::prelude::*;
use quran_bookmarks::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use quran_bookmarks::services::notifier::BufferedNotifier;
use quran_bookmarks::services::persistence::PersistenceHandle;
use quran_bookmarks::services::storage::MemoryKeyValueStore;
use quran_bookmarks::types::bookmark::{
    Bookmark, BookmarkId, NewChapterBookmark, NewVerseBookmark, ToggleOutcome, VerseKey,
};

#[derive(Debug, Clone)]
enum Op {
    Verse(u16, u16),
    Chapter(u16),
    Clear,
}

impl Op {
    fn id(&self) -> Option<BookmarkId> {
        match self {
            Op::Verse(c, v) => Some(BookmarkId::Verse(VerseKey {
                chapter_id: *c,
                verse_number: *v,
            })),
            Op::Chapter(c) => Some(BookmarkId::Chapter(*c)),
            Op::Clear => None,
        }
    }
}

/// Small id ranges so sequences revisit the same bookmarks often.
fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => (1u16..=4, 1u16..=4).prop_map(|(c, v)| Op::Verse(c, v)),
        4 => (1u16..=4).prop_map(Op::Chapter),
        1 => Just(Op::Clear),
    ]
}

fn verse(chapter_id: u16, verse_number: u16) -> NewVerseBookmark {
    NewVerseBookmark {
        chapter_id,
        chapter_name: format!("Chapter {}", chapter_id),
        chapter_arabic_name: "سورة".to_string(),
        verse_number,
        arabic_text: String::new(),
        translation_preview: String::new(),
    }
}

fn chapter(chapter_id: u16) -> NewChapterBookmark {
    NewChapterBookmark {
        chapter_id,
        chapter_name: format!("Chapter {}", chapter_id),
        chapter_arabic_name: "سورة".to_string(),
        verses_count: 7,
    }
}

fn open(kv: &MemoryKeyValueStore) -> BookmarkStore {
    let persistence = PersistenceHandle::spawn(kv.clone()).expect("spawn persistence worker");
    let store = BookmarkStore::new(persistence, "bookmarks", Arc::new(BufferedNotifier::new()));
    store.flush_blocking();
    store
}

fn apply(store: &BookmarkStore, op: &Op) -> Option<ToggleOutcome> {
    match op {
        Op::Verse(c, v) => Some(store.toggle_verse_bookmark(verse(*c, *v))),
        Op::Chapter(c) => Some(store.toggle_chapter_bookmark(chapter(*c))),
        Op::Clear => {
            store.clear();
            None
        }
    }
}

fn ids(bookmarks: &[Bookmark]) -> Vec<BookmarkId> {
    bookmarks.iter().map(Bookmark::id).collect()
}

// **Property: toggle twice restores membership**
//
// *For any* starting collection and any bookmark, toggling it twice leaves
// the collection's ids exactly as they were, apart from position.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn toggle_twice_restores_membership(
        setup in prop::collection::vec(arb_op(), 0..12),
        target in arb_op().prop_filter("toggle op", |op| op.id().is_some()),
    ) {
        let kv = MemoryKeyValueStore::new();
        let store = open(&kv);
        for op in &setup {
            apply(&store, op);
        }

        let mut before = ids(&store.bookmarks());
        let first = apply(&store, &target).unwrap();
        let second = apply(&store, &target).unwrap();
        prop_assert_ne!(first, second);

        let mut after = ids(&store.bookmarks());
        before.sort_by_key(|id| id.to_string());
        after.sort_by_key(|id| id.to_string());
        prop_assert_eq!(before, after);
    }
}

// **Property: toggles match a newest-first model**
//
// *For any* sequence of toggles and clears, the store's ids equal a simple
// move-to-front model, contain no duplicates, and the persisted payload
// equals the in-memory collection once writes have drained.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn toggle_sequence_matches_model_and_persists(
        ops in prop::collection::vec(arb_op(), 1..40),
    ) {
        let kv = MemoryKeyValueStore::new();
        let store = open(&kv);
        let mut model: Vec<BookmarkId> = Vec::new();

        for op in &ops {
            let outcome = apply(&store, op);
            match op.id() {
                Some(id) => {
                    let expected = match model.iter().position(|m| *m == id) {
                        Some(index) => {
                            model.remove(index);
                            ToggleOutcome::Removed
                        }
                        None => {
                            model.insert(0, id);
                            ToggleOutcome::Added
                        }
                    };
                    prop_assert_eq!(outcome, Some(expected));
                }
                None => model.clear(),
            }
        }

        let in_memory = store.bookmarks();
        let memory_ids = ids(&in_memory);
        prop_assert_eq!(&memory_ids, &model);

        let mut unique = memory_ids.clone();
        unique.sort_by_key(|id| id.to_string());
        unique.dedup();
        prop_assert_eq!(unique.len(), memory_ids.len());

        store.flush_blocking();
        let payload = kv.snapshot("bookmarks").expect("a write was issued");
        let persisted: Vec<Bookmark> = serde_json::from_str(&payload).unwrap();
        prop_assert_eq!(persisted, in_memory);
    }
}

// **Property: a reopened store sees the same collection**
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn reopened_store_loads_persisted_collection(
        ops in prop::collection::vec(arb_op(), 1..20),
    ) {
        let kv = MemoryKeyValueStore::new();
        let expected = {
            let store = open(&kv);
            for op in &ops {
                apply(&store, op);
            }
            store.flush_blocking();
            store.bookmarks()
        };

        let reopened = open(&kv);
        prop_assert!(!reopened.is_loading());
        prop_assert_eq!(reopened.bookmarks(), expected);
    }
}

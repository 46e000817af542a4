use quicknote_core::{
    InMemoryNoteStore, Note, NoteStore, NoteTag, PageRequest, SqliteNoteStore, StoreError,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;
use uuid::Uuid;

fn sqlite_store() -> SqliteNoteStore {
    SqliteNoteStore::open_in_memory().unwrap()
}

fn tags(values: &[NoteTag]) -> BTreeSet<NoteTag> {
    values.iter().copied().collect()
}

fn save_assigns_id_and_roundtrips(store: &impl NoteStore) {
    let note = Note::with_created_at("first", "body", [NoteTag::Important], 1_000);
    let saved = store.save(&note).unwrap();

    let id = saved.id.expect("store must assign an id");
    let loaded = store.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.title, "first");
    assert_eq!(loaded.created_at, 1_000);
    assert_eq!(loaded.tags, tags(&[NoteTag::Important]));
}

fn save_overwrites_but_keeps_created_at(store: &impl NoteStore) {
    let saved = store
        .save(&Note::with_created_at("v1", "body", [NoteTag::Business], 5))
        .unwrap();

    let mut changed = saved.clone();
    changed.title = "v2".to_string();
    changed.tags = tags(&[NoteTag::Personal]);
    changed.created_at = 99;
    let resaved = store.save(&changed).unwrap();

    assert_eq!(resaved.id, saved.id);
    assert_eq!(resaved.title, "v2");
    assert_eq!(resaved.created_at, 5);
    assert_eq!(resaved.tags, tags(&[NoteTag::Personal]));
}

fn delete_is_idempotent(store: &impl NoteStore) {
    let saved = store.save(&Note::new("t", "x", [])).unwrap();
    let id = saved.id.unwrap();

    store.delete_by_id(id).unwrap();
    store.delete_by_id(id).unwrap();
    store.delete_by_id(Uuid::new_v4()).unwrap();
    assert!(store.find_by_id(id).unwrap().is_none());
}

fn pages_are_newest_first_and_cover_everything(store: &impl NoteStore) {
    for created_at in [30, 10, 50, 20, 40] {
        store
            .save(&Note::with_created_at(
                format!("n{created_at}"),
                "body",
                [],
                created_at,
            ))
            .unwrap();
    }

    let mut collected = Vec::new();
    let first = store.find_all(&PageRequest::new(0, 2)).unwrap();
    assert_eq!(first.total_elements, 5);
    assert_eq!(first.total_pages(), 3);
    for page in 0..first.total_pages() as u32 {
        let slice = store.find_all(&PageRequest::new(page, 2)).unwrap();
        assert!(slice.content.len() <= 2);
        collected.extend(slice.content.into_iter().map(|note| note.created_at));
    }
    assert_eq!(collected, vec![50, 40, 30, 20, 10]);

    let beyond = store.find_all(&PageRequest::new(7, 2)).unwrap();
    assert!(beyond.content.is_empty());
    assert_eq!(beyond.total_elements, 5);
}

fn tag_filter_matches_any_requested_tag(store: &impl NoteStore) {
    store
        .save(&Note::with_created_at("work", "x", [NoteTag::Business], 1))
        .unwrap();
    store
        .save(&Note::with_created_at(
            "both",
            "x",
            [NoteTag::Personal, NoteTag::Important],
            2,
        ))
        .unwrap();
    store
        .save(&Note::with_created_at("home", "x", [NoteTag::Personal], 3))
        .unwrap();
    store
        .save(&Note::with_created_at("plain", "x", [], 4))
        .unwrap();

    let page = store
        .find_by_tags_in(
            &tags(&[NoteTag::Business, NoteTag::Important]),
            &PageRequest::new(0, 10),
        )
        .unwrap();
    let titles: Vec<_> = page.content.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["both", "work"]);
    assert_eq!(page.total_elements, 2);

    let none = store
        .find_by_tags_in(&BTreeSet::new(), &PageRequest::new(0, 10))
        .unwrap();
    assert!(none.content.is_empty());
}

fn equal_timestamps_have_stable_order(store: &impl NoteStore) {
    for idx in 0..4 {
        store
            .save(&Note::with_created_at(format!("tie{idx}"), "x", [], 7))
            .unwrap();
    }
    let first = store.find_all(&PageRequest::new(0, 10)).unwrap();
    let second = store.find_all(&PageRequest::new(0, 10)).unwrap();
    assert_eq!(first.content, second.content);

    let ids: Vec<_> = first.content.iter().map(|n| n.id.unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

macro_rules! store_contract {
    ($module:ident, $factory:expr) => {
        mod $module {
            use super::*;

            #[test]
            fn save_assigns_id() {
                save_assigns_id_and_roundtrips(&$factory);
            }

            #[test]
            fn save_keeps_created_at() {
                save_overwrites_but_keeps_created_at(&$factory);
            }

            #[test]
            fn delete_idempotent() {
                delete_is_idempotent(&$factory);
            }

            #[test]
            fn paging() {
                pages_are_newest_first_and_cover_everything(&$factory);
            }

            #[test]
            fn tag_filter() {
                tag_filter_matches_any_requested_tag(&$factory);
            }

            #[test]
            fn stable_ties() {
                equal_timestamps_have_stable_order(&$factory);
            }
        }
    };
}

store_contract!(sqlite, sqlite_store());
store_contract!(memory, InMemoryNoteStore::new());

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let id = {
        let store = SqliteNoteStore::open(&path).unwrap();
        store
            .save(&Note::new("kept", "on disk", [NoteTag::Important]))
            .unwrap()
            .id
            .unwrap()
    };

    let reopened = SqliteNoteStore::open(&path).unwrap();
    let loaded = reopened.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.title, "kept");
    assert_eq!(loaded.tags, tags(&[NoteTag::Important]));
}

#[test]
fn sqlite_store_rejects_unmigrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = SqliteNoteStore::try_new(conn).err().unwrap();
    assert!(matches!(err, StoreError::MissingRequiredTable("notes")));
}

#[test]
fn sqlite_store_is_shareable_across_threads() {
    let store = Arc::new(sqlite_store());
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for idx in 0..5 {
                    store
                        .save(&Note::new(format!("w{worker}-{idx}"), "x", []))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let page = store.find_all(&PageRequest::new(0, 100)).unwrap();
    assert_eq!(page.total_elements, 20);
}

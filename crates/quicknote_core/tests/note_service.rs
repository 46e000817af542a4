use quicknote_core::{
    InMemoryNoteStore, Note, NoteDraft, NotePatch, NoteService, NoteServiceError, NoteStore,
    NoteTag, SqliteNoteStore, TITLE_MAX_CHARS,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;
use uuid::Uuid;

fn service() -> NoteService<SqliteNoteStore> {
    NoteService::new(SqliteNoteStore::open_in_memory().unwrap())
}

fn tags(values: &[NoteTag]) -> BTreeSet<NoteTag> {
    values.iter().copied().collect()
}

#[test]
fn create_returns_input_fields_and_stable_identity() {
    let service = service();
    let created = service
        .create_note(NoteDraft::new(
            "Shopping List",
            "Buy milk, eggs, and bread",
            [NoteTag::Personal, NoteTag::Important],
        ))
        .unwrap();

    assert_eq!(created.title, "Shopping List");
    assert_eq!(created.text, "Buy milk, eggs, and bread");
    assert_eq!(created.tags, tags(&[NoteTag::Personal, NoteTag::Important]));
    assert!(created.created_at > 0);

    let id = created.id.unwrap();
    let loaded = service.get_note(id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_reports_every_invalid_field_without_writing() {
    let service = service();
    let err = service
        .create_note(NoteDraft::new(" ", "x".repeat(10_001), []))
        .unwrap_err();

    match err {
        NoteServiceError::Validation(errors) => {
            assert_eq!(errors.get("title"), Some("Title is mandatory"));
            assert!(errors.get("text").unwrap().contains("10000"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.list_notes(None, 0, 10).unwrap().total_elements, 0);
}

#[test]
fn missing_and_deleted_notes_are_not_found() {
    let service = service();
    let missing = Uuid::new_v4();
    assert!(matches!(
        service.get_note(missing),
        Err(NoteServiceError::NotFound(id)) if id == missing
    ));

    let created = service
        .create_note(NoteDraft::new("t", "body", []))
        .unwrap();
    let id = created.id.unwrap();
    service.delete_note(id).unwrap();
    service.delete_note(id).unwrap();

    let err = service.get_note(id).unwrap_err();
    assert_eq!(err.to_string(), format!("note not found with id: {id}"));
}

#[test]
fn list_pages_concatenate_to_filtered_set_newest_first() {
    let service = service();
    let store = service.store();
    let mut expected = Vec::new();
    for idx in 0..7_i64 {
        let tag = if idx % 2 == 0 {
            NoteTag::Business
        } else {
            NoteTag::Personal
        };
        let saved = store
            .save(&Note::with_created_at(
                format!("note {idx}"),
                "body",
                [tag],
                1_000 + idx,
            ))
            .unwrap();
        if tag == NoteTag::Business {
            expected.push(saved.id.unwrap());
        }
    }
    expected.reverse();

    let filter = tags(&[NoteTag::Business]);
    let first = service.list_notes(Some(&filter), 0, 3).unwrap();
    assert_eq!(first.total_elements, 4);

    let mut collected = Vec::new();
    for page in 0..first.total_pages() as u32 {
        let slice = service.list_notes(Some(&filter), page, 3).unwrap();
        assert!(slice.content.len() <= 3);
        collected.extend(slice.content.iter().map(|note| note.id.unwrap()));
    }
    assert_eq!(collected, expected);
}

#[test]
fn list_with_empty_filter_lists_everything() {
    let service = service();
    service
        .create_note(NoteDraft::new("a", "x", [NoteTag::Important]))
        .unwrap();
    service.create_note(NoteDraft::new("b", "x", [])).unwrap();

    let page = service.list_notes(Some(&BTreeSet::new()), 0, 10).unwrap();
    assert_eq!(page.total_elements, 2);
    assert_eq!(page.number_of_elements(), 2);
}

#[test]
fn out_of_range_page_is_empty_with_real_total() {
    let service = service();
    service.create_note(NoteDraft::new("a", "x", [])).unwrap();

    let page = service.list_notes(None, 5, 10).unwrap();
    assert!(page.content.is_empty());
    assert_eq!(page.total_elements, 1);
}

#[test]
fn full_update_replaces_fields_and_keeps_identity() {
    let service = service();
    let created = service
        .create_note(NoteDraft::new("old", "old body", [NoteTag::Business]))
        .unwrap();
    let id = created.id.unwrap();

    let updated = service
        .update_note(id, NoteDraft::new("new", "new body", []))
        .unwrap();
    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.title, "new");
    assert_eq!(updated.text, "new body");
    assert!(updated.tags.is_empty());
}

#[test]
fn full_update_validates_before_lookup() {
    let service = service();
    let err = service
        .update_note(Uuid::new_v4(), NoteDraft::new("", "body", []))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::Validation(_)));

    let err = service
        .update_note(Uuid::new_v4(), NoteDraft::new("ok", "body", []))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::NotFound(_)));
}

#[test]
fn patch_with_title_only_leaves_other_fields() {
    let service = service();
    let created = service
        .create_note(NoteDraft::new("title", "body", [NoteTag::Important]))
        .unwrap();
    let id = created.id.unwrap();

    let patched = service
        .patch_note(id, NotePatch::default().title("renamed"))
        .unwrap();
    assert_eq!(patched.title, "renamed");
    assert_eq!(patched.text, "body");
    assert_eq!(patched.tags, tags(&[NoteTag::Important]));
    assert_eq!(patched.created_at, created.created_at);
}

#[test]
fn patch_can_clear_tags() {
    let service = service();
    let created = service
        .create_note(NoteDraft::new("title", "body", [NoteTag::Important]))
        .unwrap();

    let patched = service
        .patch_note(created.id.unwrap(), NotePatch::default().tags([]))
        .unwrap();
    assert!(patched.tags.is_empty());
}

#[test]
fn empty_patch_is_noop_but_still_requires_existing_note() {
    let service = service();
    let created = service
        .create_note(NoteDraft::new("title", "body", []))
        .unwrap();

    let same = service
        .patch_note(created.id.unwrap(), NotePatch::default())
        .unwrap();
    assert_eq!(same, created);

    let err = service
        .patch_note(Uuid::new_v4(), NotePatch::default())
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::NotFound(_)));
}

#[test]
fn patch_rejects_blank_values_by_default() {
    let service = service();
    let created = service
        .create_note(NoteDraft::new("title", "body", []))
        .unwrap();
    let id = created.id.unwrap();

    let err = service
        .patch_note(id, NotePatch::default().text("   "))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::Validation(ref e) if e.get("text").is_some()));

    let err = service
        .patch_note(id, NotePatch::default().title("t".repeat(TITLE_MAX_CHARS + 1)))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::Validation(_)));
    assert_eq!(service.get_note(id).unwrap().text, "body");
}

#[test]
fn word_frequency_counts_words_of_stored_text() {
    let service = service();
    let created = service
        .create_note(NoteDraft::new("t", "Java is cool, java is powerful!", []))
        .unwrap();

    let stats = service.word_frequency(created.id.unwrap()).unwrap();
    let entries: Vec<_> = stats.iter().collect();
    assert_eq!(
        entries,
        vec![("java", 2), ("is", 2), ("cool", 1), ("powerful", 1)]
    );
}

#[test]
fn word_frequency_of_blank_text_is_empty() {
    let service = NoteService::new(InMemoryNoteStore::new());
    let saved = service
        .store()
        .save(&Note::new("t", "   \n ", []))
        .unwrap();

    let stats = service.word_frequency(saved.id.unwrap()).unwrap();
    assert!(stats.is_empty());
}

#[test]
fn word_frequency_of_missing_note_is_not_found() {
    let service = service();
    let err = service.word_frequency(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, NoteServiceError::NotFound(_)));
}

#[test]
fn service_is_callable_from_many_threads() {
    let service = Arc::new(NoteService::new(InMemoryNoteStore::new()));
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let created = service
                    .create_note(NoteDraft::new(format!("w{worker}"), "body text", []))
                    .unwrap();
                service.word_frequency(created.id.unwrap()).unwrap().len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 2);
    }
    assert_eq!(service.list_notes(None, 0, 10).unwrap().total_elements, 4);
}

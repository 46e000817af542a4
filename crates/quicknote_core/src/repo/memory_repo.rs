//! In-memory note store.
//!
//! Suitable for tests and embedding. Listing follows the same ordering
//! contract as the SQLite store (`created_at DESC`, then id ascending).

use crate::model::note::{Note, NoteId, NoteTag};
use crate::model::page::{Page, PageRequest};
use crate::repo::note_repo::{NoteStore, StoreError, StoreResult};
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;
use uuid::Uuid;

/// Lock-guarded map of notes keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryNoteStore {
    notes: RwLock<HashMap<NoteId, Note>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notes.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.notes.read().map_err(|_| StoreError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        self.len().map(|len| len == 0)
    }

    fn page_where(
        &self,
        request: &PageRequest,
        keep: impl Fn(&Note) -> bool,
    ) -> StoreResult<Page<Note>> {
        let notes = self.notes.read().map_err(|_| StoreError::Poisoned)?;
        let mut matching: Vec<&Note> = notes.values().filter(|note| keep(note)).collect();
        matching.sort_by_key(|note| (Reverse(note.created_at), note.id));

        let total = matching.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = matching
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .cloned()
            .collect();
        Ok(Page::new(content, *request, total))
    }
}

impl NoteStore for InMemoryNoteStore {
    fn save(&self, note: &Note) -> StoreResult<Note> {
        let mut notes = self.notes.write().map_err(|_| StoreError::Poisoned)?;
        let id = note.id.unwrap_or_else(Uuid::new_v4);

        let mut persisted = note.clone();
        persisted.id = Some(id);
        if let Some(existing) = notes.get(&id) {
            persisted.created_at = existing.created_at;
        }

        notes.insert(id, persisted.clone());
        Ok(persisted)
    }

    fn find_by_id(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let notes = self.notes.read().map_err(|_| StoreError::Poisoned)?;
        Ok(notes.get(&id).cloned())
    }

    fn delete_by_id(&self, id: NoteId) -> StoreResult<()> {
        let mut notes = self.notes.write().map_err(|_| StoreError::Poisoned)?;
        notes.remove(&id);
        Ok(())
    }

    fn find_all(&self, request: &PageRequest) -> StoreResult<Page<Note>> {
        self.page_where(request, |_| true)
    }

    fn find_by_tags_in(
        &self,
        tags: &BTreeSet<NoteTag>,
        request: &PageRequest,
    ) -> StoreResult<Page<Note>> {
        self.page_where(request, |note| note.has_any_tag(tags))
    }
}

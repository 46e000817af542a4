//! Note store contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the narrow persistence capability consumed by `NoteService`.
//! - Keep SQL details (tag join table, ordering, paging) inside this module.
//!
//! # Invariants
//! - Listing order is always `created_at DESC, uuid ASC`.
//! - `save` never rewrites `created_at` of an existing row.
//! - `save` replaces the whole tag set in the same transaction as the row.
//! - `delete_by_id` is a no-op for unknown ids.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::note::{Note, NoteId, NoteTag};
use crate::model::page::{Page, PageRequest};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    text,
    created_at
FROM notes";

const NOTE_ORDER_SQL: &str = " ORDER BY created_at DESC, uuid ASC LIMIT ? OFFSET ?";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure surfaced by store implementations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Persisted row could not be mapped back to a `Note`.
    InvalidData(String),
    /// Connection is missing a table the store depends on.
    MissingRequiredTable(&'static str),
    /// A previous holder of the store lock panicked.
    Poisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "note store requires table `{table}`; run migrations first")
            }
            Self::Poisoned => write!(f, "note store lock poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence capability consumed by the note service.
///
/// Implementations synchronize internally; every method takes `&self`.
pub trait NoteStore {
    /// Inserts or overwrites a note by id and returns the persisted state.
    ///
    /// A note without id gets a fresh one assigned.
    fn save(&self, note: &Note) -> StoreResult<Note>;
    fn find_by_id(&self, id: NoteId) -> StoreResult<Option<Note>>;
    /// Removes the note if present; unknown ids are not an error.
    fn delete_by_id(&self, id: NoteId) -> StoreResult<()>;
    /// Pages over every note, newest first.
    fn find_all(&self, request: &PageRequest) -> StoreResult<Page<Note>>;
    /// Pages over notes carrying at least one of `tags`, newest first.
    fn find_by_tags_in(
        &self,
        tags: &BTreeSet<NoteTag>,
        request: &PageRequest,
    ) -> StoreResult<Page<Note>>;
}

impl<T: NoteStore + ?Sized> NoteStore for std::sync::Arc<T> {
    fn save(&self, note: &Note) -> StoreResult<Note> {
        (**self).save(note)
    }

    fn find_by_id(&self, id: NoteId) -> StoreResult<Option<Note>> {
        (**self).find_by_id(id)
    }

    fn delete_by_id(&self, id: NoteId) -> StoreResult<()> {
        (**self).delete_by_id(id)
    }

    fn find_all(&self, request: &PageRequest) -> StoreResult<Page<Note>> {
        (**self).find_all(request)
    }

    fn find_by_tags_in(
        &self,
        tags: &BTreeSet<NoteTag>,
        request: &PageRequest,
    ) -> StoreResult<Page<Note>> {
        (**self).find_by_tags_in(tags, request)
    }
}

/// SQLite-backed note store.
///
/// Owns one connection behind a mutex, so a single store can be shared by
/// concurrent callers.
pub struct SqliteNoteStore {
    conn: Mutex<Connection>,
}

impl SqliteNoteStore {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when `notes`/`note_tags` are absent.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a fresh migrated in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn query_page(
        &self,
        filter_sql: &str,
        filter_values: Vec<Value>,
        request: &PageRequest,
    ) -> StoreResult<Page<Note>> {
        let conn = self.lock()?;

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM notes{filter_sql};"),
            params_from_iter(filter_values.iter()),
            |row| row.get(0),
        )?;

        let mut bind_values = filter_values;
        bind_values.push(Value::Integer(i64::from(request.size)));
        bind_values.push(Value::Integer(
            i64::try_from(request.offset()).unwrap_or(i64::MAX),
        ));

        let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL}{filter_sql}{NOTE_ORDER_SQL};"))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(&conn, row)?);
        }

        let total = u64::try_from(total)
            .map_err(|_| StoreError::InvalidData(format!("negative note count `{total}`")))?;
        Ok(Page::new(notes, *request, total))
    }
}

impl NoteStore for SqliteNoteStore {
    fn save(&self, note: &Note) -> StoreResult<Note> {
        let id = note.id.unwrap_or_else(Uuid::new_v4);
        let id_text = id.to_string();

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO notes (uuid, title, text, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (uuid) DO UPDATE SET
                title = excluded.title,
                text = excluded.text;",
            params![id_text, note.title, note.text, note.created_at],
        )?;
        tx.execute(
            "DELETE FROM note_tags WHERE note_uuid = ?1;",
            [id_text.as_str()],
        )?;
        for tag in &note.tags {
            tx.execute(
                "INSERT INTO note_tags (note_uuid, tag) VALUES (?1, ?2);",
                params![id_text, tag.as_str()],
            )?;
        }

        let persisted = {
            let mut stmt = tx.prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;
            let mut rows = stmt.query([id_text.as_str()])?;
            match rows.next()? {
                Some(row) => parse_note_row(&tx, row)?,
                None => {
                    return Err(StoreError::InvalidData(format!(
                        "note `{id_text}` missing after save"
                    )))
                }
            }
        };
        tx.commit()?;

        Ok(persisted)
    }

    fn find_by_id(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(&conn, row)?));
        }
        Ok(None)
    }

    fn delete_by_id(&self, id: NoteId) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;
        Ok(())
    }

    fn find_all(&self, request: &PageRequest) -> StoreResult<Page<Note>> {
        self.query_page("", Vec::new(), request)
    }

    fn find_by_tags_in(
        &self,
        tags: &BTreeSet<NoteTag>,
        request: &PageRequest,
    ) -> StoreResult<Page<Note>> {
        if tags.is_empty() {
            return Ok(Page::empty(*request));
        }

        let placeholders = vec!["?"; tags.len()].join(", ");
        let filter_sql = format!(
            " WHERE EXISTS (
                SELECT 1
                FROM note_tags nt
                WHERE nt.note_uuid = notes.uuid
                  AND nt.tag IN ({placeholders})
            )"
        );
        let values = tags
            .iter()
            .map(|tag| Value::Text(tag.as_str().to_string()))
            .collect();
        self.query_page(&filter_sql, values, request)
    }
}

fn parse_note_row(conn: &Connection, row: &Row<'_>) -> StoreResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    Ok(Note {
        id: Some(id),
        title: row.get("title")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
        tags: load_tags_for_note(conn, &uuid_text)?,
    })
}

fn load_tags_for_note(conn: &Connection, note_uuid: &str) -> StoreResult<BTreeSet<NoteTag>> {
    let mut stmt = conn.prepare_cached("SELECT tag FROM note_tags WHERE note_uuid = ?1;")?;
    let mut rows = stmt.query([note_uuid])?;
    let mut tags = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        let tag = NoteTag::parse(&value).ok_or_else(|| {
            StoreError::InvalidData(format!("invalid tag `{value}` in note_tags.tag"))
        })?;
        tags.insert(tag);
    }
    Ok(tags)
}

fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    for table in ["notes", "note_tags"] {
        if !table_exists(conn, table)? {
            return Err(StoreError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

//! Movie note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist notes together with their initial tag batch.
//! - Load notes with or without their tags attached.
//! - Apply partial updates and cascading deletes.
//!
//! # Invariants
//! - Owner existence check, note insert and tag inserts share one
//!   transaction; any failure leaves no rows behind.
//! - Deleting a note removes its tags through `ON DELETE CASCADE`.
//! - Lists are ordered by id so repeated reads are identical.

use crate::model::movie_note::{MovieNote, NoteInput, NoteUpdate, Rating};
use crate::model::movie_tag::NewMovieTag;
use crate::model::{Entity, NoteId};
use crate::repo::tag_repo::{insert_tags, load_tags_for_note};
use crate::repo::{ensure_tables, record_exists, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    rating,
    user_id,
    created_at,
    updated_at
FROM movie_notes";

/// Repository interface for movie notes.
pub trait NoteRepository {
    /// Creates a note for an existing user plus one tag per `input.tags` name.
    fn create_note(&mut self, input: &NoteInput) -> RepoResult<MovieNote>;
    /// Gets one note; `with_tags` eagerly attaches its tags.
    fn get_note(&self, id: NoteId, with_tags: bool) -> RepoResult<Option<MovieNote>>;
    /// Lists every note ordered by id; `with_tags` eagerly attaches tags.
    fn list_notes(&self, with_tags: bool) -> RepoResult<Vec<MovieNote>>;
    /// Overwrites the fields present in `update` and returns the stored note.
    fn update_note(&mut self, id: NoteId, update: &NoteUpdate) -> RepoResult<MovieNote>;
    /// Deletes a note and, by cascade, all of its tags.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed movie note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users", "movie_notes", "movie_tags"])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&mut self, input: &NoteInput) -> RepoResult<MovieNote> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !record_exists(&tx, "users", input.user_id)? {
            return Err(RepoError::NotFound {
                entity: Entity::User,
                id: input.user_id,
            });
        }

        let note = input.validate()?;
        tx.execute(
            "INSERT INTO movie_notes (title, description, rating, user_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                note.title(),
                note.description(),
                note.rating().value(),
                note.user_id(),
            ],
        )?;
        let id = tx.last_insert_rowid();

        if !input.tags.is_empty() {
            let batch = NewMovieTag::batch(id, &input.tags)?;
            insert_tags(&tx, &batch)?;
        }

        let created = fetch_note(&tx, id)?.ok_or(RepoError::NotFound {
            entity: Entity::MovieNote,
            id,
        })?;
        tx.commit()?;
        Ok(created)
    }

    fn get_note(&self, id: NoteId, with_tags: bool) -> RepoResult<Option<MovieNote>> {
        let Some(mut note) = fetch_note(self.conn, id)? else {
            return Ok(None);
        };
        if with_tags {
            note.tags = Some(load_tags_for_note(self.conn, note.id)?);
        }
        Ok(Some(note))
    }

    fn list_notes(&self, with_tags: bool) -> RepoResult<Vec<MovieNote>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            let mut note = parse_note_row(row)?;
            if with_tags {
                note.tags = Some(load_tags_for_note(self.conn, note.id)?);
            }
            notes.push(note);
        }
        Ok(notes)
    }

    fn update_note(&mut self, id: NoteId, update: &NoteUpdate) -> RepoResult<MovieNote> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current = fetch_note(&tx, id)?.ok_or(RepoError::NotFound {
            entity: Entity::MovieNote,
            id,
        })?;

        let merged = update.apply_to(&current)?;
        tx.execute(
            "UPDATE movie_notes
             SET
                title = ?2,
                description = ?3,
                rating = ?4,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1;",
            params![
                id,
                merged.title(),
                merged.description(),
                merged.rating().value(),
            ],
        )?;

        let updated = fetch_note(&tx, id)?.ok_or(RepoError::NotFound {
            entity: Entity::MovieNote,
            id,
        })?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM movie_notes WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::MovieNote,
                id,
            });
        }

        Ok(())
    }
}

fn fetch_note(conn: &Connection, id: NoteId) -> RepoResult<Option<MovieNote>> {
    let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
    let note = stmt
        .query_row([id], |row| Ok(parse_note_row(row)))
        .optional()?;
    note.transpose()
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<MovieNote> {
    let id: NoteId = row.get("id")?;
    let raw_rating: i64 = row.get("rating")?;
    let rating = Rating::new(raw_rating).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid rating `{raw_rating}` in movie_notes.rating for id {id}"
        ))
    })?;

    Ok(MovieNote {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        rating,
        user_id: row.get("user_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        tags: None,
    })
}

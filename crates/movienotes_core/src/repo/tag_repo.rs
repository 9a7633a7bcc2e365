//! Movie tag repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Create tags one at a time or in atomic batches.
//! - Delete tags scoped by both owning note id and tag id.
//!
//! # Invariants
//! - A tag is only inserted after its note is confirmed to exist, inside the
//!   same transaction.
//! - A tag id that belongs to another note is reported as `NotFound`.

use crate::model::movie_tag::{MovieTag, NewMovieTag};
use crate::model::{Entity, NoteId, TagId};
use crate::repo::{ensure_tables, record_exists, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const TAG_SELECT_SQL: &str = "SELECT
    id,
    name,
    note_id,
    created_at,
    updated_at
FROM movie_tags";

/// Repository interface for movie tags.
pub trait TagRepository {
    /// Creates one tag for an existing note.
    fn create_tag(&mut self, note_id: NoteId, name: Option<String>) -> RepoResult<MovieTag>;
    /// Creates one tag per name in a single transaction; all or nothing.
    fn bulk_create_tags(&mut self, note_id: NoteId, names: &[String])
        -> RepoResult<Vec<MovieTag>>;
    /// Gets one tag only if it belongs to `note_id`.
    fn get_tag(&self, note_id: NoteId, tag_id: TagId) -> RepoResult<Option<MovieTag>>;
    /// Deletes one tag scoped to its owning note.
    fn delete_tag(&self, note_id: NoteId, tag_id: TagId) -> RepoResult<()>;
}

/// SQLite-backed movie tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["movie_notes", "movie_tags"])?;
        Ok(Self { conn })
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn create_tag(&mut self, note_id: NoteId, name: Option<String>) -> RepoResult<MovieTag> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_note_exists(&tx, note_id)?;

        let tag = NewMovieTag::new(note_id, name)?;
        let mut created = insert_tags(&tx, std::slice::from_ref(&tag))?;
        tx.commit()?;

        created.pop().ok_or_else(|| {
            RepoError::InvalidData("tag insert returned no row".to_string())
        })
    }

    fn bulk_create_tags(
        &mut self,
        note_id: NoteId,
        names: &[String],
    ) -> RepoResult<Vec<MovieTag>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_note_exists(&tx, note_id)?;

        let tags = NewMovieTag::batch(note_id, names)?;
        let created = insert_tags(&tx, &tags)?;
        tx.commit()?;
        Ok(created)
    }

    fn get_tag(&self, note_id: NoteId, tag_id: TagId) -> RepoResult<Option<MovieTag>> {
        fetch_tag(self.conn, note_id, tag_id)
    }

    fn delete_tag(&self, note_id: NoteId, tag_id: TagId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM movie_tags WHERE id = ?1 AND note_id = ?2;",
            params![tag_id, note_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::MovieTag,
                id: tag_id,
            });
        }

        Ok(())
    }
}

/// Inserts already-validated tags and returns them in input order.
///
/// Callers own the transaction; a failure midway leaves rollback to them.
pub(crate) fn insert_tags(conn: &Connection, tags: &[NewMovieTag]) -> RepoResult<Vec<MovieTag>> {
    let mut insert = conn.prepare(
        "INSERT INTO movie_tags (name, note_id)
         VALUES (?1, ?2);",
    )?;
    let mut created = Vec::with_capacity(tags.len());
    for tag in tags {
        insert.execute(params![tag.name(), tag.note_id()])?;
        let id = conn.last_insert_rowid();
        let row = fetch_tag(conn, tag.note_id(), id)?.ok_or(RepoError::NotFound {
            entity: Entity::MovieTag,
            id,
        })?;
        created.push(row);
    }
    Ok(created)
}

pub(crate) fn load_tags_for_note(conn: &Connection, note_id: NoteId) -> RepoResult<Vec<MovieTag>> {
    let mut stmt = conn.prepare(&format!(
        "{TAG_SELECT_SQL} WHERE note_id = ?1 ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([note_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(parse_tag_row(row)?);
    }
    Ok(tags)
}

fn fetch_tag(conn: &Connection, note_id: NoteId, tag_id: TagId) -> RepoResult<Option<MovieTag>> {
    let mut stmt = conn.prepare(&format!(
        "{TAG_SELECT_SQL} WHERE id = ?1 AND note_id = ?2;"
    ))?;
    let tag = stmt
        .query_row(params![tag_id, note_id], |row| Ok(parse_tag_row(row)))
        .optional()?;
    tag.transpose()
}

fn ensure_note_exists(conn: &Connection, note_id: NoteId) -> RepoResult<()> {
    if record_exists(conn, "movie_notes", note_id)? {
        Ok(())
    } else {
        Err(RepoError::NotFound {
            entity: Entity::MovieNote,
            id: note_id,
        })
    }
}

fn parse_tag_row(row: &Row<'_>) -> RepoResult<MovieTag> {
    Ok(MovieTag {
        id: row.get("id")?,
        name: row.get("name")?,
        note_id: row.get("note_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

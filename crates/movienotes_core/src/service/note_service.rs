//! Movie note use cases.
//!
//! # Responsibility
//! - Create notes (with an optional tag batch) for existing users.
//! - List, partially update and delete notes; expose a note's tags.
//!
//! # Invariants
//! - Creation is atomic: owner check, note row and tag rows commit together.
//! - Partial update uses presence-of-key semantics (`NoteUpdate`).

use crate::model::movie_note::{MovieNote, NoteInput, NoteUpdate};
use crate::model::movie_tag::MovieTag;
use crate::model::{Entity, NoteId, UserId};
use crate::repo::note_repo::NoteRepository;
use crate::service::ServiceError;
use log::info;
use serde::Deserialize;

/// Request model for creating a note.
///
/// Every field is optional at this layer; missing required values surface
/// from the repository as persistence failures, a missing owner as
/// `NotFound(User)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note and its tags. The returned note has no tags attached.
    pub fn create_note(&mut self, request: CreateNoteRequest) -> Result<MovieNote, ServiceError> {
        let user_id = request
            .user_id
            .ok_or(ServiceError::NotFound(Entity::User))?;
        let input = NoteInput {
            title: request.title,
            description: request.description,
            rating: request.rating,
            user_id,
            tags: request.tags.unwrap_or_default(),
        };

        let note = self.repo.create_note(&input)?;
        info!(
            "event=note_create module=service status=ok note_id={} user_id={} tag_count={}",
            note.id,
            note.user_id,
            input.tags.len()
        );
        Ok(note)
    }

    /// Lists every note with its tags attached.
    pub fn list_notes(&self) -> Result<Vec<MovieNote>, ServiceError> {
        Ok(self.repo.list_notes(true)?)
    }

    /// Gets one note, optionally with its tags.
    pub fn get_note(&self, id: NoteId, with_tags: bool) -> Result<MovieNote, ServiceError> {
        self.repo
            .get_note(id, with_tags)?
            .ok_or(ServiceError::NotFound(Entity::MovieNote))
    }

    /// Returns the tags of one note.
    pub fn note_tags(&self, id: NoteId) -> Result<Vec<MovieTag>, ServiceError> {
        let note = self.get_note(id, true)?;
        Ok(note.tags.unwrap_or_default())
    }

    /// Applies a partial update and returns the stored note without tags.
    pub fn update_note(
        &mut self,
        id: NoteId,
        update: &NoteUpdate,
    ) -> Result<MovieNote, ServiceError> {
        let note = self.repo.update_note(id, update)?;
        info!("event=note_update module=service status=ok note_id={id}");
        Ok(note)
    }

    /// Deletes one note; its tags are removed by cascade.
    pub fn delete_note(&self, id: NoteId) -> Result<(), ServiceError> {
        self.repo.delete_note(id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }
}

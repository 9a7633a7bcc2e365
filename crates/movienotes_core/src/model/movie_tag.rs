//! Movie tag model.
//!
//! # Invariants
//! - A tag always references the note it was created for.
//! - Tag names are never blank.

use super::{required_text, Entity, ModelValidationError, NoteId, TagId};
use serde::Serialize;

const ENTITY: Entity = Entity::MovieTag;

/// Persisted tag attached to one movie note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieTag {
    pub id: TagId,
    pub name: String,
    pub note_id: NoteId,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Validated tag write model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovieTag {
    name: String,
    note_id: NoteId,
}

impl NewMovieTag {
    pub fn new(note_id: NoteId, name: Option<String>) -> Result<Self, ModelValidationError> {
        Ok(Self {
            name: required_text(ENTITY, "name", name)?,
            note_id,
        })
    }

    /// Validates a batch of names for one note, failing on the first bad one.
    pub fn batch(note_id: NoteId, names: &[String]) -> Result<Vec<Self>, ModelValidationError> {
        names
            .iter()
            .map(|name| Self::new(note_id, Some(name.clone())))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn note_id(&self) -> NoteId {
        self.note_id
    }
}

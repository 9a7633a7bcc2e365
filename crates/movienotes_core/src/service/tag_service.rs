//! Movie tag use cases.

use crate::model::movie_tag::MovieTag;
use crate::model::{Entity, NoteId, TagId};
use crate::repo::tag_repo::TagRepository;
use crate::service::ServiceError;
use log::info;

/// Tag service facade over repository implementations.
pub struct TagService<R: TagRepository> {
    repo: R,
}

impl<R: TagRepository> TagService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Attaches one tag to an existing note.
    pub fn add_tag(
        &mut self,
        note_id: NoteId,
        name: Option<String>,
    ) -> Result<MovieTag, ServiceError> {
        let tag = self.repo.create_tag(note_id, name)?;
        info!(
            "event=tag_create module=service status=ok note_id={note_id} tag_id={}",
            tag.id
        );
        Ok(tag)
    }

    /// Attaches one tag per name; either all are stored or none.
    pub fn bulk_create_tags(
        &mut self,
        note_id: NoteId,
        names: &[String],
    ) -> Result<Vec<MovieTag>, ServiceError> {
        Ok(self.repo.bulk_create_tags(note_id, names)?)
    }

    /// Gets one tag scoped to its owning note.
    pub fn get_tag(&self, note_id: NoteId, tag_id: TagId) -> Result<MovieTag, ServiceError> {
        self.repo
            .get_tag(note_id, tag_id)?
            .ok_or(ServiceError::NotFound(Entity::MovieTag))
    }

    /// Deletes a tag only when it belongs to `note_id`.
    pub fn delete_tag(&self, note_id: NoteId, tag_id: TagId) -> Result<(), ServiceError> {
        self.repo.delete_tag(note_id, tag_id)?;
        info!("event=tag_delete module=service status=ok note_id={note_id} tag_id={tag_id}");
        Ok(())
    }
}

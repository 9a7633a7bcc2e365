//! Movie review note model.
//!
//! # Responsibility
//! - Define the persisted note record and its optional tag association.
//! - Validate note fields (title, rating) at construction time.
//! - Describe partial updates with explicit per-field presence.
//!
//! # Invariants
//! - `rating` is always within `Rating::MIN..=Rating::MAX`.
//! - `tags` is `Some` only when associations were eagerly loaded.

use super::movie_tag::MovieTag;
use super::{required_text, Entity, ModelValidationError, NoteId, UserId};
use serde::{Deserialize, Deserializer, Serialize};

const ENTITY: Entity = Entity::MovieNote;

/// Review score constrained to the inclusive range 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, ModelValidationError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            // Range check above guarantees the narrowing is lossless.
            Ok(Self(value as u8))
        } else {
            Err(ModelValidationError::RatingOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Persisted movie note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieNote {
    pub id: NoteId,
    pub title: String,
    pub description: Option<String>,
    pub rating: Rating,
    pub user_id: UserId,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    /// Owned tags, present only for association-loading reads.
    #[serde(rename = "MovieTags", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<MovieTag>>,
}

/// Validated note write model used for both inserts and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovieNote {
    title: String,
    description: Option<String>,
    rating: Rating,
    user_id: UserId,
}

impl NewMovieNote {
    /// Builds a write model from loosely-typed input.
    ///
    /// # Errors
    /// - `MissingField` / `BlankField` when `title` is absent or blank.
    /// - `MissingField` when `rating` is absent.
    /// - `RatingOutOfRange` when `rating` is outside 1 to 5.
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        rating: Option<i64>,
        user_id: UserId,
    ) -> Result<Self, ModelValidationError> {
        let title = required_text(ENTITY, "title", title)?;
        let rating = rating.ok_or(ModelValidationError::MissingField {
            entity: ENTITY,
            field: "rating",
        })?;
        Ok(Self {
            title,
            description,
            rating: Rating::new(rating)?,
            user_id,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Unvalidated note creation input.
///
/// Validation into a `NewMovieNote` happens inside the write transaction,
/// after the owning user is confirmed to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rating: Option<i64>,
    pub user_id: UserId,
    /// Tag names created alongside the note.
    pub tags: Vec<String>,
}

impl NoteInput {
    pub fn validate(&self) -> Result<NewMovieNote, ModelValidationError> {
        NewMovieNote::new(
            self.title.clone(),
            self.description.clone(),
            self.rating,
            self.user_id,
        )
    }
}

/// Presence-aware value for one field of a partial update.
///
/// A key missing from the request body deserializes to `Keep`; a key set to
/// `null` becomes `Clear`; any other value becomes `Set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T: Clone> FieldUpdate<T> {
    /// Resolves the new field value against the currently stored one.
    pub fn resolve(&self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(value) => Some(value.clone()),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::Set(value),
            None => Self::Clear,
        })
    }
}

/// Partial update of a note's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoteUpdate {
    #[serde(default)]
    pub title: FieldUpdate<String>,
    #[serde(default)]
    pub description: FieldUpdate<String>,
    #[serde(default)]
    pub rating: FieldUpdate<i64>,
}

impl NoteUpdate {
    /// Merges this update onto `current` and validates the result.
    ///
    /// Supplied values are applied as-is, so `rating: 0` or `title: ""`
    /// overwrite and then fail validation rather than being ignored.
    pub fn apply_to(&self, current: &MovieNote) -> Result<NewMovieNote, ModelValidationError> {
        NewMovieNote::new(
            self.title.resolve(Some(current.title.clone())),
            self.description.resolve(current.description.clone()),
            self.rating.resolve(Some(i64::from(current.rating.value()))),
            current.user_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldUpdate, MovieNote, NewMovieNote, NoteUpdate, Rating};
    use crate::model::ModelValidationError;

    fn stored_note() -> MovieNote {
        MovieNote {
            id: 1,
            title: "Dune".to_string(),
            description: Some("sand".to_string()),
            rating: Rating::new(4).unwrap(),
            user_id: 7,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
            tags: None,
        }
    }

    #[test]
    fn rating_accepts_inclusive_bounds_only() {
        assert!(Rating::new(1).is_ok());
        assert!(Rating::new(5).is_ok());
        assert_eq!(
            Rating::new(0).unwrap_err(),
            ModelValidationError::RatingOutOfRange(0)
        );
        assert_eq!(
            Rating::new(6).unwrap_err(),
            ModelValidationError::RatingOutOfRange(6)
        );
    }

    #[test]
    fn new_note_requires_title_and_rating() {
        let err = NewMovieNote::new(None, None, Some(3), 1).unwrap_err();
        assert!(matches!(
            err,
            ModelValidationError::MissingField { field: "title", .. }
        ));

        let err = NewMovieNote::new(Some("Alien".into()), None, None, 1).unwrap_err();
        assert!(matches!(
            err,
            ModelValidationError::MissingField { field: "rating", .. }
        ));
    }

    #[test]
    fn update_keys_absent_from_body_keep_stored_values() {
        let update: NoteUpdate = serde_json::from_str(r#"{"rating": 2}"#).unwrap();
        assert_eq!(update.title, FieldUpdate::Keep);
        assert_eq!(update.description, FieldUpdate::Keep);

        let merged = update.apply_to(&stored_note()).unwrap();
        assert_eq!(merged.title(), "Dune");
        assert_eq!(merged.description(), Some("sand"));
        assert_eq!(merged.rating().value(), 2);
    }

    #[test]
    fn update_null_description_clears_it() {
        let update: NoteUpdate = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(update.description, FieldUpdate::Clear);

        let merged = update.apply_to(&stored_note()).unwrap();
        assert_eq!(merged.description(), None);
    }

    #[test]
    fn update_with_zero_rating_is_applied_and_rejected() {
        let update: NoteUpdate = serde_json::from_str(r#"{"rating": 0}"#).unwrap();
        assert_eq!(update.rating, FieldUpdate::Set(0));
        assert_eq!(
            update.apply_to(&stored_note()).unwrap_err(),
            ModelValidationError::RatingOutOfRange(0)
        );
    }

    #[test]
    fn update_with_empty_title_is_applied_and_rejected() {
        let update: NoteUpdate = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(matches!(
            update.apply_to(&stored_note()).unwrap_err(),
            ModelValidationError::BlankField { field: "title", .. }
        ));
    }
}

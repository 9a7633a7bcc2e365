//! Typed domain model for users, movie notes and tags.
//!
//! # Responsibility
//! - Define read models returned by repositories and serialized to clients.
//! - Define write models whose constructors enforce required fields and
//!   range constraints before any SQL runs.
//!
//! # Invariants
//! - Write models can only be obtained through validating constructors.
//! - Models hold foreign keys only; no entity owns another in memory.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod movie_note;
pub mod movie_tag;
pub mod user;

/// Storage-generated identifier of a user row.
pub type UserId = i64;
/// Storage-generated identifier of a movie note row.
pub type NoteId = i64;
/// Storage-generated identifier of a movie tag row.
pub type TagId = i64;

/// The three record types managed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    User,
    MovieNote,
    MovieTag,
}

impl Entity {
    pub fn name(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::MovieNote => "MovieNote",
            Self::MovieTag => "MovieTag",
        }
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Constraint violated while constructing a write model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Required field was absent or null.
    MissingField {
        entity: Entity,
        field: &'static str,
    },
    /// Required text field was empty or whitespace only.
    BlankField {
        entity: Entity,
        field: &'static str,
    },
    /// Rating outside the inclusive `1..=5` range.
    RatingOutOfRange(i64),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { entity, field } => write!(f, "{entity}.{field} cannot be null"),
            Self::BlankField { entity, field } => write!(f, "{entity}.{field} cannot be empty"),
            Self::RatingOutOfRange(value) => write!(
                f,
                "MovieNote.rating must be between {} and {}, got {value}",
                movie_note::Rating::MIN,
                movie_note::Rating::MAX
            ),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn required_text(
    entity: Entity,
    field: &'static str,
    value: Option<String>,
) -> Result<String, ModelValidationError> {
    let value = value.ok_or(ModelValidationError::MissingField { entity, field })?;
    if value.trim().is_empty() {
        return Err(ModelValidationError::BlankField { entity, field });
    }
    Ok(value)
}

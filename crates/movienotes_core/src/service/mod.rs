//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls per request use case.
//! - Collapse repository/validation failures into one client-facing taxonomy.
//!
//! # Invariants
//! - Services never bypass repository transactions.
//! - No failure is retried or swallowed.

use crate::model::Entity;
use crate::repo::RepoError;
use crate::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note_service;
pub mod tag_service;
pub mod user_service;

/// Client-facing failure taxonomy shared by all services.
#[derive(Debug)]
pub enum ServiceError {
    /// Registration payload failed schema validation.
    Validation(ValidationError),
    /// Email already belongs to another user.
    DuplicateEmail,
    /// Referenced user, note or scoped tag does not exist.
    NotFound(Entity),
    /// Password digest could not be produced.
    PasswordHash(String),
    /// Storage failure or unclassified constraint violation.
    Repo(RepoError),
}

impl ServiceError {
    /// Fixed client message for a missing record.
    pub fn not_found_message(entity: Entity) -> &'static str {
        match entity {
            Entity::User => "User not found.",
            Entity::MovieNote => "Movie note not found.",
            Entity::MovieTag => "Tag not found.",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateEmail => f.write_str("Email already registered."),
            Self::NotFound(entity) => f.write_str(Self::not_found_message(*entity)),
            Self::PasswordHash(message) => f.write_str(message),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, .. } => Self::NotFound(entity),
            RepoError::DuplicateEmail(_) => Self::DuplicateEmail,
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

//! Core domain logic for the movie notes service.
//! This crate is the single source of truth for validation, persistence and
//! cascade rules; the HTTP layer only maps its results to responses.
//!
//! There is no login flow. `verify_password` exists so callers and tests can
//! check a stored digest against a candidate password.

pub mod db;
pub mod logging;
pub mod model;
pub mod password;
pub mod repo;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::movie_note::{FieldUpdate, MovieNote, NewMovieNote, NoteInput, NoteUpdate, Rating};
pub use model::movie_tag::{MovieTag, NewMovieTag};
pub use model::user::{NewUser, User};
pub use model::{Entity, ModelValidationError, NoteId, TagId, UserId};
pub use password::{hash_password, verify_password};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::note_service::{CreateNoteRequest, NoteService};
pub use service::tag_service::TagService;
pub use service::user_service::UserService;
pub use service::ServiceError;
pub use validation::{validate_registration, Registration, ValidationError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

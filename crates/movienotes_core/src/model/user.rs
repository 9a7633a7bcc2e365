//! User account model.
//!
//! # Invariants
//! - `password` always holds a one-way digest, never submitted plaintext.
//! - `username` and `email` are unique across users (enforced by storage).

use super::{Entity, ModelValidationError, UserId};
use serde::Serialize;

const ENTITY: Entity = Entity::User;

/// Persisted user account.
///
/// The password digest is part of the serialized record; callers exposing
/// this type must not forward it any further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// PHC-format password digest.
    pub password: String,
    pub avatar: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Validated user write model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    username: String,
    email: String,
    password_hash: String,
    avatar: Option<String>,
}

impl NewUser {
    /// Builds a write model, rejecting empty required fields.
    ///
    /// Whitespace counts as content, matching registration validation.
    /// `password_hash` must already be a digest; hashing is the caller's job.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        avatar: Option<String>,
    ) -> Result<Self, ModelValidationError> {
        Ok(Self {
            username: non_empty(username.into(), "username")?,
            email: non_empty(email.into(), "email")?,
            password_hash: non_empty(password_hash.into(), "password")?,
            avatar,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }
}

fn non_empty(value: String, field: &'static str) -> Result<String, ModelValidationError> {
    if value.is_empty() {
        return Err(ModelValidationError::BlankField {
            entity: ENTITY,
            field,
        });
    }
    Ok(value)
}

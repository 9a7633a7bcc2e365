//! User registration use case.

use crate::model::user::{NewUser, User};
use crate::model::{Entity, UserId};
use crate::password::hash_password;
use crate::repo::user_repo::UserRepository;
use crate::service::ServiceError;
use crate::validation::validate_registration;
use log::info;
use serde_json::Value;

/// User service facade over repository implementations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a user from a raw JSON payload.
    ///
    /// # Contract
    /// - Validation stops at the first failing field.
    /// - The stored password is an Argon2id digest of the submitted one.
    /// - A taken email fails with `DuplicateEmail` and writes nothing.
    pub fn register(&mut self, payload: &Value) -> Result<User, ServiceError> {
        let registration = validate_registration(payload)?;
        let password_hash =
            hash_password(&registration.password).map_err(ServiceError::PasswordHash)?;
        let new_user = NewUser::new(
            registration.username,
            registration.email,
            password_hash,
            registration.avatar,
        )
        .map_err(|err| ServiceError::Repo(err.into()))?;

        let user = self.repo.create_user(&new_user)?;
        info!("event=user_register module=service status=ok user_id={}", user.id);
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> Result<User, ServiceError> {
        self.repo
            .get_user(id)?
            .ok_or(ServiceError::NotFound(Entity::User))
    }

    pub fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.repo.list_users()?)
    }
}

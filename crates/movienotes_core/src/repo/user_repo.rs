//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - Email uniqueness is checked and the row inserted in one transaction.
//! - Users are never updated or deleted through this repository.

use crate::model::user::{NewUser, User};
use crate::model::{Entity, UserId};
use crate::repo::{ensure_tables, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const USER_SELECT_SQL: &str = "SELECT
    id,
    username,
    email,
    password,
    avatar,
    created_at,
    updated_at
FROM users";

/// Repository interface for user accounts.
pub trait UserRepository {
    /// Inserts a user, failing with `DuplicateEmail` when the email is taken.
    fn create_user(&mut self, user: &NewUser) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Returns every user ordered by id.
    fn list_users(&self) -> RepoResult<Vec<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&mut self, user: &NewUser) -> RepoResult<User> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if find_by_email(&tx, user.email())?.is_some() {
            return Err(RepoError::DuplicateEmail(user.email().to_string()));
        }

        tx.execute(
            "INSERT INTO users (username, email, password, avatar)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                user.username(),
                user.email(),
                user.password_hash(),
                user.avatar(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        let created = fetch_user(&tx, id)?.ok_or(RepoError::NotFound {
            entity: Entity::User,
            id,
        })?;

        tx.commit()?;
        Ok(created)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        fetch_user(self.conn, id)
    }

    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        find_by_email(self.conn, email)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }
}

pub(crate) fn fetch_user(conn: &Connection, id: UserId) -> RepoResult<Option<User>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
    let user = stmt
        .query_row([id], |row| Ok(parse_user_row(row)))
        .optional()?;
    user.transpose()
}

fn find_by_email(conn: &Connection, email: &str) -> RepoResult<Option<User>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE email = ?1;"))?;
    let user = stmt
        .query_row([email], |row| Ok(parse_user_row(row)))
        .optional()?;
    user.transpose()
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        password: row.get("password")?,
        avatar: row.get("avatar")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use movienotes_core::{SqliteUserRepository, User, UserService};
use serde_json::Value;

use crate::{error::ApiError, state::AppState};

/// `POST /users`: validates, hashes the password and stores a new account.
pub async fn register_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(payload) = payload?;

    let user = state
        .run(move |conn| {
            let repo = SqliteUserRepository::try_new(conn)?;
            UserService::new(repo).register(&payload)
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

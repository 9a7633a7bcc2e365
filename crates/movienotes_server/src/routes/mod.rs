use axum::Json;
use movienotes_core::core_version;
use serde_json::{json, Value};

use crate::error::ApiError;

pub mod movies;
pub mod tags;
pub mod users;

pub use movies::{create_movie_handler, delete_movie_handler, list_movies_handler, update_movie_handler};
pub use tags::{add_tag_handler, delete_tag_handler, list_tags_handler};
pub use users::register_user_handler;

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok", "version": core_version() }))
}

pub async fn fallback_handler() -> ApiError {
    ApiError::NotFound("Not found.")
}

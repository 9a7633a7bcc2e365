use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use movienotes_core::{
    MovieTag, NoteId, NoteService, SqliteNoteRepository, SqliteTagRepository, TagId, TagService,
};
use serde::Deserialize;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct AddTagRequest {
    #[serde(default)]
    name: Option<String>,
}

/// `GET /movies/:id/tags`
pub async fn list_tags_handler(
    State(state): State<AppState>,
    id: Result<Path<NoteId>, PathRejection>,
) -> Result<Json<Vec<MovieTag>>, ApiError> {
    let Path(id) = id?;

    let tags = state
        .run(move |conn| {
            let repo = SqliteNoteRepository::try_new(conn)?;
            NoteService::new(repo).note_tags(id)
        })
        .await?;

    Ok(Json(tags))
}

/// `POST /movies/:id/tags`
pub async fn add_tag_handler(
    State(state): State<AppState>,
    id: Result<Path<NoteId>, PathRejection>,
    payload: Result<Json<AddTagRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MovieTag>), ApiError> {
    let Path(id) = id?;
    let Json(request) = payload?;

    let tag = state
        .run(move |conn| {
            let repo = SqliteTagRepository::try_new(conn)?;
            TagService::new(repo).add_tag(id, request.name)
        })
        .await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

/// `DELETE /movies/:id/tags/:tag_id`: only deletes a tag owned by that note.
pub async fn delete_tag_handler(
    State(state): State<AppState>,
    ids: Result<Path<(NoteId, TagId)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path((note_id, tag_id)) = ids?;

    state
        .run(move |conn| {
            let repo = SqliteTagRepository::try_new(conn)?;
            TagService::new(repo).delete_tag(note_id, tag_id)
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

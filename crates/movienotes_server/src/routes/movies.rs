use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use movienotes_core::{CreateNoteRequest, MovieNote, NoteId, NoteService, NoteUpdate, SqliteNoteRepository};

use crate::{error::ApiError, state::AppState};

/// `POST /movies`: creates a note for an existing user, plus its tags.
pub async fn create_movie_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MovieNote>), ApiError> {
    let Json(request) = payload?;

    let note = state
        .run(move |conn| {
            let repo = SqliteNoteRepository::try_new(conn)?;
            NoteService::new(repo).create_note(request)
        })
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// `GET /movies`: every note with its tags embedded.
pub async fn list_movies_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<MovieNote>>, ApiError> {
    let notes = state
        .run(|conn| {
            let repo = SqliteNoteRepository::try_new(conn)?;
            NoteService::new(repo).list_notes()
        })
        .await?;

    Ok(Json(notes))
}

/// `PUT /movies/:id`: overwrites only the keys present in the body.
pub async fn update_movie_handler(
    State(state): State<AppState>,
    id: Result<Path<NoteId>, PathRejection>,
    payload: Result<Json<NoteUpdate>, JsonRejection>,
) -> Result<Json<MovieNote>, ApiError> {
    let Path(id) = id?;
    let Json(update) = payload?;

    let note = state
        .run(move |conn| {
            let repo = SqliteNoteRepository::try_new(conn)?;
            NoteService::new(repo).update_note(id, &update)
        })
        .await?;

    Ok(Json(note))
}

/// `DELETE /movies/:id`: deletes the note; its tags go with it.
pub async fn delete_movie_handler(
    State(state): State<AppState>,
    id: Result<Path<NoteId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;

    state
        .run(move |conn| {
            let repo = SqliteNoteRepository::try_new(conn)?;
            NoteService::new(repo).delete_note(id)
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

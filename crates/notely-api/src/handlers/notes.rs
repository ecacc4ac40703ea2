//! Note CRUD and summarization handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use notely_core::{CreateNoteRequest, ListNotesParams, Note, NoteList, UpdateNoteRequest};

use crate::error::{ApiError, ErrorBody};
use crate::services::SummarizedNote;
use crate::AppState;

/// Confirmation body for a deleted note.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// An id that does not parse cannot name a note.
fn parse_note_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Note not found".to_string()))
}

#[utoipa::path(get, path = "/notes", tag = "Notes",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive substring of title, content or any tag"),
        ("tag" = Option<String>, Query, description = "Exact tag (lowercased before matching)"),
        ("category" = Option<String>, Query, description = "Exact category"),
        ("archived" = Option<String>, Query, description = "\"true\" lists archived notes"),
        ("page" = Option<String>, Query, description = "1-based page, default 1"),
        ("limit" = Option<String>, Query, description = "Page size, default 10"),
    ),
    responses((status = 200, description = "One page of notes", body = NoteList)))]
pub async fn list_notes(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<NoteList>, ApiError> {
    let Query(pairs) = query?;
    let params = ListNotesParams::from_pairs(pairs);
    Ok(Json(state.notes.list(&params).await?))
}

#[utoipa::path(post, path = "/notes", tag = "Notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Created", body = Note),
        (status = 400, description = "Title or content missing", body = ErrorBody),
        (status = 422, description = "Constraint violated", body = ErrorBody),
    ))]
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let note = state.notes.create(req).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

#[utoipa::path(get, path = "/notes/{id}", tag = "Notes",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 404, description = "Not found", body = ErrorBody),
    ))]
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_note_id(&id)?;
    Ok(Json(state.notes.get(id).await?))
}

#[utoipa::path(put, path = "/notes/{id}", tag = "Notes",
    params(("id" = String, Path, description = "Note id")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Updated note", body = Note),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 422, description = "Constraint violated", body = ErrorBody),
    ))]
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_note_id(&id)?;
    let Json(req) = payload?;
    Ok(Json(state.notes.update(id, req).await?))
}

#[utoipa::path(delete, path = "/notes/{id}", tag = "Notes",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorBody),
    ))]
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_note_id(&id)?;
    state.notes.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Note deleted successfully".to_string(),
    }))
}

#[utoipa::path(post, path = "/notes/{id}/summarize", tag = "Notes",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "Summary and the updated note", body = SummarizedNote),
        (status = 401, description = "Generation credential rejected", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
    ))]
pub async fn summarize_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SummarizedNote>, ApiError> {
    let id = parse_note_id(&id)?;
    Ok(Json(state.notes.summarize(id).await?))
}

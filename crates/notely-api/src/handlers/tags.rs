//! Tag listing handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::AppState;

/// Distinct tags in use.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}

#[utoipa::path(get, path = "/tags", tag = "Tags",
    responses((status = 200, description = "Sorted tags of non-archived notes", body = TagsResponse)))]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<TagsResponse>, ApiError> {
    let tags = state.notes.tags().await?;
    Ok(Json(TagsResponse { tags }))
}

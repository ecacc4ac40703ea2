//! # notely-api
//!
//! HTTP API for notely: note CRUD, tag listing and AI summaries.
//!
//! Every route is served both at the root (`/notes`) and under `/api`
//! (`/api/notes`).

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use uuid::Uuid;

use notely_core::NoteRepository;
use notely_inference::Summarizer;

pub use config::ServerConfig;
pub use error::ApiError;
pub use services::NoteService;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub notes: NoteService,
}

impl AppState {
    pub fn new(repo: Arc<dyn NoteRepository>, summarizer: Summarizer) -> Self {
        Self {
            notes: NoteService::new(repo, summarizer),
        }
    }
}

// =============================================================================
// OPENAPI
// =============================================================================

/// OpenAPI description of the note endpoints, served at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notely API",
        description = "Notes with tags, categories, archiving, search and AI summaries"
    ),
    paths(
        handlers::notes::list_notes,
        handlers::notes::create_note,
        handlers::notes::get_note,
        handlers::notes::update_note,
        handlers::notes::delete_note,
        handlers::notes::summarize_note,
        handlers::tags::list_tags,
        handlers::system::health_check,
    ),
    components(schemas(
        notely_core::Note,
        notely_core::Category,
        notely_core::CreateNoteRequest,
        notely_core::UpdateNoteRequest,
        notely_core::NoteList,
        notely_core::Pagination,
        services::SummarizedNote,
        handlers::notes::MessageResponse,
        handlers::tags::TagsResponse,
        error::ErrorBody,
    )),
    tags(
        (name = "Notes", description = "Note CRUD and summaries"),
        (name = "Tags", description = "Tag listing"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

// =============================================================================
// ROUTER
// =============================================================================

fn note_routes() -> Router<AppState> {
    use handlers::{notes, tags};

    Router::new()
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/notes/:id/summarize", post(notes::summarize_note))
        .route("/tags", get(tags::list_tags))
}

/// Routes without middleware.
pub fn router(state: AppState) -> Router {
    use handlers::system;

    Router::new()
        .route("/health", get(system::health_check))
        .route("/openapi.json", get(system::openapi_json))
        .merge(note_routes())
        .nest("/api", note_routes())
        .with_state(state)
}

/// Full application: routes plus tracing, request ids and CORS.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    router(state)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.cors_origins()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .max_age(std::time::Duration::from_secs(3600)),
        )
}

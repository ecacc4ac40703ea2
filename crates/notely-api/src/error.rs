//! HTTP error mapping.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::error;

/// JSON error payload returned by every failing endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Required input missing or the body is not valid JSON (400).
    BadRequest(String),
    /// Input present but violates a constraint (422).
    Validation(String),
    /// Requested note does not exist (404).
    NotFound(String),
    /// External credential rejected (401).
    Unauthorized(String),
    /// Anything else (500). The wrapped error is logged, not returned.
    Internal(notely_core::Error),
}

impl From<notely_core::Error> for ApiError {
    fn from(err: notely_core::Error) -> Self {
        use notely_core::Error;

        match err {
            Error::BadRequest(msg) => ApiError::BadRequest(msg),
            Error::Validation(msg) => ApiError::Validation(msg),
            Error::NoteNotFound(_) => {
                ApiError::NotFound("Note not found".to_string())
            }
            Error::Unauthorized(_) => {
                ApiError::Unauthorized("Invalid generation API key".to_string())
            }
            Error::Database(ref sqlx_err) if is_constraint_violation(sqlx_err) => {
                ApiError::Validation(sqlx_err.to_string())
            }
            other => ApiError::Internal(other),
        }
    }
}

/// CHECK / NOT NULL / length / encoding violations raised by the store.
fn is_constraint_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => matches!(
            db_err.code().as_deref(),
            Some("23514") | Some("23502") | Some("22001") | Some("22021")
        ),
        _ => false,
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg) => msg,
            ApiError::Internal(err) => {
                error!(subsystem = "api", error = %err, "Request failed");
                "Internal server error".to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notely_core::Error;
    use uuid::Uuid;

    #[test]
    fn test_core_error_status_mapping() {
        let cases = [
            (Error::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (Error::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (Error::NoteNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (Error::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (Error::Inference("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_pool_error_is_internal() {
        let err = ApiError::from(Error::Database(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_not_found_message_is_stable() {
        match ApiError::from(Error::NoteNotFound(Uuid::nil())) {
            ApiError::NotFound(msg) => assert_eq!(msg, "Note not found"),
            other => panic!("unexpected {:?}", other),
        }
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use wikipath_core::QueryError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: u16,
    message: String,
}

/// Wraps [`QueryError`] so it can be returned directly from an axum handler.
pub struct ApiError(pub QueryError);

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            QueryError::ArticleNotFound(_) => StatusCode::NOT_FOUND,
            QueryError::NoPath => StatusCode::NOT_FOUND,
            QueryError::EmptyIndex => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = ErrorBody {
            status: status.as_u16(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

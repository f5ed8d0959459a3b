//! Error types for the archmap HTTP server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested node does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A query parameter is missing or malformed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Any other failure from the query engine or storage.
    #[error("Internal error: {0}")]
    Archmap(archmap::error::Error),
}

impl From<archmap::error::Error> for ApiError {
    fn from(err: archmap::error::Error) -> Self {
        match err {
            archmap::error::Error::NodeNotFound(id) => {
                ApiError::NotFound(format!("component '{id}'"))
            }
            other => ApiError::Archmap(other),
        }
    }
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Archmap(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

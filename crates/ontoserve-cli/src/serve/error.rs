//! Mapping of library errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use ontoserve_core::config::ConfigError;
use ontoserve_core::QueryError;

use super::models::ErrorBody;

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    Query(QueryError),
    Config(ConfigError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Query(QueryError::BadRequest(_)) => StatusCode::BAD_REQUEST,
            ApiError::Query(QueryError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Query(QueryError::Forbidden(_)) => StatusCode::FORBIDDEN,
            ApiError::Query(_) | ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Query(e) => e.to_string(),
            ApiError::Config(e) => e.to_string(),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::Query(err)
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Config(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "request failed");
        }

        let body = ErrorBody {
            errors: vec![message],
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

//! Traveler: API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use traveler_core::error::TravelerError;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The scene document could not be read.
    #[error("scene file error: {0}")]
    SceneFile(String),

    /// The scene document is not valid YAML for a scene.
    #[error("scene document error: {0}")]
    SceneDocument(#[from] serde_yaml::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `TravelerError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub TravelerError);

impl From<TravelerError> for ApiError {
    fn from(err: TravelerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            TravelerError::EntityNotFound(_) => (StatusCode::NOT_FOUND, "entity_not_found"),
            TravelerError::CreateFailed { .. } | TravelerError::Host(_) => {
                (StatusCode::BAD_GATEWAY, "host_error")
            }
            TravelerError::StatePoisoned(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "state_poisoned")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

//! Mapping of service errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use plantclip_core::ClassifyError;
use serde_json::json;

/// Error returned by the classify handlers.
///
/// Rendered as `{"success": false, "error": message}`.
#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be read.
    BadRequest(String),
    Classify(ClassifyError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Classify(err) => status_for(err),
        }
    }
}

impl From<ClassifyError> for ApiError {
    fn from(err: ClassifyError) -> Self {
        ApiError::Classify(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(message) => message,
            ApiError::Classify(err) => err.to_string(),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {message}");
        } else {
            tracing::warn!("Rejected request ({status}): {message}");
        }

        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

/// Status code for a service error.
pub fn status_for(err: &ClassifyError) -> StatusCode {
    match err {
        ClassifyError::MissingInput(_) => StatusCode::BAD_REQUEST,
        ClassifyError::FileNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error body for the status endpoints: `{"status": "error", "error": message}`.
pub fn status_error(err: ClassifyError) -> Response {
    tracing::error!("Status check failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "error": err.to_string() })),
    )
        .into_response()
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application error type for the HTTP proxy endpoints
///
/// Upstream provider failures are passed through verbatim (status and body),
/// everything else is mapped to a JSON `{"error": ...}` body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Client sent an invalid request (empty text, malformed fields)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Required server-side configuration is missing (API keys, voice ids)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The external provider returned a non-success status; forwarded as-is
    #[error("Upstream error ({status}): {body}")]
    Upstream { status: StatusCode, body: String },

    /// Anything else (request construction, body decoding, serialization)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Internal(format!("Provider request failed: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::ConfigError(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": msg })),
                )
                    .into_response()
            }
            AppError::Upstream { status, body } => {
                tracing::warn!(status = %status, "Upstream provider error");
                // The provider's status and body are forwarded unmodified
                (status, body).into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": msg })),
                )
                    .into_response()
            }
        }
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

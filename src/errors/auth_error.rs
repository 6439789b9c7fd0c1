use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Error codes for structured error responses
pub mod error_codes {
    pub const MISSING_CREDENTIAL: &str = "missing_credential";
    pub const INVALID_AUTH_HEADER: &str = "invalid_auth_header";
    pub const INVALID_CREDENTIAL: &str = "invalid_credential";
    pub const EXPIRED_CREDENTIAL: &str = "expired_credential";
    pub const CONFIG_ERROR: &str = "config_error";
}

/// Authentication error types for the relay handshake
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credential present in Authorization header or query string
    #[error("Missing authentication credential")]
    MissingCredential,

    /// Authorization header format is invalid (not "Bearer {token}")
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// Credential failed verification (malformed token, bad signature)
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// Credential has expired
    #[error("Credential has expired")]
    ExpiredCredential,

    /// Verification is not possible (missing relay secret)
    #[error("Auth configuration error: {0}")]
    ConfigError(String),
}

impl AuthError {
    /// Get the error code for structured error responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => error_codes::MISSING_CREDENTIAL,
            AuthError::InvalidAuthHeader => error_codes::INVALID_AUTH_HEADER,
            AuthError::InvalidCredential(_) => error_codes::INVALID_CREDENTIAL,
            AuthError::ExpiredCredential => error_codes::EXPIRED_CREDENTIAL,
            AuthError::ConfigError(_) => error_codes::CONFIG_ERROR,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidCredential(_)
            | AuthError::ExpiredCredential => StatusCode::UNAUTHORIZED,
            AuthError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log the error at the appropriate level
    pub fn log(&self) {
        match self {
            // Debug level for expected auth failures
            AuthError::MissingCredential | AuthError::InvalidAuthHeader => {
                tracing::debug!("{}", self);
            }
            AuthError::InvalidCredential(msg) => {
                tracing::warn!("Invalid credential: {}", msg);
            }
            AuthError::ExpiredCredential => {
                tracing::warn!("Expired credential presented at handshake");
            }
            AuthError::ConfigError(msg) => {
                tracing::error!("Auth configuration error: {}", msg);
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let error_code = self.error_code();
        let error_message = self.to_string();

        // Response format: {"error": "error_code", "message": "human readable message"}
        let body = Json(json!({
            "error": error_code,
            "message": error_message
        }));

        (status, body).into_response()
    }
}

// Result type alias for convenience
pub type AuthResult<T> = Result<T, AuthError>;

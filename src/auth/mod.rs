//! Relay credential verification
//!
//! Connections to the relay authenticate with a short-lived HS256 token
//! signed with a shared secret. The secret is injected into the
//! [`TokenVerifier`] at construction so tests can swap it.

mod token;

pub use token::{RelayClaims, TokenVerifier};

use axum::http::HeaderMap;

use crate::errors::auth_error::{AuthError, AuthResult};

/// Extract the authentication token from request metadata
///
/// Supports two token sources for browser/WebSocket compatibility:
/// 1. Authorization header: `Authorization: Bearer <token>` (preferred)
/// 2. Query parameter: `?token=<token>` (browsers cannot set headers on
///    WebSocket connects)
pub fn extract_token(headers: &HeaderMap, query: Option<&str>) -> AuthResult<String> {
    // Try Authorization header first (preferred method)
    if let Some(auth_header) = headers.get("authorization") {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            tracing::debug!("Token extracted from Authorization header");
            return Ok(token.to_string());
        }
        return Err(AuthError::InvalidAuthHeader);
    }

    // Try query parameter (for WebSocket browser connections)
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key == "token" {
                tracing::debug!("Token extracted from query parameter");
                return Ok(value.to_string());
            }
        }
    }

    Err(AuthError::MissingCredential)
}

//! Realtime session issuer
//!
//! `POST /realtime-session` mints a short-lived client credential against the
//! OpenAI Realtime sessions API so the browser can open its audio session
//! directly with the provider. The gateway attaches the Durmah persona and a
//! fixed turn-detection configuration, and returns only the credential,
//! resolved model/voice, and expiry - never the full provider payload.
//!
//! # API Reference
//!
//! - Endpoint: `POST https://api.openai.com/v1/realtime/sessions`
//! - The response's `client_secret.value` is the ephemeral browser credential

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

/// Fallback model when neither the request nor the environment names one
pub const DEFAULT_REALTIME_MODEL: &str = "gpt-4o-realtime-preview-2024-12-17";

/// Fallback voice when neither the request nor the environment names one
pub const DEFAULT_REALTIME_VOICE: &str = "alloy";

/// Persona instruction attached to every issued session
const DURMAH_INSTRUCTIONS: &str = "You are Durmah, a warm and supportive voice companion for \
    law students at Durham University. Listen closely, help with questions about the law school \
    experience, and gently encourage students to look after their wellbeing. Keep replies \
    conversational and concise.";

// Server-side voice activity detection. Tunable constants, not computed.
const VAD_THRESHOLD: f64 = 0.5;
const VAD_PREFIX_PADDING_MS: u32 = 300;
const VAD_SILENCE_DURATION_MS: u32 = 500;

/// Request body for the session issuer; both fields optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
}

/// Response returned to the browser
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Ephemeral client credential for the direct browser-provider session
    pub token: String,
    /// Model the session was created with
    pub model: String,
    /// Voice the session was created with
    pub voice: String,
    /// Unix timestamp when the credential expires
    pub expires_at: Option<i64>,
}

/// Subset of the provider response we forward
#[derive(Debug, Deserialize)]
struct ProviderSession {
    client_secret: ProviderClientSecret,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ProviderClientSecret {
    value: String,
    #[serde(default)]
    expires_at: Option<i64>,
}

/// Resolve model and voice: request body > environment default > fallback
fn resolve_session_options(
    request: &SessionRequest,
    config: &crate::config::ServerConfig,
) -> (String, String) {
    let model = request
        .model
        .clone()
        .or_else(|| config.realtime_model.clone())
        .unwrap_or_else(|| DEFAULT_REALTIME_MODEL.to_string());
    let voice = request
        .voice
        .clone()
        .or_else(|| config.realtime_voice.clone())
        .unwrap_or_else(|| DEFAULT_REALTIME_VOICE.to_string());
    (model, voice)
}

/// Build the provider request payload for a session
fn build_session_payload(model: &str, voice: &str) -> Value {
    json!({
        "model": model,
        "voice": voice,
        "modalities": ["audio", "text"],
        "instructions": DURMAH_INSTRUCTIONS,
        "turn_detection": {
            "type": "server_vad",
            "threshold": VAD_THRESHOLD,
            "prefix_padding_ms": VAD_PREFIX_PADDING_MS,
            "silence_duration_ms": VAD_SILENCE_DURATION_MS,
        },
    })
}

/// Handler for `POST /realtime-session`
///
/// The body is optional; an empty POST issues a session with the default
/// model and voice. Provider failures are forwarded verbatim.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<SessionResponse>> {
    let request: SessionRequest = if body.is_empty() {
        SessionRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?
    };

    let api_key = state
        .config
        .require_openai_api_key()
        .map_err(AppError::ConfigError)?;

    let (model, voice) = resolve_session_options(&request, &state.config);

    info!(model = %model, voice = %voice, "Creating realtime session");

    let url = format!(
        "{}/realtime/sessions",
        state.config.openai_api_base.trim_end_matches('/')
    );
    let response = state
        .http
        .post(&url)
        .bearer_auth(&api_key)
        .json(&build_session_payload(&model, &voice))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Upstream { status, body });
    }

    let session: ProviderSession = response
        .json()
        .await
        .map_err(|e| AppError::Internal(format!("Invalid provider session payload: {e}")))?;

    let expires_at = session.expires_at.or(session.client_secret.expires_at);

    Ok(Json(SessionResponse {
        token: session.client_secret.value,
        model,
        voice,
        expires_at,
    }))
}

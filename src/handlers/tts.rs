//! Speech-synthesis proxy
//!
//! `POST /tts` synthesizes text through the ElevenLabs API and returns the
//! audio as base64-encoded MP3. Tuning parameters are fixed constants chosen
//! for low-latency playback in the widget; each synthesis is unique to its
//! input text, so responses are never cached.
//!
//! # API Reference
//!
//! - Endpoint: `POST https://api.elevenlabs.io/v1/text-to-speech/{voice_id}`
//! - Auth: `xi-api-key` header

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

/// ElevenLabs model used for synthesis
const TTS_MODEL_ID: &str = "eleven_turbo_v2_5";

/// Compact output encoding for low-latency playback
const TTS_OUTPUT_FORMAT: &str = "mp3_44100_64";

/// Streaming latency optimization level (0-4, higher trades quality for speed)
const TTS_STREAMING_LATENCY: u8 = 3;

// Voice rendering parameters. Tunable constants, not computed per request.
const VOICE_STABILITY: f64 = 0.5;
const VOICE_SIMILARITY_BOOST: f64 = 0.75;
const VOICE_STYLE: f64 = 0.0;
const VOICE_USE_SPEAKER_BOOST: bool = true;

/// Request body for the synthesis endpoint
#[derive(Debug, Default, Deserialize)]
pub struct TtsRequest {
    /// The text to synthesize
    #[serde(default)]
    pub text: String,
}

/// Build the synthesis request payload
fn build_tts_payload(text: &str) -> serde_json::Value {
    json!({
        "text": text,
        "model_id": TTS_MODEL_ID,
        "voice_settings": {
            "stability": VOICE_STABILITY,
            "similarity_boost": VOICE_SIMILARITY_BOOST,
            "style": VOICE_STYLE,
            "use_speaker_boost": VOICE_USE_SPEAKER_BOOST,
        },
    })
}

/// Handler for `POST /tts`
///
/// Empty text is rejected before any provider call; provider failures are
/// forwarded verbatim.
pub async fn synthesize(State(state): State<Arc<AppState>>, body: Bytes) -> AppResult<Response> {
    let request: TtsRequest = if body.is_empty() {
        TtsRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?
    };

    if request.text.trim().is_empty() {
        return Err(AppError::BadRequest("Text cannot be empty".to_string()));
    }

    let (api_key, voice_id) = state
        .config
        .require_elevenlabs_credentials()
        .map_err(AppError::ConfigError)?;

    info!(text_len = request.text.len(), "TTS synthesis requested");

    let url = format!(
        "{}/text-to-speech/{voice_id}",
        state.config.elevenlabs_api_base.trim_end_matches('/')
    );
    let response = state
        .http
        .post(&url)
        .header("xi-api-key", &api_key)
        .query(&[
            (
                "optimize_streaming_latency",
                TTS_STREAMING_LATENCY.to_string(),
            ),
            ("output_format", TTS_OUTPUT_FORMAT.to_string()),
        ])
        .json(&build_tts_payload(&request.text))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Upstream { status, body });
    }

    let audio = response
        .bytes()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read provider audio: {e}")))?;

    info!(audio_bytes = audio.len(), "TTS synthesis successful");

    // Base64-transported MP3; no caching since each synthesis is unique
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        BASE64.encode(&audio),
    )
        .into_response())
}

use std::env;

use super::{DEFAULT_ELEVENLABS_API_BASE, DEFAULT_OPENAI_API_BASE, ServerConfig};

/// Read an optional environment variable, treating empty values as unset
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Build a ServerConfig from environment variables with defaults
pub(super) fn from_env() -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let host = optional_var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
    let port = match optional_var("PORT") {
        Some(value) => value
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT value '{value}': {e}"))?,
        None => 3001,
    };

    let rate_limit_requests_per_second = match optional_var("RATE_LIMIT_RPS") {
        Some(value) => value
            .parse::<u32>()
            .map_err(|e| format!("Invalid RATE_LIMIT_RPS value '{value}': {e}"))?,
        None => 60,
    };
    let rate_limit_burst_size = match optional_var("RATE_LIMIT_BURST") {
        Some(value) => value
            .parse::<u32>()
            .map_err(|e| format!("Invalid RATE_LIMIT_BURST value '{value}': {e}"))?,
        None => 10,
    };

    Ok(ServerConfig {
        host,
        port,
        openai_api_key: optional_var("OPENAI_API_KEY"),
        openai_api_base: optional_var("OPENAI_API_BASE")
            .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
        elevenlabs_api_key: optional_var("ELEVENLABS_API_KEY"),
        elevenlabs_api_base: optional_var("ELEVENLABS_API_BASE")
            .unwrap_or_else(|| DEFAULT_ELEVENLABS_API_BASE.to_string()),
        elevenlabs_voice_id: optional_var("ELEVENLABS_VOICE_ID"),
        realtime_model: optional_var("REALTIME_MODEL"),
        realtime_voice: optional_var("REALTIME_VOICE"),
        widget_jwt_secret: optional_var("WIDGET_JWT_SECRET"),
        cors_allowed_origins: optional_var("CORS_ALLOWED_ORIGINS"),
        rate_limit_requests_per_second,
        rate_limit_burst_size,
    })
}

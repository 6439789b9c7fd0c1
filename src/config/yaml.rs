use serde::Deserialize;
use std::path::PathBuf;

use super::ServerConfig;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration; values present in
/// the YAML file override the environment-derived base configuration.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 3001
///
/// providers:
///   openai_api_key: "sk-..."
///   elevenlabs_api_key: "el-..."
///   elevenlabs_voice_id: "EXAVITQu4vr4xnSDxMaL"
///
/// realtime:
///   model: "gpt-4o-realtime-preview-2024-12-17"
///   voice: "alloy"
///
/// auth:
///   widget_jwt_secret: "shared-secret"
///
/// security:
///   cors_allowed_origins: "*"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub providers: Option<ProvidersYaml>,
    pub realtime: Option<RealtimeYaml>,
    pub auth: Option<AuthYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Provider API keys and endpoints from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProvidersYaml {
    /// OpenAI API key for the realtime session issuer
    pub openai_api_key: Option<String>,
    pub openai_api_base: Option<String>,
    /// ElevenLabs API key for speech synthesis
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_api_base: Option<String>,
    /// ElevenLabs voice to synthesize with
    pub elevenlabs_voice_id: Option<String>,
}

/// Realtime session defaults from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RealtimeYaml {
    pub model: Option<String>,
    pub voice: Option<String>,
}

/// Relay authentication settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuthYaml {
    pub widget_jwt_secret: Option<String>,
}

/// Security settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load a YAML configuration file
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Apply the YAML overrides on top of a base configuration
    pub fn apply(self, mut base: ServerConfig) -> ServerConfig {
        if let Some(server) = self.server {
            if let Some(host) = server.host {
                base.host = host;
            }
            if let Some(port) = server.port {
                base.port = port;
            }
        }
        if let Some(providers) = self.providers {
            if providers.openai_api_key.is_some() {
                base.openai_api_key = providers.openai_api_key;
            }
            if let Some(api_base) = providers.openai_api_base {
                base.openai_api_base = api_base;
            }
            if providers.elevenlabs_api_key.is_some() {
                base.elevenlabs_api_key = providers.elevenlabs_api_key;
            }
            if let Some(api_base) = providers.elevenlabs_api_base {
                base.elevenlabs_api_base = api_base;
            }
            if providers.elevenlabs_voice_id.is_some() {
                base.elevenlabs_voice_id = providers.elevenlabs_voice_id;
            }
        }
        if let Some(realtime) = self.realtime {
            if realtime.model.is_some() {
                base.realtime_model = realtime.model;
            }
            if realtime.voice.is_some() {
                base.realtime_voice = realtime.voice;
            }
        }
        if let Some(auth) = self.auth {
            if auth.widget_jwt_secret.is_some() {
                base.widget_jwt_secret = auth.widget_jwt_secret;
            }
        }
        if let Some(security) = self.security {
            if security.cors_allowed_origins.is_some() {
                base.cors_allowed_origins = security.cors_allowed_origins;
            }
            if let Some(rps) = security.rate_limit_requests_per_second {
                base.rate_limit_requests_per_second = rps;
            }
            if let Some(burst) = security.rate_limit_burst_size {
                base.rate_limit_burst_size = burst;
            }
        }
        base
    }
}

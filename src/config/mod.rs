//! Configuration module for the Durmah gateway
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `env`: Environment variable loading
//! - `yaml`: YAML configuration file loading and merging
//!
//! # Example
//! ```rust,no_run
//! use durmah_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable base
//! let config = ServerConfig::from_file(&PathBuf::from("config.yaml"))?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod yaml;

/// Default OpenAI API base URL
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Default ElevenLabs API base URL
pub const DEFAULT_ELEVENLABS_API_BASE: &str = "https://api.elevenlabs.io/v1";

/// Server configuration
///
/// Contains all configuration needed to run the Durmah gateway, including:
/// - Server settings (host, port)
/// - Provider API keys (OpenAI, ElevenLabs) and endpoint base URLs
/// - Realtime session defaults (model, voice)
/// - Relay credential verification secret
/// - Security settings (CORS, rate limiting)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    /// OpenAI API key for the realtime session issuer
    pub openai_api_key: Option<String>,
    /// OpenAI API base URL (overridable so tests can point at a local mock)
    pub openai_api_base: String,
    /// ElevenLabs API key for speech synthesis
    pub elevenlabs_api_key: Option<String>,
    /// ElevenLabs API base URL (overridable so tests can point at a local mock)
    pub elevenlabs_api_base: String,
    /// ElevenLabs voice to synthesize with
    pub elevenlabs_voice_id: Option<String>,

    /// Default realtime model when the request body does not name one
    pub realtime_model: Option<String>,
    /// Default realtime voice when the request body does not name one
    pub realtime_voice: Option<String>,

    /// Shared secret used to verify relay handshake credentials (HS256)
    pub widget_jwt_secret: Option<String>,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    pub rate_limit_burst_size: u32,
}

/// Zeroize all secret fields when ServerConfig is dropped so sensitive data
/// does not linger in memory.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.openai_api_key {
            key.zeroize();
        }
        if let Some(ref mut key) = self.elevenlabs_api_key {
            key.zeroize();
        }
        if let Some(ref mut secret) = self.widget_jwt_secret {
            secret.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// `.env` values are expected to have been loaded into the process
    /// environment already (done in main.rs at startup).
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        env::from_env()
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let base = env::from_env()?;
        Ok(yaml_config.apply(base))
    }

    /// Get the server address as a string in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if the relay can verify handshake credentials
    pub fn has_relay_auth(&self) -> bool {
        self.widget_jwt_secret.is_some()
    }

    /// Get the OpenAI API key, or a descriptive error for a 500 response
    pub fn require_openai_api_key(&self) -> Result<String, String> {
        self.openai_api_key
            .as_ref()
            .cloned()
            .ok_or_else(|| "OpenAI API key not configured in server environment".to_string())
    }

    /// Get the ElevenLabs credentials (API key and voice id), or a descriptive error
    pub fn require_elevenlabs_credentials(&self) -> Result<(String, String), String> {
        let api_key = self
            .elevenlabs_api_key
            .as_ref()
            .cloned()
            .ok_or_else(|| "ElevenLabs API key not configured in server environment".to_string())?;
        let voice_id = self.elevenlabs_voice_id.as_ref().cloned().ok_or_else(|| {
            "ElevenLabs voice ID not configured in server environment".to_string()
        })?;
        Ok((api_key, voice_id))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            openai_api_key: None,
            openai_api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            elevenlabs_api_key: None,
            elevenlabs_api_base: DEFAULT_ELEVENLABS_API_BASE.to_string(),
            elevenlabs_voice_id: None,
            realtime_model: None,
            realtime_voice: None,
            widget_jwt_secret: None,
            cors_allowed_origins: None,
            rate_limit_requests_per_second: 60,
            rate_limit_burst_size: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ServerConfig implements Drop (secret zeroization), so struct update
    // syntax cannot move fields out of a default value; tests mutate instead.
    #[test]
    fn test_address() {
        let mut config = ServerConfig::default();
        config.host = "localhost".to_string();
        config.port = 8080;
        assert_eq!(config.address(), "localhost:8080");
    }

    #[test]
    fn test_require_openai_api_key_missing() {
        let config = ServerConfig::default();
        let result = config.require_openai_api_key();
        assert_eq!(
            result.unwrap_err(),
            "OpenAI API key not configured in server environment"
        );
    }

    #[test]
    fn test_require_openai_api_key_present() {
        let mut config = ServerConfig::default();
        config.openai_api_key = Some("sk-test".to_string());
        assert_eq!(config.require_openai_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_require_elevenlabs_credentials() {
        let mut config = ServerConfig::default();
        config.elevenlabs_api_key = Some("el-key".to_string());
        // Voice id still missing
        assert_eq!(
            config.require_elevenlabs_credentials().unwrap_err(),
            "ElevenLabs voice ID not configured in server environment"
        );

        config.elevenlabs_voice_id = Some("voice-1".to_string());
        let (key, voice) = config.require_elevenlabs_credentials().unwrap();
        assert_eq!(key, "el-key");
        assert_eq!(voice, "voice-1");
    }

    #[test]
    fn test_has_relay_auth() {
        let mut config = ServerConfig::default();
        assert!(!config.has_relay_auth());

        config.widget_jwt_secret = Some("secret".to_string());
        assert!(config.has_relay_auth());
    }
}

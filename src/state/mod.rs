use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::config::ServerConfig;
use crate::relay::registry::ConnectionRegistry;

/// Application state that can be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    /// Shared HTTP client for provider calls (connection pooling)
    pub http: reqwest::Client,
    /// Registry of live relay connections and their channels
    pub relay: Arc<ConnectionRegistry>,
    /// Relay credential verifier, present when a relay secret is configured
    pub verifier: Option<TokenVerifier>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let verifier = config
            .widget_jwt_secret
            .as_deref()
            .map(TokenVerifier::new);

        if verifier.is_none() {
            tracing::warn!(
                "WIDGET_JWT_SECRET not configured, relay connections will be refused"
            );
        }

        Arc::new(Self {
            config,
            http: reqwest::Client::new(),
            relay: Arc::new(ConnectionRegistry::new()),
            verifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verifier_built_from_config_secret() {
        let mut config = ServerConfig::default();
        config.widget_jwt_secret = Some("secret".to_string());

        let state = AppState::new(config);
        assert!(state.verifier.is_some());
    }

    #[test]
    fn test_no_secret_no_verifier() {
        let state = AppState::new(ServerConfig::default());
        assert!(state.verifier.is_none());
    }
}

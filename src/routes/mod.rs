//! Route assembly
//!
//! `create_app` wires the public health route, the proxy API routes, and the
//! relay WebSocket route together with the CORS and security-header layers.
//! Rate limiting is layered on in main.rs because it needs peer address
//! information that router-level tests do not have.

pub mod api;
pub mod ws;

use std::sync::Arc;

use axum::Router;
use http::{
    HeaderName, Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::handlers::health;
use crate::state::AppState;

/// Build the CORS layer from the configured origins
///
/// `"*"` allows any origin (without credentials), a comma-separated list
/// allows those origins with credentials, and no configuration means strict
/// same-origin. Preflight `OPTIONS` requests are answered by this layer with
/// 200 and the configured headers.
pub fn build_cors_layer(cors_allowed_origins: Option<&str>) -> CorsLayer {
    let allowed_methods = [Method::GET, Method::POST, Method::OPTIONS];
    let allowed_headers = [
        AUTHORIZATION,
        CONTENT_TYPE,
        HeaderName::from_static("x-requested-with"),
    ];

    match cors_allowed_origins {
        Some("*") => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(allowed_methods)
            .allow_headers(allowed_headers)
            .allow_credentials(false),
        Some(origins) => {
            // Parse comma-separated origins
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(allowed_methods)
                .allow_headers(allowed_headers)
                .allow_credentials(true)
        }
        None => {
            info!(
                "CORS not configured, defaulting to same-origin only. \
                 Set CORS_ALLOWED_ORIGINS to enable cross-origin access."
            );
            CorsLayer::new()
                .allow_methods(allowed_methods)
                .allow_headers(allowed_headers)
                .allow_credentials(false)
        }
    }
}

/// Assemble the full application router
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors_layer = build_cors_layer(state.config.cors_allowed_origins.as_deref());

    // Security headers
    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ));

    // Public health check route (no auth)
    let public_routes = Router::new().route("/", axum::routing::get(health::health_check));

    public_routes
        .merge(api::create_api_router())
        .merge(ws::create_ws_router())
        .with_state(state)
        .layer(cors_layer)
        .layer(security_headers)
}

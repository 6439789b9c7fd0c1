use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::{session, tts};
use crate::state::AppState;
use std::sync::Arc;

/// Create the proxy API router
///
/// Both endpoints accept `POST` only; other methods on these paths get a
/// 405 from the router, and `OPTIONS` preflights are answered by the CORS
/// layer applied in `create_app`.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/realtime-session", post(session::create_session))
        .route("/tts", post(tts::synthesize))
        .layer(TraceLayer::new_for_http())
}

//! Relay WebSocket route configuration
//!
//! # Endpoint
//!
//! `GET /ws` - WebSocket upgrade for the chat/mood relay
//!
//! # Protocol
//!
//! The handshake must carry a credential (`Authorization: Bearer <token>` or
//! `?token=<token>`). After upgrade the server sends `welcome`, then clients
//! exchange:
//!
//! ```json
//! // Client
//! {"type": "chat_message", "message": "hi"}
//! {"type": "mood_update", "mood": "stressed"}
//!
//! // Server
//! {"type": "typing", "typing": true}
//! {"type": "response", "message": "...", "timestamp": 1700000000000}
//! {"type": "mood_response", "message": "...", "timestamp": 1700000000000}
//! {"type": "error", "code": "parse_error", "message": "..."}
//! ```

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::relay::relay_handler;
use crate::state::AppState;
use std::sync::Arc;

/// Create the relay WebSocket router
pub fn create_ws_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ws", get(relay_handler))
        .layer(TraceLayer::new_for_http())
}

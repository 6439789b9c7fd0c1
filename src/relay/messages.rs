//! Relay WebSocket message types
//!
//! All relay events are JSON objects tagged by a `type` field. Incoming
//! messages are the two client events; outgoing messages cover the welcome,
//! typing indicator, canned responses, and error reporting.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Maximum allowed size for a chat message payload (16 KB)
pub const MAX_CHAT_MESSAGE_SIZE: usize = 16 * 1024;

/// Maximum allowed size for a mood value (1 KB)
pub const MAX_MOOD_SIZE: usize = 1024;

// =============================================================================
// Incoming Messages (Client -> Server)
// =============================================================================

/// Incoming WebSocket messages from the widget
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum RelayIncomingMessage {
    /// Free-text chat message
    #[serde(rename = "chat_message")]
    ChatMessage {
        /// Text content
        message: String,
    },

    /// Mood check-in (one of the recognized moods, or free text)
    #[serde(rename = "mood_update")]
    MoodUpdate {
        /// Reported mood
        mood: String,
    },
}

impl RelayIncomingMessage {
    /// Validate payload sizes before processing
    pub fn validate_size(&self) -> Result<(), String> {
        match self {
            Self::ChatMessage { message } if message.len() > MAX_CHAT_MESSAGE_SIZE => Err(
                format!("Chat message exceeds {MAX_CHAT_MESSAGE_SIZE} bytes"),
            ),
            Self::MoodUpdate { mood } if mood.len() > MAX_MOOD_SIZE => {
                Err(format!("Mood value exceeds {MAX_MOOD_SIZE} bytes"))
            }
            _ => Ok(()),
        }
    }
}

// =============================================================================
// Outgoing Messages (Server -> Client)
// =============================================================================

/// Outgoing WebSocket messages to the widget
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum RelayOutgoingMessage {
    /// One-time greeting sent to a freshly connected client
    #[serde(rename = "welcome")]
    Welcome {
        /// Greeting text
        message: String,
        /// Unix timestamp in milliseconds
        timestamp: i64,
    },

    /// Typing indicator around the delayed chat acknowledgment
    #[serde(rename = "typing")]
    Typing {
        /// Whether the assistant is "typing"
        typing: bool,
    },

    /// Canned acknowledgment for a chat message
    #[serde(rename = "response")]
    Response {
        /// Response text
        message: String,
        /// Unix timestamp in milliseconds
        timestamp: i64,
    },

    /// Supportive response to a mood check-in
    #[serde(rename = "mood_response")]
    MoodResponse {
        /// Response text
        message: String,
        /// Unix timestamp in milliseconds
        timestamp: i64,
    },

    /// Per-event processing failure, scoped to this connection
    #[serde(rename = "error")]
    Error {
        /// Machine-readable error code
        code: Option<String>,
        /// Human-readable description
        message: String,
    },
}

/// Current Unix timestamp in milliseconds for outgoing events
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

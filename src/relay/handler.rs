//! Relay WebSocket handler
//!
//! Authenticates the handshake, registers the connection into its per-user
//! channel, and routes chat/mood events to canned responses. Every emission
//! goes to the originating connection only; processing failures are reported
//! as `error` events and never take the relay down.

use axum::{
    extract::{
        RawQuery, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

use crate::auth::extract_token;
use crate::errors::auth_error::AuthError;
use crate::state::AppState;

use super::messages::{RelayIncomingMessage, RelayOutgoingMessage, now_millis};
use super::mood::Mood;

/// Channel buffer size for outgoing messages
const CHANNEL_BUFFER_SIZE: usize = 256;

/// Maximum WebSocket message size (64 KB) - relay events are small JSON
const MAX_WS_MESSAGE_SIZE: usize = 64 * 1024;

/// Fixed delay before the canned chat acknowledgment is emitted
const CHAT_ACK_DELAY: Duration = Duration::from_millis(1200);

/// Canned acknowledgment for chat messages. The text channel is decorative;
/// real language understanding happens on the browser's direct realtime
/// audio session.
const CHAT_ACK_TEXT: &str = "I received your message!";

/// One-time greeting for a freshly connected client
const WELCOME_TEXT: &str =
    "Hi, I'm Durmah, your Legal Eagle Buddy. How are you feeling today?";

/// Relay WebSocket handler
///
/// Verifies the handshake credential before upgrading; a connection without
/// a valid credential never reaches the event loop. On success the
/// connection is registered into the channel for its user.
pub async fn relay_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Response, AuthError> {
    let token = extract_token(&headers, query.as_deref())?;

    let verifier = state.verifier.as_ref().ok_or_else(|| {
        AuthError::ConfigError("Relay credential secret not configured".to_string())
    })?;
    let claims = verifier.verify(&token)?;

    info!(user_id = %claims.sub, "Relay WebSocket authenticated");

    Ok(ws
        .max_message_size(MAX_WS_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_relay_socket(socket, state, claims.sub)))
}

/// Handle an authenticated relay connection
async fn handle_relay_socket(socket: WebSocket, state: Arc<AppState>, user_id: String) {
    let connection = state.relay.register(&user_id);
    info!(
        connection_id = %connection.id,
        channel = %connection.channel,
        "Relay connection established"
    );

    let (mut sender, mut receiver) = socket.split();
    let (message_tx, mut message_rx) = mpsc::channel::<RelayOutgoingMessage>(CHANNEL_BUFFER_SIZE);

    // Sender task for outgoing messages
    let sender_task = tokio::spawn(async move {
        while let Some(message) = message_rx.recv().await {
            match serde_json::to_string(&message) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize outgoing relay message: {}", e);
                }
            }
        }
    });

    // One-time welcome, to this connection only
    let _ = message_tx
        .send(RelayOutgoingMessage::Welcome {
            message: WELCOME_TEXT.to_string(),
            timestamp: now_millis(),
        })
        .await;

    // Delayed acknowledgments scheduled for this connection. Aborted on
    // disconnect so nothing is emitted to a closed channel.
    let mut pending_acks: JoinSet<()> = JoinSet::new();

    while let Some(msg_result) = receiver.next().await {
        // Reap acknowledgments that have already fired
        while pending_acks.try_join_next().is_some() {}

        match msg_result {
            Ok(msg) => {
                if !process_relay_message(msg, &message_tx, &mut pending_acks).await {
                    break;
                }
            }
            Err(e) => {
                warn!(connection_id = %connection.id, "Relay WebSocket error: {}", e);
                break;
            }
        }
    }

    // Cleanup
    pending_acks.abort_all();
    sender_task.abort();
    state.relay.unregister(connection.id);
    info!(connection_id = %connection.id, "Relay connection closed");
}

/// Process one incoming WebSocket frame
///
/// Returns false when the connection should close. Failures are scoped to
/// this connection: an unparseable frame produces an `error` event and the
/// loop continues.
async fn process_relay_message(
    msg: Message,
    message_tx: &mpsc::Sender<RelayOutgoingMessage>,
    pending_acks: &mut JoinSet<()>,
) -> bool {
    match msg {
        Message::Text(text) => {
            let incoming: RelayIncomingMessage = match serde_json::from_str(&text) {
                Ok(msg) => msg,
                Err(e) => {
                    debug!("Failed to parse relay message: {}", e);
                    let _ = message_tx
                        .send(RelayOutgoingMessage::Error {
                            code: Some("parse_error".to_string()),
                            message: format!("Invalid message format: {e}"),
                        })
                        .await;
                    return true;
                }
            };

            if let Err(e) = incoming.validate_size() {
                warn!("Relay message validation failed: {}", e);
                let _ = message_tx
                    .send(RelayOutgoingMessage::Error {
                        code: Some("validation_error".to_string()),
                        message: e,
                    })
                    .await;
                return true;
            }

            handle_relay_event(incoming, message_tx, pending_acks).await;
            true
        }
        Message::Binary(_) => {
            debug!("Ignoring binary frame on relay channel");
            true
        }
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            info!("Relay WebSocket close received");
            false
        }
    }
}

/// Route a parsed relay event
async fn handle_relay_event(
    msg: RelayIncomingMessage,
    message_tx: &mpsc::Sender<RelayOutgoingMessage>,
    pending_acks: &mut JoinSet<()>,
) {
    match msg {
        RelayIncomingMessage::ChatMessage { message } => {
            debug!(len = message.len(), "Chat message received");

            // Typing indicator goes out immediately; the acknowledgment is
            // a cancellable delayed task tied to the connection lifetime
            let _ = message_tx
                .send(RelayOutgoingMessage::Typing { typing: true })
                .await;

            let ack_tx = message_tx.clone();
            pending_acks.spawn(async move {
                tokio::time::sleep(CHAT_ACK_DELAY).await;
                let _ = ack_tx
                    .send(RelayOutgoingMessage::Typing { typing: false })
                    .await;
                let _ = ack_tx
                    .send(RelayOutgoingMessage::Response {
                        message: CHAT_ACK_TEXT.to_string(),
                        timestamp: now_millis(),
                    })
                    .await;
            });
        }
        RelayIncomingMessage::MoodUpdate { mood } => {
            let mood = Mood::from_str_or_other(&mood);
            debug!(mood = %mood, "Mood update received");

            let _ = message_tx
                .send(RelayOutgoingMessage::MoodResponse {
                    message: mood.response().to_string(),
                    timestamp: now_millis(),
                })
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drain currently queued messages from the receiver without waiting
    fn drain(rx: &mut mpsc::Receiver<RelayOutgoingMessage>) -> Vec<RelayOutgoingMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    #[tokio::test]
    async fn test_mood_update_responds_immediately() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut acks = JoinSet::new();

        handle_relay_event(
            RelayIncomingMessage::MoodUpdate {
                mood: "stressed".to_string(),
            },
            &tx,
            &mut acks,
        )
        .await;

        let messages = drain(&mut rx);
        assert_eq!(messages.len(), 1);
        match &messages[0] {
            RelayOutgoingMessage::MoodResponse { message, .. } => {
                assert_eq!(*message, Mood::Stressed.response());
            }
            other => panic!("Expected mood_response, got {other:?}"),
        }
        assert!(acks.is_empty());
    }

    #[tokio::test]
    async fn test_chat_message_typing_precedes_delayed_ack() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut acks = JoinSet::new();

        handle_relay_event(
            RelayIncomingMessage::ChatMessage {
                message: "hello there".to_string(),
            },
            &tx,
            &mut acks,
        )
        .await;

        // Typing indicator is immediate, acknowledgment is still pending
        let immediate = drain(&mut rx);
        assert_eq!(immediate.len(), 1);
        assert!(matches!(
            immediate[0],
            RelayOutgoingMessage::Typing { typing: true }
        ));
        assert_eq!(acks.len(), 1);

        // After the delay, typing stops and the canned response arrives
        tokio::time::sleep(CHAT_ACK_DELAY + Duration::from_millis(100)).await;
        let delayed = drain(&mut rx);
        assert_eq!(delayed.len(), 2);
        assert!(matches!(
            delayed[0],
            RelayOutgoingMessage::Typing { typing: false }
        ));
        match &delayed[1] {
            RelayOutgoingMessage::Response { message, .. } => {
                assert_eq!(message, CHAT_ACK_TEXT);
            }
            other => panic!("Expected response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_aborted_ack_never_emits() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut acks = JoinSet::new();

        handle_relay_event(
            RelayIncomingMessage::ChatMessage {
                message: "hello".to_string(),
            },
            &tx,
            &mut acks,
        )
        .await;
        drain(&mut rx);

        // Connection closes before the timer fires
        acks.abort_all();
        tokio::time::sleep(CHAT_ACK_DELAY + Duration::from_millis(100)).await;

        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_frame_produces_error_event() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut acks = JoinSet::new();

        let keep_going =
            process_relay_message(Message::Text("not json".into()), &tx, &mut acks).await;
        assert!(keep_going);

        let messages = drain(&mut rx);
        assert_eq!(messages.len(), 1);
        match &messages[0] {
            RelayOutgoingMessage::Error { code, .. } => {
                assert_eq!(code.as_deref(), Some("parse_error"));
            }
            other => panic!("Expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_oversized_message_produces_validation_error() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut acks = JoinSet::new();

        let oversized = serde_json::json!({
            "type": "chat_message",
            "message": "x".repeat(super::super::messages::MAX_CHAT_MESSAGE_SIZE + 1),
        })
        .to_string();

        let keep_going = process_relay_message(Message::Text(oversized.into()), &tx, &mut acks).await;
        assert!(keep_going);

        let messages = drain(&mut rx);
        assert_eq!(messages.len(), 1);
        assert!(matches!(
            &messages[0],
            RelayOutgoingMessage::Error { code, .. } if code.as_deref() == Some("validation_error")
        ));
        // No acknowledgment was scheduled for the rejected message
        assert!(acks.is_empty());
    }

    #[tokio::test]
    async fn test_close_frame_ends_loop() {
        let (tx, _rx) = mpsc::channel(16);
        let mut acks = JoinSet::new();

        let keep_going = process_relay_message(Message::Close(None), &tx, &mut acks).await;
        assert!(!keep_going);
    }
}

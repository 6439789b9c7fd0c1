//! Connection registry
//!
//! Tracks live relay connections and their channel membership. The registry
//! is the only shared mutable state across connections; it uses DashMap so
//! concurrent join/leave cannot corrupt the bookkeeping.

use std::collections::HashSet;

use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

/// Channel name for a user identifier
///
/// All connections of one user land in the same channel, which keeps the
/// door open for multi-tab delivery and server-initiated push.
pub fn channel_for(user_id: &str) -> String {
    format!("user:{user_id}")
}

/// One live relay connection
#[derive(Debug, Clone)]
pub struct Connection {
    /// Stable identifier for this connection
    pub id: Uuid,
    /// Authenticated user the connection belongs to (from the credential `sub`)
    pub user_id: String,
    /// Channel the connection was placed into
    pub channel: String,
    /// When the handshake completed
    pub connected_at: OffsetDateTime,
}

/// Registry of live connections, keyed by connection id, with a channel
/// membership index
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<Uuid, Connection>,
    channels: DashMap<String, HashSet<Uuid>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a connection for an authenticated user and join its channel
    pub fn register(&self, user_id: &str) -> Connection {
        let connection = Connection {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            channel: channel_for(user_id),
            connected_at: OffsetDateTime::now_utc(),
        };

        self.channels
            .entry(connection.channel.clone())
            .or_default()
            .insert(connection.id);
        self.connections.insert(connection.id, connection.clone());

        connection
    }

    /// Remove a connection and release its channel membership
    ///
    /// Empty channel entries are dropped so the channel index does not grow
    /// with departed users.
    pub fn unregister(&self, id: Uuid) -> Option<Connection> {
        let (_, connection) = self.connections.remove(&id)?;

        let now_empty = match self.channels.get_mut(&connection.channel) {
            Some(mut members) => {
                members.remove(&id);
                members.is_empty()
            }
            None => false,
        };
        if now_empty {
            // Re-check under the entry lock: another connection may have
            // joined between the guard drop and this removal
            self.channels
                .remove_if(&connection.channel, |_, members| members.is_empty());
        }

        Some(connection)
    }

    /// Look up a connection by id
    pub fn get(&self, id: Uuid) -> Option<Connection> {
        self.connections.get(&id).map(|entry| entry.value().clone())
    }

    /// Connection ids currently in a channel
    pub fn channel_members(&self, channel: &str) -> Vec<Uuid> {
        self.channels
            .get(channel)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of connections currently in a channel
    pub fn channel_size(&self, channel: &str) -> usize {
        self.channels
            .get(channel)
            .map(|members| members.len())
            .unwrap_or(0)
    }

    /// Total number of live connections
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

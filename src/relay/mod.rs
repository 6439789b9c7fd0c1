//! Realtime relay
//!
//! An authenticated WebSocket endpoint that routes a small fixed set of
//! chat/mood events per connection. Connections are grouped into per-user
//! channels so multiple tabs of the same user share a logical room.

pub mod handler;
pub mod messages;
pub mod mood;
pub mod registry;

pub use handler::relay_handler;
pub use messages::{RelayIncomingMessage, RelayOutgoingMessage};
pub use mood::Mood;
pub use registry::{Connection, ConnectionRegistry};

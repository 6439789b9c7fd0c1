pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod relay;
pub mod routes;
pub mod state;

// Re-export commonly used items for convenience
pub use config::ServerConfig;
pub use errors::app_error::{AppError, AppResult};
pub use errors::auth_error::{AuthError, AuthResult};
pub use relay::registry::{Connection, ConnectionRegistry};
pub use state::AppState;

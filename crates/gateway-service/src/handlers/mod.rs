//! HTTP request handlers for the room gateway.

pub mod chat;
pub mod health;
pub mod metrics;
pub mod room;
pub mod tokens;

pub use chat::ai_response;
pub use health::{health_check, service_status};
pub use metrics::metrics_handler;
pub use room::create_room;
pub use tokens::{get_token, test_token, verify_token};

//! HTTP API for the meeting service webhook
//!
//! - POST /webhook - Receive an end-of-meeting payload
//! - GET / - Service identity
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, OkResponse, ServiceInfo};
pub use routes::create_router;
pub use state::AppState;

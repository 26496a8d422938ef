//! HTTP API module: service info, health, echo, and pipeline endpoints.

pub mod handlers;
pub mod response;
pub mod routes;

pub use handlers::AppState;
pub use response::{format_response, Envelope};
pub use routes::create_router;

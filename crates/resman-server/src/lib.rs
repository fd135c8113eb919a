//! Resource manager HTTP API: configuration, application state, the axum
//! router and the resource service behind it.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod service;
pub mod state;

pub use config::ServerConfig;
pub use routes::build_router;
pub use state::AppState;

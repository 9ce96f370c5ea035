//! Sentiscope Server
//!
//! HTTP front end for the review sentiment classifier. The model is loaded
//! once at startup and shared read-only by every request handler.

pub mod config;
pub mod routes;
pub mod state;

pub use config::{Cli, ServerConfig};
pub use routes::create_router;
pub use state::AppState;

//! HTTP server for the hash-linked log.
//!
//! Exposes one shared chain over HTTP: append a message, read the validated
//! chain, or verify it. The log handle is constructed once and passed to the
//! router explicitly.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use router::build_router;
pub use server::HllServer;

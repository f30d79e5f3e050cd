//! Server core functionality
//!
//! The HTTP surface of the connector: routing, request extraction and the
//! listener loop.

pub mod core;
pub mod routes;

pub use self::core::{AppState, Server};
pub use routes::router;

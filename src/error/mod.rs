//! Error handling
//!
//! Defines the connector error type and its status mapping.

pub mod handlers;
pub mod types;

pub use handlers::{error_to_http_status, handle_error};
pub use types::*;

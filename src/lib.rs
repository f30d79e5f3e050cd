//! File manager connector
//!
//! Serves the RichFilemanager connector protocol over HTTP for one
//! directory tree on the local filesystem.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod navigate;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod transfer;

pub use auth::{AccessControl, AllowAll, TokenAccess};
pub use config::ConnectorConfig;
pub use error::ConnectorError;
pub use protocol::{Connector, Envelope, Operation, Params, Reply, Transport, Upload};
pub use server::{AppState, Server, router};

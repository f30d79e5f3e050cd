//! Connector protocol implementation
//!
//! Parses operations, runs them through their handlers and wraps the
//! outcome in the response envelope.

pub mod commands;
pub mod dispatcher;
pub mod handlers;
pub mod parser;
pub mod responses;

pub use commands::{Operation, Transport};
pub use dispatcher::Connector;
pub use parser::{Params, Upload};
pub use responses::{Envelope, ErrorObject, OperationResult, Outcome, Payload, Reply};

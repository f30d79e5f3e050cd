//! Error handlers
//!
//! Logging and status mapping for connector errors.

use crate::error::types::ConnectorError;
use log::error;

/// Handle a connector error
pub fn handle_error(err: &ConnectorError) {
    error!("Filemanager ERROR {} : {}", err.short_code(), err);
}

/// Convert error to HTTP status code, used when a failure cannot travel
/// inside a JSON envelope answered with 200.
pub fn error_to_http_status(err: &ConnectorError) -> u16 {
    match err {
        ConnectorError::MissingParameter(_) => 400,
        ConnectorError::NotFound(_) => 404,
        ConnectorError::AlreadyExists(_) => 409,
        ConnectorError::InvalidPath(_) => 400,
        ConnectorError::NotADirectory(_) => 400,
        ConnectorError::IsADirectory(_) => 400,
        ConnectorError::SameName => 400,
        ConnectorError::RootProtected => 403,
        ConnectorError::ReadOnly => 403,
        ConnectorError::ForbiddenExtension(_) => 403,
        ConnectorError::OperationFailed(_) => 500,
        ConnectorError::UnknownMode { .. } => 400,
        ConnectorError::Unimplemented(_) => 501,
        ConnectorError::ImageReadError { .. } => 422,
        ConnectorError::Config(_) => 500,
    }
}

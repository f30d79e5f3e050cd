//! Error types
//!
//! Defines the single error type produced by every connector operation.

use std::io;

use thiserror::Error;

/// Numeric code carried by every error object. Clients only rely on it
/// being present.
pub const RESERVED_ERROR_CODE: &str = "-1";

/// Connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("{0}")]
    MissingParameter(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Path {0} is not a directory")]
    NotADirectory(String),
    #[error("Path {0} is a directory")]
    IsADirectory(String),
    #[error("Old name and new name are the same!")]
    SameName,
    #[error("Can't delete root")]
    RootProtected,
    #[error("The file manager is in read-only mode")]
    ReadOnly,
    #[error("Files with extension .{0} are not allowed")]
    ForbiddenExtension(String),
    #[error("Operation failed: {0}")]
    OperationFailed(String),
    #[error("Unknown {transport} mode: {mode}")]
    UnknownMode { transport: &'static str, mode: String },
    #[error("Non implemented: {0}")]
    Unimplemented(String),
    #[error("Unable to read image {path}: {reason}")]
    ImageReadError { path: String, reason: String },
    #[error("configuration error: {0}")]
    Config(String),
}

impl ConnectorError {
    /// Short identifier placed in the `id` field of the error envelope.
    pub fn short_code(&self) -> &'static str {
        match self {
            ConnectorError::MissingParameter(_) => "MISSING_PARAMETER",
            ConnectorError::NotFound(_) => "NOT_FOUND",
            ConnectorError::AlreadyExists(_) => "ALREADY_EXISTS",
            ConnectorError::InvalidPath(_) => "INVALID_PATH",
            ConnectorError::NotADirectory(_) => "NOT_A_DIRECTORY",
            ConnectorError::IsADirectory(_) => "IS_A_DIRECTORY",
            ConnectorError::SameName => "SAME_NAME",
            ConnectorError::RootProtected => "ROOT_PROTECTED",
            ConnectorError::ReadOnly => "READ_ONLY",
            ConnectorError::ForbiddenExtension(_) => "FORBIDDEN_EXTENSION",
            ConnectorError::OperationFailed(_) => "OPERATION_FAILED",
            ConnectorError::UnknownMode { .. } => "UNKNOWN_MODE",
            ConnectorError::Unimplemented(_) => "UNIMPLEMENTED",
            ConnectorError::ImageReadError { .. } => "IMAGE_READ_ERROR",
            ConnectorError::Config(_) => "CONFIG",
        }
    }

    pub fn not_found(virtual_path: &str) -> Self {
        ConnectorError::NotFound(format!("Path {virtual_path} doesn't exist"))
    }

    pub fn already_exists(name: &str) -> Self {
        ConnectorError::AlreadyExists(format!(
            "A file with that name ({name}) already exists"
        ))
    }

    /// Converts an I/O failure on `virtual_path`, keeping exclusive-create
    /// collisions distinguishable from other faults.
    pub fn from_io(err: io::Error, virtual_path: &str) -> Self {
        match err.kind() {
            io::ErrorKind::AlreadyExists => ConnectorError::already_exists(virtual_path),
            io::ErrorKind::NotFound => ConnectorError::not_found(virtual_path),
            _ => ConnectorError::OperationFailed(err.to_string()),
        }
    }
}

impl From<io::Error> for ConnectorError {
    fn from(error: io::Error) -> Self {
        ConnectorError::OperationFailed(error.to_string())
    }
}

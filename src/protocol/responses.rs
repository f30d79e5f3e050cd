//! Connector responses
//!
//! The two JSON envelopes the connector may answer with, the payloads they
//! carry and the final reply handed to the HTTP layer.

use serde::Serialize;

use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, RESERVED_ERROR_CODE};
use crate::navigate::Listing;
use crate::storage::FileDescriptor;
use crate::transfer::Attachment;

/// Successful payload of a JSON operation
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Initiate(InitiateInfo),
    File(FileDescriptor),
    Folder(Listing),
    Files(Vec<FileDescriptor>),
}

/// What an operation produced
#[derive(Debug, Clone)]
pub enum Outcome {
    Data(Payload),
    Attachment(Attachment),
}

pub type OperationResult = Result<Outcome, ConnectorError>;

impl From<FileDescriptor> for Outcome {
    fn from(descriptor: FileDescriptor) -> Self {
        Outcome::Data(Payload::File(descriptor))
    }
}

/// One entry of the `errors` array
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorObject {
    pub id: String,
    pub title: String,
    pub code: String,
}

/// `{ "data": ... }` or `{ "errors": [ ... ] }`, nothing else.
#[derive(Debug, Clone, Serialize)]
pub enum Envelope {
    #[serde(rename = "data")]
    Data(Payload),
    #[serde(rename = "errors")]
    Errors(Vec<ErrorObject>),
}

impl Envelope {
    pub fn from_error(err: &ConnectorError) -> Self {
        Envelope::Errors(vec![ErrorObject {
            id: err.short_code().to_string(),
            title: err.to_string(),
            code: RESERVED_ERROR_CODE.to_string(),
        }])
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Envelope::Errors(_))
    }
}

/// Final answer of the dispatcher
#[derive(Debug)]
pub enum Reply {
    /// Access denied; answered exactly like a missing route.
    NotFound,
    Json(Envelope),
    Attachment(Attachment),
    /// A binary operation failed; the HTTP layer picks a status for it.
    Failed(ConnectorError),
}

/// Static UI configuration returned by `initiate`
#[derive(Debug, Clone, Serialize)]
pub struct InitiateInfo {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: InitiateAttributes,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitiateAttributes {
    pub config: UiConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub options: UiOptions,
    pub security: UiSecurity,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiOptions {
    pub culture: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSecurity {
    pub allow_folder_download: bool,
    pub read_only: bool,
    pub extensions: ExtensionPolicy,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionPolicy {
    pub ignore_case: bool,
    pub policy: &'static str,
    pub restrictions: Vec<String>,
}

impl InitiateInfo {
    pub fn from_config(config: &ConnectorConfig) -> Self {
        Self {
            id: "/",
            kind: "initiate",
            attributes: InitiateAttributes {
                config: UiConfig {
                    options: UiOptions {
                        culture: config.culture.clone(),
                    },
                    security: UiSecurity {
                        allow_folder_download: config.allow_folder_download,
                        read_only: config.read_only,
                        extensions: ExtensionPolicy {
                            ignore_case: false,
                            policy: "DISALLOW_LIST",
                            restrictions: config.disallowed_extensions.clone(),
                        },
                    },
                },
            },
        }
    }
}

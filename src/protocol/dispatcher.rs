//! Request dispatch
//!
//! [`Connector`] is the context every handler runs in: the immutable
//! configuration and the path resolver for its root. [`Connector::dispatch`]
//! turns one request into exactly one [`Reply`].

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use log::{debug, info};

use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, handle_error};
use crate::protocol::commands::{Operation, Transport};
use crate::protocol::parser::Params;
use crate::protocol::responses::{Envelope, OperationResult, Outcome, Reply};
use crate::storage::{ConfinedPath, FileDescriptor, PathResolver, describe};

/// Shared, read-only connector state
#[derive(Debug, Clone)]
pub struct Connector {
    config: Arc<ConnectorConfig>,
    resolver: PathResolver,
}

impl Connector {
    /// Build the connector, creating the root directory if needed.
    pub fn new(config: Arc<ConnectorConfig>) -> Result<Self, ConnectorError> {
        let resolver = PathResolver::new(&config.server_root_path()).map_err(|e| {
            ConnectorError::Config(format!("server root {}: {}", config.server_root, e))
        })?;
        info!("File Manager using file path: {}", resolver.root().display());
        Ok(Self { config, resolver })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn resolve(&self, virtual_path: &str) -> Result<ConfinedPath, ConnectorError> {
        self.resolver.resolve(virtual_path)
    }

    pub fn describe(
        &self,
        path: &ConfinedPath,
        content: Option<String>,
    ) -> Result<FileDescriptor, ConnectorError> {
        describe(path, &self.config.userfiles_url(), content)
    }

    /// Runs `operation`, converting a panic inside a handler into
    /// `OperationFailed` so no fault escapes unstructured.
    pub fn execute(&self, operation: Operation, params: &Params) -> OperationResult {
        catch_unwind(AssertUnwindSafe(|| operation.execute(params, self))).unwrap_or_else(|_| {
            Err(ConnectorError::OperationFailed(format!(
                "internal error while handling {}",
                operation.mode()
            )))
        })
    }

    /// Handle one connector request.
    ///
    /// `allowed` is the access-control decision for the request; a denial is
    /// reported as a missing route.
    pub fn dispatch(&self, allowed: bool, transport: Transport, params: &Params) -> Reply {
        if !allowed {
            debug!("Connector request denied by access control");
            return Reply::NotFound;
        }

        let operation = match Operation::parse(params.mode(), transport) {
            Ok(operation) => operation,
            Err(e) => {
                handle_error(&e);
                return Reply::Json(Envelope::from_error(&e));
            }
        };
        debug!("{} {}", transport.as_str(), operation.mode());

        match self.execute(operation, params) {
            Ok(Outcome::Data(payload)) => Reply::Json(Envelope::Data(payload)),
            Ok(Outcome::Attachment(attachment)) => Reply::Attachment(attachment),
            Err(e) => {
                handle_error(&e);
                if operation.is_binary() && !params.is_xhr() {
                    Reply::Failed(e)
                } else {
                    Reply::Json(Envelope::from_error(&e))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn connector() -> (tempfile::TempDir, Connector) {
        let dir = tempfile::tempdir().unwrap();
        let config = Arc::new(ConnectorConfig::with_root(dir.path()));
        (dir, Connector::new(config).unwrap())
    }

    #[test]
    fn denial_looks_like_missing_route() {
        let (_dir, connector) = connector();
        let params = Params::from_pairs([("mode", "initiate")]);
        assert!(matches!(
            connector.dispatch(false, Transport::Get, &params),
            Reply::NotFound
        ));
    }

    #[test]
    fn unknown_mode_is_an_error_envelope() {
        let (_dir, connector) = connector();
        let params = Params::from_pairs([("mode", "explode")]);
        match connector.dispatch(true, Transport::Get, &params) {
            Reply::Json(envelope) => assert!(envelope.is_error()),
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[test]
    fn binary_failures_are_not_enveloped() {
        let (_dir, connector) = connector();
        let params = Params::from_pairs([("mode", "download"), ("path", "/missing.bin")]);
        assert!(matches!(
            connector.dispatch(true, Transport::Get, &params),
            Reply::Failed(ConnectorError::NotFound(_))
        ));
    }

    #[test]
    fn read_only_refuses_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ConnectorConfig::with_root(dir.path());
        config.read_only = true;
        let connector = Connector::new(Arc::new(config)).unwrap();

        let params = Params::from_pairs([("mode", "addfolder"), ("path", "/"), ("name", "x")]);
        match connector.dispatch(true, Transport::Get, &params) {
            Reply::Json(envelope) => assert!(envelope.is_error()),
            other => panic!("unexpected reply {other:?}"),
        }
        assert!(!dir.path().join("x").exists());
    }

    #[test]
    fn creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("uploads");
        let config = Arc::new(ConnectorConfig::with_root(&root));
        Connector::new(config).unwrap();
        assert!(fs::metadata(&root).unwrap().is_dir());
    }
}

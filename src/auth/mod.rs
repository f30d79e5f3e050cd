//! Access control
//!
//! The connector asks one question per request: may this proceed? The
//! answer comes from an [`AccessControl`] collaborator chosen at startup.

pub mod validator;

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::config::ConnectorConfig;

pub use validator::{ACCESS_TOKEN_HEADER, TokenAccess};

/// Decides whether a connector request may proceed.
pub trait AccessControl: Send + Sync {
    fn is_allowed(&self, headers: &HeaderMap) -> bool;
}

/// Used when nothing else is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessControl for AllowAll {
    fn is_allowed(&self, _headers: &HeaderMap) -> bool {
        true
    }
}

impl<F> AccessControl for F
where
    F: Fn(&HeaderMap) -> bool + Send + Sync,
{
    fn is_allowed(&self, headers: &HeaderMap) -> bool {
        self(headers)
    }
}

/// The collaborator implied by the configuration: a shared token when one
/// is configured, otherwise allow everything.
pub fn from_config(config: &ConnectorConfig) -> Arc<dyn AccessControl> {
    match &config.access_token {
        Some(token) if !token.is_empty() => Arc::new(TokenAccess::new(token.clone())),
        _ => Arc::new(AllowAll),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_collaborators() {
        let deny_all = |_: &HeaderMap| false;
        assert!(!deny_all.is_allowed(&HeaderMap::new()));
        assert!(AllowAll.is_allowed(&HeaderMap::new()));
    }

    #[test]
    fn config_without_token_allows_everything() {
        let config = ConnectorConfig::with_root("/tmp/x");
        assert!(from_config(&config).is_allowed(&HeaderMap::new()));

        let mut config = ConnectorConfig::with_root("/tmp/x");
        config.access_token = Some("s3cret".into());
        assert!(!from_config(&config).is_allowed(&HeaderMap::new()));
    }
}

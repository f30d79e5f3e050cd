//! Configuration management for the file manager connector
//!
//! Everything here is loaded once at startup and is read-only afterwards;
//! changing a value requires a restart.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config";
const ENV_PREFIX: &str = "FM_CONNECTOR";

/// Complete connector configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ConnectorConfig {
    // ═══ STORAGE ═══
    /// Directory exposed to the file manager. Required.
    pub server_root: String,

    // ═══ NETWORK ═══
    /// IP address the HTTP listener binds to
    pub bind_address: String,

    /// Port of the HTTP listener
    pub port: u16,

    /// Prefix every connector route is mounted under, e.g. `/fm`
    pub url_prefix: String,

    /// Largest accepted request body
    pub max_upload_size_mb: u64,

    // ═══ UI POLICY (reported by `initiate`) ═══
    pub culture: String,
    pub read_only: bool,
    pub allow_folder_download: bool,

    /// Extensions (without the dot) that may not be uploaded or renamed to
    pub disallowed_extensions: Vec<String>,

    /// Shared secret expected in `X-Access-Token`; no token means every
    /// request is allowed.
    pub access_token: Option<String>,
}

impl ConnectorConfig {
    /// Load configuration from `config.toml` with environment overrides
    /// (`FM_CONNECTOR_SERVER_ROOT`, `FM_CONNECTOR_PORT`, ...).
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from the given file stem. The file is optional;
    /// `server_root` must then come from the environment.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", "127.0.0.1")?
            .set_default("port", 5000)?
            .set_default("url_prefix", "/fm")?
            .set_default("max_upload_size_mb", 100)?
            .set_default("culture", "en")?
            .set_default("read_only", false)?
            .set_default("allow_folder_download", false)?
            .set_default("disallowed_extensions", Vec::<String>::new())?
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: ConnectorConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration for `server_root` with every other value at
    /// its default.
    pub fn with_root(server_root: impl Into<PathBuf>) -> Self {
        Self {
            server_root: server_root.into().to_string_lossy().to_string(),
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            url_prefix: "/fm".to_string(),
            max_upload_size_mb: 100,
            culture: "en".to_string(),
            read_only: false,
            allow_folder_download: false,
            disallowed_extensions: Vec::new(),
            access_token: None,
        }
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server_root.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "server_root cannot be empty".into(),
            ));
        }

        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.max_upload_size_mb == 0 {
            return Err(config::ConfigError::Message(
                "max_upload_size_mb must be greater than 0".into(),
            ));
        }

        if !self.url_prefix.starts_with('/') || self.url_prefix.ends_with('/') {
            return Err(config::ConfigError::Message(format!(
                "url_prefix must start with '/' and must not end with one: {:?}",
                self.url_prefix
            )));
        }

        Ok(())
    }

    /// Get bind address and port as socket address
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get server root as PathBuf
    pub fn server_root_path(&self) -> PathBuf {
        PathBuf::from(&self.server_root)
    }

    /// Get maximum request body size in bytes
    pub fn max_upload_size_bytes(&self) -> usize {
        (self.max_upload_size_mb as usize).saturating_mul(1024 * 1024)
    }

    /// Public URL under which raw files are served
    pub fn userfiles_url(&self) -> String {
        format!("{}/userfiles/", self.url_prefix)
    }

    /// Whether `file_name` carries a disallowed extension
    pub fn is_extension_disallowed(&self, file_name: &str) -> Option<String> {
        let (_, extension) = file_name.rsplit_once('.')?;
        self.disallowed_extensions
            .iter()
            .find(|disallowed| disallowed.as_str() == extension)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_file_and_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("connector");
        fs::write(
            stem.with_extension("toml"),
            "server_root = \"/srv/files\"\nport = 8081\ndisallowed_extensions = [\"exe\"]\n",
        )
        .unwrap();

        let config = ConnectorConfig::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(config.server_root, "/srv/files");
        assert_eq!(config.port, 8081);
        assert_eq!(config.url_prefix, "/fm");
        assert_eq!(config.culture, "en");
        assert!(!config.read_only);
        assert_eq!(config.disallowed_extensions, vec!["exe".to_string()]);
        assert_eq!(config.access_token, None);
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("connector");
        fs::write(stem.with_extension("toml"), "port = 8081\n").unwrap();

        assert!(ConnectorConfig::load_from(stem.to_str().unwrap()).is_err());
    }

    #[test]
    fn rejects_bad_prefix() {
        let mut config = ConnectorConfig::with_root("/tmp/x");
        config.url_prefix = "fm/".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn extension_policy_is_case_sensitive() {
        let mut config = ConnectorConfig::with_root("/tmp/x");
        config.disallowed_extensions = vec!["exe".into()];
        assert_eq!(
            config.is_extension_disallowed("setup.exe"),
            Some("exe".to_string())
        );
        assert_eq!(config.is_extension_disallowed("setup.EXE"), None);
        assert_eq!(config.is_extension_disallowed("README"), None);
    }
}

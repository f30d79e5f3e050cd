//! File manager connector - Entry Point
//!
//! Loads the configuration, prepares the root directory and serves the
//! connector routes until stopped.

use std::sync::Arc;

use anyhow::Context;
use log::info;

use fm_connector::auth;
use fm_connector::{ConnectorConfig, Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let config = ConnectorConfig::load().context("failed to load configuration")?;
    let config = Arc::new(config);

    info!("Launching file manager connector...");

    let access = auth::from_config(&config);
    let server = Server::bind(config, access)
        .await
        .context("failed to start connector")?;
    server.start().await.context("server stopped unexpectedly")?;
    Ok(())
}

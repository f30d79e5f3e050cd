use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::auth::AccessControl;
use crate::config::ConnectorConfig;
use crate::error::ConnectorError;
use crate::protocol::Connector;
use crate::server::routes::router;

/// State shared by every HTTP handler. Both parts are fixed at startup.
#[derive(Clone)]
pub struct AppState {
    pub connector: Arc<Connector>,
    pub access: Arc<dyn AccessControl>,
}

pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Prepare the root directory and bind the listener.
    pub async fn bind(
        config: Arc<ConnectorConfig>,
        access: Arc<dyn AccessControl>,
    ) -> Result<Self, ConnectorError> {
        let connector = Arc::new(Connector::new(Arc::clone(&config))?);

        let socket = config.socket_address();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(ConnectorError::Config(format!(
                    "failed to bind {socket}: {e}"
                )));
            }
        };

        Ok(Self {
            listener,
            state: AppState { connector, access },
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve requests until the process is stopped.
    pub async fn start(self) -> std::io::Result<()> {
        let config = self.state.connector.config();
        info!(
            "Starting file manager connector on {} under {}",
            self.local_addr()?,
            config.url_prefix
        );

        let app = router(self.state.clone());
        axum::serve(self.listener, app).await
    }
}

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::host::Host;
use crate::router::build_router_with_limit;

/// FileStore peer host.
pub struct FileStoreServer {
    config: ServerConfig,
}

impl FileStoreServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router over `host` (useful for testing).
    pub fn router(&self, host: Host) -> axum::Router {
        build_router_with_limit(host, self.config.max_body_bytes)
    }

    /// Open the configured world state and serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let host = Host::new(self.config.open_state()?);
        let app = self.router(host);
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!(
            bind_addr = %self.config.bind_addr,
            state = ?self.config.state,
            "FileStore server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                tokio::signal::ctrl_c().await.ok();
            })
            .await?;
        info!("FileStore server shut down gracefully");
        Ok(())
    }
}

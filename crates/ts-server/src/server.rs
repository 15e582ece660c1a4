use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// TrustShift HTTP server.
pub struct TrustShiftServer {
    config: ServerConfig,
    state: AppState,
}

impl TrustShiftServer {
    /// Open the configured store and wire the services. Fails if the store
    /// cannot be opened; there is no fallback backend.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let state = AppState::from_config(&config)?;
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), &self.config.cors_origins)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        info!(
            addr = %self.config.bind_addr,
            store = self.state.store_backend,
            "TrustShift server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    #[test]
    fn server_construction() {
        let server = TrustShiftServer::new(ServerConfig::default()).unwrap();
        assert_eq!(server.config().bind_addr, "127.0.0.1:8000".parse().unwrap());
        let _router = server.router();
    }

    #[test]
    fn corrupt_store_file_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "garbage").unwrap();
        let config = ServerConfig {
            store: StoreConfig::File { path },
            ..ServerConfig::default()
        };
        let err = TrustShiftServer::new(config).err().unwrap();
        assert_eq!(err.kind(), ts_types::ErrorKind::StoreUnavailable);
    }
}

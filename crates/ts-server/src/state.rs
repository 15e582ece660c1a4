use std::sync::Arc;

use ts_disclosure::DisclosureService;
use ts_registry::Registry;
use ts_risk::RiskEngine;
use ts_shift::ShiftManager;
use ts_store::RecordStore;
use ts_token::TokenCodec;
use ts_types::{Clock, SystemClock};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Services shared by every request handler. One store handle is injected
/// into each service at construction.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub shifts: Arc<ShiftManager>,
    pub disclosure: Arc<DisclosureService>,
    pub store_backend: &'static str,
}

impl AppState {
    /// Open the configured store and wire the services on the system clock.
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        let store = config.store.open()?;
        Self::new(store, Arc::new(SystemClock), config)
    }

    pub fn new(
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        config: &ServerConfig,
    ) -> ServerResult<Self> {
        config.validate()?;
        let codec = TokenCodec::from_config(&config.token)?;
        Ok(Self {
            store_backend: store.backend(),
            registry: Arc::new(Registry::new(store.clone(), clock.clone())),
            shifts: Arc::new(ShiftManager::new(
                store.clone(),
                clock.clone(),
                RiskEngine::new(config.risk.clone()),
                codec.clone(),
            )),
            disclosure: Arc::new(DisclosureService::new(store, clock, codec)),
        })
    }

    /// Run a service call on the blocking pool. Store backends do
    /// synchronous I/O.
    pub async fn run<T, E, F>(&self, f: F) -> ServerResult<T>
    where
        F: FnOnce(&AppState) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<ServerError> + Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || f(&state))
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?
            .map_err(Into::into)
    }
}

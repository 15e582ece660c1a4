use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_risk::RiskConfig;
use ts_store::{InMemoryRecordStore, JsonFileRecordStore, RecordStore};
use ts_token::TokenConfig;

use crate::error::{ServerError, ServerResult};

/// Server configuration, usually read from a TOML file. Every section is
/// optional and falls back to its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Browser origins allowed by CORS.
    pub cors_origins: Vec<String>,
    /// Maximum log level (`error` through `trace`) when the binary is not
    /// run with `--verbose`.
    pub log_level: String,
    pub store: StoreConfig,
    pub risk: RiskConfig,
    pub token: TokenConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8000)),
            cors_origins: [
                "http://localhost:5173",
                "http://localhost:3000",
                "http://127.0.0.1:5173",
                "http://127.0.0.1:3000",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            log_level: "info".into(),
            store: StoreConfig::default(),
            risk: RiskConfig::default(),
            token: TokenConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(raw: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn validate(&self) -> ServerResult<()> {
        self.risk.validate()?;
        self.token.key()?;
        self.log_level
            .parse::<tracing::Level>()
            .map_err(|_| ServerError::Config(format!("unknown log level: {}", self.log_level)))?;
        Ok(())
    }
}

/// Which record store backs the server. There is no automatic fallback from
/// one backend to another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    #[default]
    Memory,
    File {
        path: PathBuf,
    },
}

impl StoreConfig {
    pub fn open(&self) -> ServerResult<Arc<dyn RecordStore>> {
        Ok(match self {
            Self::Memory => Arc::new(InMemoryRecordStore::new()),
            Self::File { path } => Arc::new(JsonFileRecordStore::open(path)?),
        })
    }
}

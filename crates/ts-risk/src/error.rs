/// Errors from risk engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RiskError {
    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

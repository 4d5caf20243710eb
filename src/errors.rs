use cashcast_config::ConfigError;
use cashcast_core::CoreError;
use thiserror::Error;

/// Failures surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid request: {0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Usage(String),
}

use agil_core::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] agil_core::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
    #[error("City has no characters usable in a topic name: {0}")]
    InvalidCity(String),
}

//! Error types for agil-core

use thiserror::Error;

use crate::auth::AuthError;
use crate::location::LocationError;

/// Result type alias using agil-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Stage failures recorded by the initialization pipeline.
///
/// None of these are fatal to the process: the orchestrator catches them at
/// its boundaries and the app still becomes usable.
#[derive(Error, Debug)]
pub enum Error {
    /// The user declined an OS permission
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// All location attempts were exhausted
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// Backend call failed
    #[error("Network error: {0}")]
    Network(String),

    /// Push topic registration failed
    #[error("Subscription error: {0}")]
    Subscription(String),

    /// Anonymous authentication failed
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<LocationError> for Error {
    fn from(error: LocationError) -> Self {
        match error {
            LocationError::PermissionDenied(reason) => Self::PermissionDenied(reason),
            unavailable @ LocationError::Unavailable { .. } => {
                Self::LocationUnavailable(unavailable.to_string())
            }
        }
    }
}

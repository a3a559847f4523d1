//! Location Resolver: one fix per launch with a bounded retry policy.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::sleep;

use crate::models::{LocationFix, LocationOptions, PermissionKind, Platform};
use crate::permission::PermissionGate;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(2_000);
/// iOS tends to fail the first fix requested right after the permission
/// dialog closes.
const IOS_WARMUP_DELAY: Duration = Duration::from_millis(1_000);

/// Why the host geolocation API could not produce a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionErrorKind {
    /// Retrying cannot help.
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl PositionErrorKind {
    pub const fn is_transient(self) -> bool {
        !matches!(self, Self::PermissionDenied)
    }
}

impl fmt::Display for PositionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PermissionDenied => "permission denied",
            Self::PositionUnavailable => "position unavailable",
            Self::Timeout => "timeout",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct PositionError {
    pub kind: PositionErrorKind,
    pub message: String,
}

impl PositionError {
    pub fn new(kind: PositionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied: {0}")]
    PermissionDenied(String),
    #[error("Location unavailable after {attempts} attempts: {last_error}")]
    Unavailable {
        attempts: u32,
        last_error: PositionError,
    },
}

/// Host geolocation API.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(
        &self,
        options: &LocationOptions,
    ) -> Result<LocationFix, PositionError>;
}

#[derive(Clone)]
pub struct LocationResolver {
    gate: PermissionGate,
    provider: Arc<dyn LocationProvider>,
    platform: Platform,
}

impl LocationResolver {
    pub fn new(
        gate: PermissionGate,
        provider: Arc<dyn LocationProvider>,
        platform: Platform,
    ) -> Self {
        Self {
            gate,
            provider,
            platform,
        }
    }

    /// Obtain a single fix.
    ///
    /// Fails immediately when the location permission is denied, either by
    /// the gate or by the provider on any attempt. Transient provider errors
    /// are retried up to three attempts in total, two seconds apart.
    pub async fn resolve(&self) -> Result<LocationFix, LocationError> {
        let permission = self.gate.request_permission(PermissionKind::Location).await;
        if !permission.granted {
            return Err(LocationError::PermissionDenied(
                permission
                    .reason
                    .unwrap_or_else(|| "location permission denied".to_string()),
            ));
        }

        let warmup = warmup_delay(self.platform);
        if !warmup.is_zero() {
            sleep(warmup).await;
        }

        let options = LocationOptions::default();
        let mut attempt = 1;
        loop {
            match self.provider.current_position(&options).await {
                Ok(fix) => {
                    tracing::info!(attempt, "Location fix obtained");
                    return Ok(fix);
                }
                Err(error) if !error.kind.is_transient() => {
                    tracing::warn!(attempt, "Location provider denied access: {}", error);
                    return Err(LocationError::PermissionDenied(error.message));
                }
                Err(error) if attempt >= MAX_ATTEMPTS => {
                    tracing::error!(attempt, "Giving up on location: {}", error);
                    return Err(LocationError::Unavailable {
                        attempts: attempt,
                        last_error: error,
                    });
                }
                Err(error) => {
                    tracing::warn!(attempt, "Location attempt failed, retrying: {}", error);
                    sleep(RETRY_DELAY).await;
                    attempt += 1;
                }
            }
        }
    }
}

const fn warmup_delay(platform: Platform) -> Duration {
    match platform {
        Platform::Ios => IOS_WARMUP_DELAY,
        Platform::Android => Duration::ZERO,
    }
}

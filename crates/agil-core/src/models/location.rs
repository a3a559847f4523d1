use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A single latitude/longitude reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationFix {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Settings passed to the host geolocation API on every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the host may hand back.
    pub maximum_age: Duration,
}

impl Default for LocationOptions {
    /// Tuned for availability over precision.
    fn default() -> Self {
        Self {
            high_accuracy: false,
            timeout: Duration::from_secs(30),
            maximum_age: Duration::from_secs(60),
        }
    }
}

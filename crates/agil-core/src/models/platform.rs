use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Host mobile platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            other => Err(format!("unknown platform '{other}' (expected android or ios)")),
        }
    }
}

/// Application metadata attached verbatim to backend reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadata {
    pub app_version: String,
    pub build_number: String,
    pub platform: Platform,
}

impl AppMetadata {
    pub fn new(
        app_version: impl Into<String>,
        build_number: impl Into<String>,
        platform: Platform,
    ) -> Self {
        Self {
            app_version: app_version.into(),
            build_number: build_number.into(),
            platform,
        }
    }
}

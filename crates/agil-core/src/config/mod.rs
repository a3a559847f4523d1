//! Shell configuration.
//!
//! The backend base URL depends on the deploy environment. It is chosen once
//! at startup by [`AppConfig::resolve`] and then passed explicitly to every
//! client; nothing reads the environment again at call time.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::{is_http_url, normalize_text_option};

const DEFAULT_SOURCE_URI: &str = "https://cooperativaagil.com.br/cooperado/dashboard";
const DEFAULT_TRUSTED_HOST: &str = "cooperativaagil.com.br";
const DEVELOPMENT_API_BASE_URL: &str = "http://localhost:3000";
const PRODUCTION_API_BASE_URL: &str = "https://gm.estudiopixel.net";
const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_NOTIFICATION_TITLE: &str = "Nova Notificação";
const DEFAULT_NOTIFICATION_BODY: &str = "Você recebeu uma notificação";
const DEFAULT_DISPLAY_DELAY_MS: u64 = 2_000;

const ENV_ENVIRONMENT: &str = "AGIL_ENV";
const ENV_API_BASE_URL: &str = "AGIL_API_BASE_URL";
const ENV_SOURCE_URI: &str = "AGIL_SOURCE_URI";
const ENV_ALLOWED_HOSTS: &str = "AGIL_ALLOWED_HOSTS";
const ENV_IDENTITY_URL: &str = "AGIL_IDENTITY_URL";
const ENV_FIREBASE_API_KEY: &str = "FIREBASE_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Deploy environment selected by build/deploy tooling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn default_api_base_url(self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_API_BASE_URL,
            Self::Production => PRODUCTION_API_BASE_URL,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    fn parse(value: &str) -> ConfigResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::Invalid(format!(
                "{ENV_ENVIRONMENT} must be development or production, got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-app notification popup defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationSettings {
    pub default_title: String,
    pub default_body: String,
    /// Delay before showing a notification that launched the app.
    pub display_delay_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_NOTIFICATION_TITLE.to_string(),
            default_body: DEFAULT_NOTIFICATION_BODY.to_string(),
            display_delay_ms: DEFAULT_DISPLAY_DELAY_MS,
        }
    }
}

impl NotificationSettings {
    pub const fn display_delay(&self) -> Duration {
        Duration::from_millis(self.display_delay_ms)
    }
}

/// Raw, build-provisioned configuration.
///
/// Only public endpoints and keys belong here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub source_uri: Option<String>,
    /// Explicit backend override; wins over the environment default.
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub allowed_hosts: Vec<String>,
    #[serde(default)]
    pub identity_url: Option<String>,
    #[serde(default)]
    pub firebase_api_key: Option<String>,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let environment = match normalize_text_option(lookup(ENV_ENVIRONMENT)) {
            Some(value) => Environment::parse(&value)?,
            None => Environment::default(),
        };
        let allowed_hosts = normalize_text_option(lookup(ENV_ALLOWED_HOSTS))
            .map(|hosts| {
                hosts
                    .split(',')
                    .filter_map(|host| normalize_text_option(Some(host.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            environment,
            source_uri: normalize_text_option(lookup(ENV_SOURCE_URI)),
            api_base_url: normalize_text_option(lookup(ENV_API_BASE_URL)),
            allowed_hosts,
            identity_url: normalize_text_option(lookup(ENV_IDENTITY_URL)),
            firebase_api_key: normalize_text_option(lookup(ENV_FIREBASE_API_KEY)),
            notifications: NotificationSettings::default(),
        })
    }

    /// Load configuration from a JSON file.
    pub fn from_json_path(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(payload: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Validate and pin every endpoint for this launch.
    pub fn resolve(self) -> ConfigResult<ResolvedConfig> {
        let api_base_url = match normalize_text_option(self.api_base_url) {
            Some(url) => normalize_http_url(url, "api_base_url")?,
            None => self.environment.default_api_base_url().to_string(),
        };
        let source_uri = normalize_http_url(
            normalize_text_option(self.source_uri)
                .unwrap_or_else(|| DEFAULT_SOURCE_URI.to_string()),
            "source_uri",
        )?;
        let identity_url = normalize_http_url(
            normalize_text_option(self.identity_url)
                .unwrap_or_else(|| DEFAULT_IDENTITY_URL.to_string()),
            "identity_url",
        )?;

        let mut allowed_hosts: Vec<String> = self
            .allowed_hosts
            .into_iter()
            .filter_map(|host| normalize_text_option(Some(host)))
            .collect();
        if allowed_hosts.is_empty() {
            allowed_hosts.push(DEFAULT_TRUSTED_HOST.to_string());
        }

        Ok(ResolvedConfig {
            environment: self.environment,
            source_uri,
            api_base_url,
            allowed_hosts,
            identity_url,
            firebase_api_key: normalize_text_option(self.firebase_api_key),
            notifications: self.notifications,
        })
    }
}

/// Configuration with every endpoint validated and fixed for this launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub environment: Environment,
    pub source_uri: String,
    pub api_base_url: String,
    pub allowed_hosts: Vec<String>,
    pub identity_url: String,
    #[serde(skip_serializing)]
    pub firebase_api_key: Option<String>,
    pub notifications: NotificationSettings,
}

fn normalize_http_url(value: String, field: &str) -> ConfigResult<String> {
    let value = value.trim();
    if is_http_url(value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::Invalid(format!(
            "'{field}' must include http:// or https://"
        )))
    }
}

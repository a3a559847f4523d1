//! Anonymous authentication against the Identity Toolkit REST API.
//!
//! The device is signed in without collecting credentials; the returned ID
//! token is the bearer token for backend calls during one initialization
//! pass. Nothing is persisted across launches.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::ResolvedConfig;
use crate::util::{compact_text, is_http_url, unix_timestamp_now};

const AUTH_HTTP_TIMEOUT_SECS: u64 = 15;

/// Opaque bearer token with provider-managed expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("AuthToken").field(&"[REDACTED]").finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AnonymousSession {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub local_id: String,
}

impl AnonymousSession {
    pub fn bearer_token(&self) -> AuthToken {
        AuthToken::new(self.id_token.clone())
    }
}

impl fmt::Debug for AnonymousSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AnonymousSession")
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("local_id", &self.local_id)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Anonymous auth is not configured for this build.")]
    NotConfigured,
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Auth API error: {0}")]
    Api(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Exchanges device identity for a short-lived bearer token.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self) -> AuthResult<AuthToken>;
}

#[derive(Clone)]
pub struct AnonymousAuthClient {
    identity_url: String,
    api_key: String,
    client: Client,
}

impl AnonymousAuthClient {
    /// Builds a client from resolved configuration.
    ///
    /// Returns `Ok(None)` when the build carries no API key.
    pub fn new_from_config(config: &ResolvedConfig) -> AuthResult<Option<Self>> {
        let Some(api_key) = config.firebase_api_key.clone() else {
            return Ok(None);
        };
        Ok(Some(Self::new(&config.identity_url, api_key)?))
    }

    pub fn new(identity_url: impl AsRef<str>, api_key: impl Into<String>) -> AuthResult<Self> {
        let identity_url = normalize_identity_url(identity_url.as_ref())?;
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(AuthError::InvalidConfiguration("API key must not be empty"));
        }

        Ok(Self {
            identity_url,
            api_key,
            client: Client::builder()
                .timeout(Duration::from_secs(AUTH_HTTP_TIMEOUT_SECS))
                .build()?,
        })
    }

    pub async fn sign_in_anonymously(&self) -> AuthResult<AnonymousSession> {
        let response = self
            .client
            .post(format!("{}/v1/accounts:signUp", self.identity_url))
            .query(&[("key", &self.api_key)])
            .json(&serde_json::json!({ "returnSecureToken": true }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Api(parse_api_error(status, &body)));
        }

        let payload = response.json::<SignUpResponse>().await?;
        let session = payload.into_session()?;
        tracing::info!(local_id = %session.local_id, "Anonymous sign-in succeeded");
        Ok(session)
    }
}

#[async_trait]
impl Authenticator for AnonymousAuthClient {
    async fn authenticate(&self) -> AuthResult<AuthToken> {
        Ok(self.sign_in_anonymously().await?.bearer_token())
    }
}

pub fn normalize_identity_url(url: &str) -> AuthResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AuthError::InvalidConfiguration(
            "Identity URL must not be empty",
        ));
    }
    if !is_http_url(trimmed) {
        return Err(AuthError::InvalidConfiguration(
            "Identity URL must include http:// or https://",
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    id_token: Option<String>,
    refresh_token: Option<String>,
    /// Seconds, encoded as a decimal string.
    expires_in: Option<String>,
    local_id: Option<String>,
}

impl SignUpResponse {
    fn into_session(self) -> AuthResult<AnonymousSession> {
        let expires_in = self
            .expires_in
            .as_deref()
            .map(str::trim)
            .map(str::parse::<i64>)
            .transpose()
            .map_err(|_| AuthError::Api("expiresIn is not a number".to_string()))?;

        match (self.id_token, self.refresh_token, expires_in, self.local_id) {
            (Some(id_token), Some(refresh_token), Some(expires_in), Some(local_id))
                if !id_token.trim().is_empty() =>
            {
                Ok(AnonymousSession {
                    id_token,
                    refresh_token,
                    expires_at: unix_timestamp_now().saturating_add(expires_in),
                    local_id,
                })
            }
            _ => Err(AuthError::Api(
                "Sign-up response did not include enough session fields".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdentityErrorResponse {
    error: Option<IdentityErrorBody>,
}

#[derive(Debug, Deserialize)]
struct IdentityErrorBody {
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<IdentityErrorResponse>(body) {
        if let Some(message) = payload.error.and_then(|error| error.message) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

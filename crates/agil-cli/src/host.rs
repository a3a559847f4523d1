//! Headless host adapters standing in for the mobile SDKs.
//!
//! Permissions are scripted from flags, the location is fixed, and the
//! messaging SDK only records what the pipeline asked of it.

use std::sync::Mutex;

use agil_core::auth::{AuthError, AuthResult, AuthToken, Authenticator};
use agil_core::location::{LocationProvider, PositionError};
use agil_core::messaging::{MessageHandler, MessagingProvider};
use agil_core::models::{LocationFix, LocationOptions, PermissionKind, PermissionStatus};
use agil_core::permission::PermissionPrompt;
use agil_core::TopicName;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedPermissions {
    pub deny_notifications: bool,
    pub deny_location: bool,
}

#[async_trait]
impl PermissionPrompt for ScriptedPermissions {
    async fn request(&self, kind: PermissionKind) -> Result<PermissionStatus, String> {
        let denied = match kind {
            PermissionKind::Notifications => self.deny_notifications,
            PermissionKind::Location => self.deny_location,
        };
        Ok(if denied {
            PermissionStatus::Denied
        } else {
            PermissionStatus::Granted
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StaticLocation {
    fix: LocationFix,
}

impl StaticLocation {
    pub const fn new(fix: LocationFix) -> Self {
        Self { fix }
    }
}

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn current_position(
        &self,
        _options: &LocationOptions,
    ) -> Result<LocationFix, PositionError> {
        Ok(self.fix)
    }
}

#[derive(Default)]
pub struct HeadlessMessaging {
    token: Option<String>,
    topics: Mutex<Vec<String>>,
    handlers: Mutex<Vec<MessageHandler>>,
}

impl HeadlessMessaging {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    pub fn subscribed_topics(&self) -> Vec<String> {
        self.topics
            .lock()
            .map(|topics| topics.clone())
            .unwrap_or_default()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().map(|handlers| handlers.len()).unwrap_or(0)
    }
}

#[async_trait]
impl MessagingProvider for HeadlessMessaging {
    async fn token(&self) -> Result<Option<String>, String> {
        Ok(self.token.clone())
    }

    async fn subscribe_to_topic(&self, topic: &TopicName) -> Result<(), String> {
        tracing::info!(%topic, "Recording topic subscription");
        self.topics
            .lock()
            .map_err(|_| "topic registry poisoned".to_string())?
            .push(topic.as_str().to_string());
        Ok(())
    }

    fn on_message(&self, handler: MessageHandler) {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.push(handler);
        }
    }
}

/// Authenticator used when the build carries no API key.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredAuthenticator;

#[async_trait]
impl Authenticator for UnconfiguredAuthenticator {
    async fn authenticate(&self) -> AuthResult<AuthToken> {
        Err(AuthError::NotConfigured)
    }
}

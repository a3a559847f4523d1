//! Push messaging provider seam and token acquisition.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{MessageOrigin, Platform, PushMessage};
use crate::topic::TopicName;

/// Callback invoked by the provider for every delivered message.
pub type MessageHandler = Arc<dyn Fn(PushMessage, MessageOrigin) + Send + Sync>;

/// Push messaging registration token.
#[derive(Clone, PartialEq, Eq)]
pub struct PushToken(String);

impl PushToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PushToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("PushToken").field(&"[REDACTED]").finish()
    }
}

/// Vendor push messaging SDK.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Whether the device already registered for remote messages.
    ///
    /// Only iOS requires explicit registration before a token exists.
    fn is_registered_for_remote_messages(&self) -> bool {
        true
    }

    async fn register_for_remote_messages(&self) -> Result<(), String> {
        Ok(())
    }

    /// Current registration token, `None` when the SDK has none to give.
    async fn token(&self) -> Result<Option<String>, String>;

    async fn subscribe_to_topic(&self, topic: &TopicName) -> Result<(), String>;

    /// Register `handler` for message delivery. Called once per launch.
    fn on_message(&self, handler: MessageHandler);
}

/// Retrieve the push registration token. Failures are logged and yield `None`.
pub async fn acquire_push_token(
    provider: &dyn MessagingProvider,
    platform: Platform,
) -> Option<PushToken> {
    if platform == Platform::Ios && !provider.is_registered_for_remote_messages() {
        if let Err(error) = provider.register_for_remote_messages().await {
            tracing::error!("Failed to register for remote messages: {}", error);
            return None;
        }
    }

    match provider.token().await {
        Ok(Some(token)) if !token.trim().is_empty() => {
            tracing::info!("Push token acquired");
            Some(PushToken::new(token.trim()))
        }
        Ok(_) => {
            tracing::info!("Messaging provider returned no push token");
            None
        }
        Err(error) => {
            tracing::error!("Failed to acquire push token: {}", error);
            None
        }
    }
}

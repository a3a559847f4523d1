//! Scripted collaborators shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::{Duration, Instant};

use crate::auth::{AuthError, AuthResult, AuthToken, Authenticator};
use crate::geocoding::AddressReporter;
use crate::location::{LocationProvider, PositionError, PositionErrorKind};
use crate::messaging::{MessageHandler, MessagingProvider};
use crate::models::{
    AddressComponents, LocationFix, LocationOptions, MessageOrigin, PermissionKind,
    PermissionStatus, PushMessage,
};
use crate::permission::PermissionPrompt;
use crate::topic::TopicName;

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{address}")
}

pub struct ScriptedPermissions {
    notifications: Result<PermissionStatus, String>,
    location: Result<PermissionStatus, String>,
    requests: Mutex<Vec<PermissionKind>>,
}

impl ScriptedPermissions {
    pub fn new(
        notifications: Result<PermissionStatus, String>,
        location: Result<PermissionStatus, String>,
    ) -> Self {
        Self {
            notifications,
            location,
            requests: Mutex::default(),
        }
    }

    pub fn uniform(result: Result<PermissionStatus, String>) -> Self {
        Self::new(result.clone(), result)
    }

    pub fn requests(&self) -> Vec<PermissionKind> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PermissionPrompt for ScriptedPermissions {
    async fn request(&self, kind: PermissionKind) -> Result<PermissionStatus, String> {
        self.requests.lock().unwrap().push(kind);
        match kind {
            PermissionKind::Notifications => self.notifications.clone(),
            PermissionKind::Location => self.location.clone(),
        }
    }
}

pub struct ScriptedLocation {
    results: Mutex<VecDeque<Result<LocationFix, PositionError>>>,
    calls: Mutex<Vec<(Instant, LocationOptions)>>,
}

impl ScriptedLocation {
    pub fn new(results: impl IntoIterator<Item = Result<LocationFix, PositionError>>) -> Self {
        Self {
            results: Mutex::new(results.into_iter().collect()),
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Time between consecutive attempts.
    pub fn gaps(&self) -> Vec<Duration> {
        let calls = self.calls.lock().unwrap();
        calls
            .windows(2)
            .map(|pair| pair[1].0.duration_since(pair[0].0))
            .collect()
    }

    pub fn last_options(&self) -> Option<LocationOptions> {
        self.calls.lock().unwrap().last().map(|(_, options)| *options)
    }
}

#[async_trait]
impl LocationProvider for ScriptedLocation {
    async fn current_position(
        &self,
        options: &LocationOptions,
    ) -> Result<LocationFix, PositionError> {
        self.calls.lock().unwrap().push((Instant::now(), *options));
        self.results.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(PositionError::new(
                PositionErrorKind::PositionUnavailable,
                "no scripted result left",
            ))
        })
    }
}

pub struct RecordingMessaging {
    token: Result<Option<String>, String>,
    registered: bool,
    fail_subscriptions: bool,
    registrations: AtomicUsize,
    topics: Mutex<Vec<String>>,
    handlers: Mutex<Vec<MessageHandler>>,
}

impl Default for RecordingMessaging {
    fn default() -> Self {
        Self::with_token(Ok(Some("push-token".to_string())))
    }
}

impl RecordingMessaging {
    pub fn with_token(token: Result<Option<String>, String>) -> Self {
        Self {
            token,
            registered: true,
            fail_subscriptions: false,
            registrations: AtomicUsize::new(0),
            topics: Mutex::default(),
            handlers: Mutex::default(),
        }
    }

    pub fn unregistered(mut self) -> Self {
        self.registered = false;
        self
    }

    pub fn failing_subscriptions(mut self) -> Self {
        self.fail_subscriptions = true;
        self
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn topics(&self) -> Vec<String> {
        self.topics.lock().unwrap().clone()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }

    pub fn deliver(&self, message: PushMessage, origin: MessageOrigin) {
        let handlers = self.handlers.lock().unwrap().clone();
        for handler in handlers {
            handler(message.clone(), origin);
        }
    }
}

#[async_trait]
impl MessagingProvider for RecordingMessaging {
    fn is_registered_for_remote_messages(&self) -> bool {
        self.registered
    }

    async fn register_for_remote_messages(&self) -> Result<(), String> {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn token(&self) -> Result<Option<String>, String> {
        self.token.clone()
    }

    async fn subscribe_to_topic(&self, topic: &TopicName) -> Result<(), String> {
        if self.fail_subscriptions {
            return Err("topic registration rejected".to_string());
        }
        self.topics.lock().unwrap().push(topic.as_str().to_string());
        Ok(())
    }

    fn on_message(&self, handler: MessageHandler) {
        self.handlers.lock().unwrap().push(handler);
    }
}

pub struct StaticAuthenticator {
    result: Result<String, String>,
    calls: AtomicUsize,
}

impl StaticAuthenticator {
    pub fn succeeding(token: &str) -> Self {
        Self {
            result: Ok(token.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self) -> AuthResult<AuthToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .map(AuthToken::new)
            .map_err(AuthError::Api)
    }
}

pub struct StubReporter {
    address: Option<AddressComponents>,
    calls: Mutex<Vec<(LocationFix, String)>>,
}

impl StubReporter {
    pub fn returning(address: Option<AddressComponents>) -> Self {
        Self {
            address,
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<(LocationFix, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AddressReporter for StubReporter {
    async fn report(&self, fix: LocationFix, token: &AuthToken) -> Option<AddressComponents> {
        self.calls
            .lock()
            .unwrap()
            .push((fix, token.as_str().to_string()));
        self.address.clone()
    }
}

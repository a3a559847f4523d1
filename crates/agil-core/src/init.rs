//! Initialization Orchestrator.
//!
//! Runs once per launch as a single linear chain:
//!
//! ```text
//! Start → PermissionChecked → TokenAcquired → Authenticated → LocationAttempted → Complete
//! ```
//!
//! The location tail (resolve → report → subscribe) is best-effort: its
//! failures are caught at one boundary and recorded. A failure before the
//! tail is caught at the outer boundary. Either way the pass ends in
//! `Complete` and the app stays usable.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::auth::{AuthToken, Authenticator};
use crate::error::{Error, Result};
use crate::geocoding::AddressReporter;
use crate::location::{LocationProvider, LocationResolver};
use crate::messaging::{acquire_push_token, MessageHandler, MessagingProvider, PushToken};
use crate::models::{AddressComponents, LocationFix, PermissionKind, PermissionResult, Platform};
use crate::permission::{PermissionGate, PermissionPrompt};
use crate::topic::{TopicName, TopicSubscriber};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStage {
    Start,
    PermissionChecked,
    TokenAcquired,
    Authenticated,
    LocationAttempted,
    Complete,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::PermissionChecked => "permission_checked",
            Self::TokenAcquired => "token_acquired",
            Self::Authenticated => "authenticated",
            Self::LocationAttempted => "location_attempted",
            Self::Complete => "complete",
        })
    }
}

/// A failure caught at one of the orchestrator's boundaries.
#[derive(Debug)]
pub struct StageFailure {
    /// The stage whose transition failed.
    pub stage: InitStage,
    pub error: Error,
}

/// Everything one initialization pass did.
#[derive(Debug, Default)]
pub struct InitReport {
    pub stages: Vec<InitStage>,
    pub notification_permission: Option<PermissionResult>,
    pub push_token: Option<PushToken>,
    pub authenticated: bool,
    pub location: Option<LocationFix>,
    pub address: Option<AddressComponents>,
    pub topic: Option<TopicName>,
    pub failures: Vec<StageFailure>,
}

impl InitReport {
    pub fn final_stage(&self) -> Option<InitStage> {
        self.stages.last().copied()
    }

    pub fn is_complete(&self) -> bool {
        self.final_stage() == Some(InitStage::Complete)
    }

    fn enter(&mut self, stage: InitStage) {
        tracing::debug!(%stage, "Initialization stage reached");
        self.stages.push(stage);
    }
}

/// Host collaborators driven by the orchestrator.
#[derive(Clone)]
pub struct InitServices {
    pub platform: Platform,
    pub permissions: Arc<dyn PermissionPrompt>,
    pub messaging: Arc<dyn MessagingProvider>,
    pub authenticator: Arc<dyn Authenticator>,
    pub location: Arc<dyn LocationProvider>,
    pub reporter: Arc<dyn AddressReporter>,
}

pub struct Initializer {
    services: InitServices,
    gate: PermissionGate,
    message_handler: Option<MessageHandler>,
}

impl Initializer {
    pub fn new(services: InitServices) -> Self {
        let gate = PermissionGate::new(Arc::clone(&services.permissions));
        Self {
            services,
            gate,
            message_handler: None,
        }
    }

    /// Handler registered with the messaging provider during the pass.
    #[must_use]
    pub fn with_message_handler(mut self, handler: MessageHandler) -> Self {
        self.message_handler = Some(handler);
        self
    }

    /// Run the pass. Consumes the initializer: a new launch is needed to retry.
    pub async fn run(self) -> InitReport {
        let mut report = InitReport::default();
        report.enter(InitStage::Start);

        if let Err(failure) = self.run_stages(&mut report).await {
            tracing::error!(stage = %failure.stage, "App initialization failed: {}", failure.error);
            report.failures.push(failure);
        }

        report.enter(InitStage::Complete);
        tracing::info!(
            failures = report.failures.len(),
            topic = ?report.topic.as_ref().map(TopicName::as_str),
            "App initialization complete"
        );
        report
    }

    async fn run_stages(&self, report: &mut InitReport) -> std::result::Result<(), StageFailure> {
        let notifications = self
            .gate
            .request_permission(PermissionKind::Notifications)
            .await;
        if !notifications.granted {
            tracing::info!("Notification permission denied, continuing without notifications");
        }
        report.notification_permission = Some(notifications);
        report.enter(InitStage::PermissionChecked);

        report.push_token =
            acquire_push_token(self.services.messaging.as_ref(), self.services.platform).await;
        report.enter(InitStage::TokenAcquired);

        if let Some(handler) = &self.message_handler {
            self.services.messaging.on_message(Arc::clone(handler));
        }

        let token = self
            .services
            .authenticator
            .authenticate()
            .await
            .map_err(|error| StageFailure {
                stage: InitStage::Authenticated,
                error: error.into(),
            })?;
        report.authenticated = true;
        report.enter(InitStage::Authenticated);

        if let Err(error) = self.enrich_with_location(&token, report).await {
            tracing::error!("Failed to process location: {}", error);
            report.failures.push(StageFailure {
                stage: InitStage::LocationAttempted,
                error,
            });
        }
        report.enter(InitStage::LocationAttempted);

        Ok(())
    }

    async fn enrich_with_location(&self, token: &AuthToken, report: &mut InitReport) -> Result<()> {
        let resolver = LocationResolver::new(
            self.gate.clone(),
            Arc::clone(&self.services.location),
            self.services.platform,
        );
        let fix = resolver.resolve().await.map_err(Error::from)?;
        report.location = Some(fix);

        let Some(address) = self.services.reporter.report(fix, token).await else {
            tracing::warn!("Backend returned no address information");
            return Ok(());
        };
        report.address = Some(address.clone());

        let Some(city) = address.city() else {
            tracing::warn!("City not found in backend response");
            return Ok(());
        };
        tracing::info!(location = %address.label(), "Location detected");

        let topic = TopicSubscriber::new(Arc::clone(&self.services.messaging))
            .subscribe(city, address.state.as_deref(), address.country.as_deref())
            .await?;
        report.topic = Some(topic);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::location::{PositionError, PositionErrorKind};
    use crate::models::{MessageOrigin, PermissionStatus, PushMessage};
    use crate::testing::{
        RecordingMessaging, ScriptedLocation, ScriptedPermissions, StaticAuthenticator,
        StubReporter,
    };

    const FIX: LocationFix = LocationFix::new(-23.5505, -46.6333);

    struct Harness {
        permissions: Arc<ScriptedPermissions>,
        messaging: Arc<RecordingMessaging>,
        authenticator: Arc<StaticAuthenticator>,
        location: Arc<ScriptedLocation>,
        reporter: Arc<StubReporter>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                permissions: Arc::new(ScriptedPermissions::uniform(Ok(PermissionStatus::Granted))),
                messaging: Arc::new(RecordingMessaging::default()),
                authenticator: Arc::new(StaticAuthenticator::succeeding("bearer-token")),
                location: Arc::new(ScriptedLocation::new([Ok(FIX)])),
                reporter: Arc::new(StubReporter::returning(Some(sao_paulo()))),
            }
        }

        fn services(&self) -> InitServices {
            InitServices {
                platform: Platform::Android,
                permissions: self.permissions.clone(),
                messaging: self.messaging.clone(),
                authenticator: self.authenticator.clone(),
                location: self.location.clone(),
                reporter: self.reporter.clone(),
            }
        }

        async fn run(&self) -> InitReport {
            Initializer::new(self.services()).run().await
        }
    }

    fn sao_paulo() -> AddressComponents {
        AddressComponents {
            city: Some("São Paulo".to_string()),
            state: Some("SP".to_string()),
            country: Some("Brasil".to_string()),
        }
    }

    #[tokio::test]
    async fn happy_path_visits_every_stage_and_subscribes() {
        let harness = Harness::new();

        let report = harness.run().await;

        assert_eq!(
            report.stages,
            vec![
                InitStage::Start,
                InitStage::PermissionChecked,
                InitStage::TokenAcquired,
                InitStage::Authenticated,
                InitStage::LocationAttempted,
                InitStage::Complete,
            ]
        );
        assert!(report.failures.is_empty());
        assert!(report.push_token.is_some());
        assert!(report.authenticated);
        assert_eq!(report.location, Some(FIX));
        assert_eq!(
            report.topic.as_ref().map(TopicName::as_str),
            Some("sao-paulo_sp_brasil")
        );
        assert_eq!(harness.messaging.topics(), vec!["sao-paulo_sp_brasil"]);
        assert_eq!(
            harness.reporter.calls(),
            vec![(FIX, "bearer-token".to_string())]
        );
        assert_eq!(
            harness.permissions.requests(),
            vec![PermissionKind::Notifications, PermissionKind::Location]
        );
    }

    #[tokio::test]
    async fn denied_notifications_still_complete() {
        let mut harness = Harness::new();
        harness.permissions = Arc::new(ScriptedPermissions::new(
            Ok(PermissionStatus::Denied),
            Ok(PermissionStatus::Granted),
        ));

        let report = harness.run().await;

        assert!(report.is_complete());
        assert!(!report.notification_permission.unwrap().granted);
        assert!(report.failures.is_empty());
        assert!(report.topic.is_some());
    }

    #[tokio::test]
    async fn missing_city_never_reaches_topic_subscriber() {
        let mut harness = Harness::new();
        harness.reporter = Arc::new(StubReporter::returning(Some(AddressComponents {
            city: None,
            state: Some("SP".to_string()),
            country: Some("Brasil".to_string()),
        })));

        let report = harness.run().await;

        assert!(report.is_complete());
        assert!(report.failures.is_empty());
        assert!(report.address.is_some());
        assert_eq!(report.topic, None);
        assert!(harness.messaging.topics().is_empty());
    }

    #[tokio::test]
    async fn no_address_information_is_not_a_failure() {
        let mut harness = Harness::new();
        harness.reporter = Arc::new(StubReporter::returning(None));

        let report = harness.run().await;

        assert!(report.is_complete());
        assert!(report.failures.is_empty());
        assert_eq!(report.address, None);
        assert!(harness.messaging.topics().is_empty());
    }

    #[tokio::test]
    async fn auth_failure_skips_location_tail_and_completes() {
        let mut harness = Harness::new();
        harness.authenticator = Arc::new(StaticAuthenticator::failing("OPERATION_NOT_ALLOWED"));

        let report = harness.run().await;

        assert_eq!(
            report.stages,
            vec![
                InitStage::Start,
                InitStage::PermissionChecked,
                InitStage::TokenAcquired,
                InitStage::Complete,
            ]
        );
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].stage, InitStage::Authenticated);
        assert_eq!(harness.authenticator.calls(), 1);
        assert!(matches!(report.failures[0].error, Error::Auth(_)));
        assert_eq!(harness.location.calls(), 0);
        assert!(harness.reporter.calls().is_empty());
    }

    #[tokio::test]
    async fn location_denial_is_recorded_and_swallowed() {
        let mut harness = Harness::new();
        harness.permissions = Arc::new(ScriptedPermissions::new(
            Ok(PermissionStatus::Granted),
            Ok(PermissionStatus::Denied),
        ));

        let report = harness.run().await;

        assert!(report.is_complete());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].stage, InitStage::LocationAttempted);
        assert!(matches!(report.failures[0].error, Error::PermissionDenied(_)));
        assert!(harness.reporter.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_location_is_recorded_as_unavailable() {
        let mut harness = Harness::new();
        let timeout = || PositionError::new(PositionErrorKind::Timeout, "timeout");
        harness.location = Arc::new(ScriptedLocation::new([
            Err(timeout()),
            Err(timeout()),
            Err(timeout()),
        ]));

        let report = harness.run().await;

        assert!(report.is_complete());
        assert!(matches!(
            report.failures[0].error,
            Error::LocationUnavailable(_)
        ));
        assert_eq!(harness.location.calls(), 3);
    }

    #[tokio::test]
    async fn subscription_failure_does_not_fail_startup() {
        let mut harness = Harness::new();
        harness.messaging = Arc::new(RecordingMessaging::default().failing_subscriptions());

        let report = harness.run().await;

        assert!(report.is_complete());
        assert_eq!(report.topic, None);
        assert!(matches!(report.failures[0].error, Error::Subscription(_)));
    }

    #[tokio::test]
    async fn missing_push_token_is_tolerated() {
        let mut harness = Harness::new();
        harness.messaging = Arc::new(RecordingMessaging::with_token(Err(
            "MISSING_INSTANCEID_SERVICE".to_string(),
        )));

        let report = harness.run().await;

        assert!(report.is_complete());
        assert!(report.push_token.is_none());
        assert!(report.failures.is_empty());
        assert!(report.topic.is_some());
    }

    #[tokio::test]
    async fn message_handler_is_registered_once() {
        let harness = Harness::new();
        let received = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = received.clone();
        let handler: MessageHandler = Arc::new(move |message: PushMessage, origin: MessageOrigin| {
            sink.lock().unwrap().push((message.title, origin));
        });

        let report = Initializer::new(harness.services())
            .with_message_handler(handler)
            .run()
            .await;
        assert!(report.is_complete());
        assert_eq!(harness.messaging.handler_count(), 1);

        harness.messaging.deliver(
            PushMessage {
                title: Some("Aviso".to_string()),
                ..Default::default()
            },
            MessageOrigin::Foreground,
        );
        assert_eq!(
            received.lock().unwrap().clone(),
            vec![(Some("Aviso".to_string()), MessageOrigin::Foreground)]
        );
    }
}

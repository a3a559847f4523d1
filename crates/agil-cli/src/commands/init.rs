use std::sync::Arc;

use agil_core::auth::{AnonymousAuthClient, Authenticator};
use agil_core::config::ResolvedConfig;
use agil_core::geocoding::GeocodingReporter;
use agil_core::models::{AddressComponents, AppMetadata, LocationFix, Platform};
use agil_core::notification::NotificationCenter;
use agil_core::{InitReport, InitServices, InitStage, Initializer, TopicName};
use serde::Serialize;

use crate::error::CliError;
use crate::host::{
    HeadlessMessaging, ScriptedPermissions, StaticLocation, UnconfiguredAuthenticator,
};

/// Options for a headless initialization pass.
#[derive(Debug, Clone)]
pub struct InitOptions {
    pub fix: LocationFix,
    pub platform: Platform,
    pub permissions: ScriptedPermissions,
    pub push_token: Option<String>,
    pub build_number: String,
    pub json: bool,
}

pub async fn run_init(config: &ResolvedConfig, options: InitOptions) -> Result<(), CliError> {
    validate_fix(options.fix)?;

    let metadata = AppMetadata::new(
        env!("CARGO_PKG_VERSION"),
        options.build_number.trim(),
        options.platform,
    );
    let reporter = GeocodingReporter::new(&config.api_base_url, metadata)?;
    let authenticator = build_authenticator(config)?;
    let messaging = Arc::new(HeadlessMessaging::new(options.push_token));
    let notifications = NotificationCenter::new(config.notifications.clone());

    tracing::info!(
        backend = %config.api_base_url,
        platform = %options.platform,
        "Running initialization pass"
    );
    let services = InitServices {
        platform: options.platform,
        permissions: Arc::new(options.permissions),
        messaging: messaging.clone(),
        authenticator,
        location: Arc::new(StaticLocation::new(options.fix)),
        reporter: Arc::new(reporter),
    };
    let report = Initializer::new(services)
        .with_message_handler(notifications.handler())
        .run()
        .await;
    tracing::debug!(
        topics = ?messaging.subscribed_topics(),
        handlers = messaging.handler_count(),
        "Headless messaging state after initialization"
    );

    if options.json {
        println!("{}", serde_json::to_string_pretty(&InitSummary::from(&report))?);
    } else {
        for line in render_init_report(&report) {
            println!("{line}");
        }
    }
    Ok(())
}

fn build_authenticator(config: &ResolvedConfig) -> Result<Arc<dyn Authenticator>, CliError> {
    match AnonymousAuthClient::new_from_config(config) {
        Ok(Some(client)) => Ok(Arc::new(client)),
        Ok(None) => {
            tracing::warn!("FIREBASE_API_KEY is not set; anonymous sign-in will be skipped");
            Ok(Arc::new(UnconfiguredAuthenticator))
        }
        Err(error) => Err(agil_core::Error::from(error).into()),
    }
}

pub fn validate_fix(fix: LocationFix) -> Result<(), CliError> {
    if !fix.latitude.is_finite() || !(-90.0..=90.0).contains(&fix.latitude) {
        return Err(CliError::InvalidCoordinates(format!(
            "latitude {} must be within -90..=90",
            fix.latitude
        )));
    }
    if !fix.longitude.is_finite() || !(-180.0..=180.0).contains(&fix.longitude) {
        return Err(CliError::InvalidCoordinates(format!(
            "longitude {} must be within -180..=180",
            fix.longitude
        )));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct InitSummary<'a> {
    pub stages: &'a [InitStage],
    pub notifications_granted: bool,
    pub push_token_acquired: bool,
    pub authenticated: bool,
    pub location: Option<LocationFix>,
    pub address: Option<&'a AddressComponents>,
    pub topic: Option<&'a str>,
    pub failures: Vec<FailureSummary>,
}

#[derive(Debug, Serialize)]
pub struct FailureSummary {
    pub stage: InitStage,
    pub error: String,
}

impl<'a> From<&'a InitReport> for InitSummary<'a> {
    fn from(report: &'a InitReport) -> Self {
        Self {
            stages: &report.stages,
            notifications_granted: report
                .notification_permission
                .as_ref()
                .is_some_and(|result| result.granted),
            push_token_acquired: report.push_token.is_some(),
            authenticated: report.authenticated,
            location: report.location,
            address: report.address.as_ref(),
            topic: report.topic.as_ref().map(TopicName::as_str),
            failures: report
                .failures
                .iter()
                .map(|failure| FailureSummary {
                    stage: failure.stage,
                    error: failure.error.to_string(),
                })
                .collect(),
        }
    }
}

pub fn render_init_report(report: &InitReport) -> Vec<String> {
    let summary = InitSummary::from(report);
    let stages = summary
        .stages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ");

    let mut lines = vec![
        format!("stages: {stages}"),
        format!("notifications: {}", granted_label(summary.notifications_granted)),
        format!("push token: {}", yes_no(summary.push_token_acquired)),
        format!("authenticated: {}", yes_no(summary.authenticated)),
    ];
    lines.push(match summary.location {
        Some(fix) => format!("location: {:.4}, {:.4}", fix.latitude, fix.longitude),
        None => "location: unavailable".to_string(),
    });
    lines.push(match summary.address {
        Some(address) => format!("address: {}", address.label()),
        None => "address: unavailable".to_string(),
    });
    lines.push(format!("topic: {}", summary.topic.unwrap_or("none")));
    for failure in summary.failures {
        lines.push(format!("failed at {}: {}", failure.stage, failure.error));
    }
    lines
}

const fn granted_label(granted: bool) -> &'static str {
    if granted {
        "granted"
    } else {
        "denied"
    }
}

const fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

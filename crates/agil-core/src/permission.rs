//! Permission Gate: asks the host OS for a capability and never fails.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{PermissionKind, PermissionResult, PermissionStatus};

const LOCATION_DENIED_REASON: &str =
    "Location permission denied. You can enable it in the app settings.";
const NOTIFICATIONS_DENIED_REASON: &str = "Notification permission denied.";

/// Host OS permission dialog.
///
/// Implementations may show a system prompt (at most once per install per
/// kind, per platform policy) and may fail when the platform API errors.
#[async_trait]
pub trait PermissionPrompt: Send + Sync {
    async fn request(&self, kind: PermissionKind) -> Result<PermissionStatus, String>;
}

#[derive(Clone)]
pub struct PermissionGate {
    prompt: Arc<dyn PermissionPrompt>,
}

impl PermissionGate {
    pub fn new(prompt: Arc<dyn PermissionPrompt>) -> Self {
        Self { prompt }
    }

    /// Request `kind`; platform failures come back as a denial with a reason.
    pub async fn request_permission(&self, kind: PermissionKind) -> PermissionResult {
        match self.prompt.request(kind).await {
            Ok(status) if status.is_granted() => {
                tracing::info!(permission = %kind, ?status, "Permission granted");
                PermissionResult::granted()
            }
            Ok(_) => {
                tracing::info!(permission = %kind, "Permission denied");
                PermissionResult::denied(denied_reason(kind))
            }
            Err(error) => {
                tracing::error!(permission = %kind, "Permission request failed: {}", error);
                PermissionResult::denied(format!(
                    "Unexpected error while requesting {kind} permission: {error}"
                ))
            }
        }
    }
}

const fn denied_reason(kind: PermissionKind) -> &'static str {
    match kind {
        PermissionKind::Notifications => NOTIFICATIONS_DENIED_REASON,
        PermissionKind::Location => LOCATION_DENIED_REASON,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::ScriptedPermissions;

    #[tokio::test]
    async fn granted_statuses_produce_granted_result() {
        for status in [
            PermissionStatus::Granted,
            PermissionStatus::Provisional,
            PermissionStatus::NotRequired,
        ] {
            let gate = PermissionGate::new(Arc::new(ScriptedPermissions::uniform(Ok(status))));
            assert_eq!(
                gate.request_permission(PermissionKind::Notifications).await,
                PermissionResult::granted()
            );
        }
    }

    #[tokio::test]
    async fn denied_location_explains_how_to_recover() {
        let gate = PermissionGate::new(Arc::new(ScriptedPermissions::uniform(Ok(
            PermissionStatus::Denied,
        ))));
        let result = gate.request_permission(PermissionKind::Location).await;
        assert!(!result.granted);
        assert!(result.reason.unwrap().contains("app settings"));
    }

    #[tokio::test]
    async fn prompt_failure_is_reported_as_denial() {
        let gate = PermissionGate::new(Arc::new(ScriptedPermissions::uniform(Err(
            "activity not attached".to_string(),
        ))));
        let result = gate.request_permission(PermissionKind::Location).await;
        assert!(!result.granted);
        let reason = result.reason.unwrap();
        assert!(reason.contains("location permission"));
        assert!(reason.contains("activity not attached"));
    }
}

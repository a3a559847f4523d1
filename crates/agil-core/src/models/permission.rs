//! Permission request model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// OS-level permission the shell asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    Notifications,
    Location,
}

impl PermissionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notifications => "notifications",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw answer from the host permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    /// iOS provisional notification authorization (quiet delivery).
    Provisional,
    Denied,
    /// The platform does not gate this capability behind a prompt.
    NotRequired,
}

impl PermissionStatus {
    pub const fn is_granted(self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// Outcome of a single permission request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionResult {
    pub granted: bool,
    pub reason: Option<String>,
}

impl PermissionResult {
    pub const fn granted() -> Self {
        Self {
            granted: true,
            reason: None,
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            granted: false,
            reason: Some(reason.into()),
        }
    }
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Push message as handed over by the messaging provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    pub message_id: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

/// How a push message reached the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageOrigin {
    /// Delivered while the app was in the foreground.
    Foreground,
    /// The user tapped the notification while the app was backgrounded.
    OpenedApp,
    /// The notification launched the app from a quit state.
    InitialLaunch,
}

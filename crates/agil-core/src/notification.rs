//! In-app presentation of delivered push messages.
//!
//! The presentation layer owns the "currently displayed notification" state.
//! It is written only from message-delivery callbacks, which may arrive
//! before, during or after the initialization pass.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::config::NotificationSettings;
use crate::messaging::MessageHandler;
use crate::models::{MessageOrigin, PushMessage};
use crate::util::normalize_text_option;

const LINK_DATA_KEY: &str = "url";

/// Content of the notification popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPopup {
    pub title: String,
    pub body: String,
    /// Opened with the OS link handler, never inside the dashboard view.
    pub link: Option<String>,
    pub origin: MessageOrigin,
}

impl NotificationPopup {
    pub fn from_message(
        message: &PushMessage,
        origin: MessageOrigin,
        settings: &NotificationSettings,
    ) -> Self {
        Self {
            title: normalize_text_option(message.title.clone())
                .unwrap_or_else(|| settings.default_title.clone()),
            body: normalize_text_option(message.body.clone())
                .unwrap_or_else(|| settings.default_body.clone()),
            link: normalize_text_option(message.data.get(LINK_DATA_KEY).cloned()),
            origin,
        }
    }
}

#[derive(Clone)]
pub struct NotificationCenter {
    settings: NotificationSettings,
    state: Arc<watch::Sender<Option<NotificationPopup>>>,
}

impl NotificationCenter {
    pub fn new(settings: NotificationSettings) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            settings,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<NotificationPopup>> {
        self.state.subscribe()
    }

    pub fn current(&self) -> Option<NotificationPopup> {
        self.state.borrow().clone()
    }

    /// Show `message`. A message that launched the app is shown after the
    /// configured delay so the dashboard has time to mount.
    pub fn present(&self, message: &PushMessage, origin: MessageOrigin) {
        tracing::info!(?origin, message_id = ?message.message_id, "Push message received");
        let popup = NotificationPopup::from_message(message, origin, &self.settings);

        if origin != MessageOrigin::InitialLaunch {
            self.state.send_replace(Some(popup));
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime available, showing launch notification immediately");
            self.state.send_replace(Some(popup));
            return;
        };
        let state = Arc::clone(&self.state);
        let delay = self.settings.display_delay();
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            state.send_replace(Some(popup));
        });
    }

    pub fn dismiss(&self) {
        self.state.send_replace(None);
    }

    /// Delivery callback to register with the messaging provider.
    pub fn handler(&self) -> MessageHandler {
        let center = self.clone();
        Arc::new(move |message: PushMessage, origin: MessageOrigin| {
            center.present(&message, origin);
        })
    }
}

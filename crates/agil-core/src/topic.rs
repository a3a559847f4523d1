//! Location-based push topics.
//!
//! A topic name is a pure function of `(city, state, country)`: each part is
//! lowercased, stripped of diacritics, every run of characters outside
//! `[a-z0-9]` becomes a single `-`, edges are trimmed, and the parts are
//! joined with `_`.

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::messaging::MessagingProvider;

const PART_SEPARATOR: &str = "_";

/// Normalized push topic identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TopicName(String);

impl TopicName {
    /// Build the topic for a location. Returns `None` when the city has no
    /// usable characters.
    ///
    /// A state or country that normalizes to nothing is left out, so
    /// `("Recife", "!!", "Brasil")` yields `recife_brasil`. The backend keeps
    /// such parts as empty segments (`recife__brasil`); topics built here
    /// never contain an empty segment.
    pub fn new(city: &str, state: Option<&str>, country: Option<&str>) -> Option<Self> {
        let city = normalize_element(city);
        if city.is_empty() {
            return None;
        }

        let parts: Vec<String> = std::iter::once(city)
            .chain(
                [state, country]
                    .into_iter()
                    .flatten()
                    .map(normalize_element)
                    .filter(|part| !part.is_empty()),
            )
            .collect();
        Some(Self(parts.join(PART_SEPARATOR)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a single topic part.
pub fn normalize_element(element: &str) -> String {
    static NON_ALPHANUMERIC: OnceLock<Regex> = OnceLock::new();
    let non_alphanumeric =
        NON_ALPHANUMERIC.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex"));

    let stripped: String = element
        .to_lowercase()
        .nfd()
        .filter(|ch| !is_combining_diacritic(*ch))
        .collect();
    non_alphanumeric
        .replace_all(&stripped, "-")
        .trim_matches('-')
        .to_string()
}

const fn is_combining_diacritic(ch: char) -> bool {
    matches!(ch, '\u{0300}'..='\u{036f}')
}

/// Subscribes the device to its location topic.
#[derive(Clone)]
pub struct TopicSubscriber {
    messaging: Arc<dyn MessagingProvider>,
}

impl TopicSubscriber {
    pub fn new(messaging: Arc<dyn MessagingProvider>) -> Self {
        Self { messaging }
    }

    /// Subscribe to the topic for `city` (required) and the optional parts.
    pub async fn subscribe(
        &self,
        city: &str,
        state: Option<&str>,
        country: Option<&str>,
    ) -> Result<TopicName> {
        let topic = TopicName::new(city, state, country).ok_or_else(|| {
            Error::InvalidInput(format!("city '{city}' has no usable topic characters"))
        })?;

        self.messaging
            .subscribe_to_topic(&topic)
            .await
            .map_err(|error| Error::Subscription(format!("{topic}: {error}")))?;

        tracing::info!(%topic, "Subscribed to location topic");
        Ok(topic)
    }
}

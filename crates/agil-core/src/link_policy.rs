//! Which navigations the embedded dashboard view may load in place.

use crate::config::ResolvedConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDecision {
    LoadInApp,
    /// Hand the URL to the OS link handler.
    OpenExternally,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPolicy {
    trusted_hosts: Vec<String>,
}

impl LinkPolicy {
    pub fn new(trusted_hosts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            trusted_hosts: trusted_hosts
                .into_iter()
                .map(Into::into)
                .filter(|host: &String| !host.trim().is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.allowed_hosts.iter().cloned())
    }

    /// A URL stays in the app when it contains any trusted hostname.
    pub fn decide(&self, url: &str) -> LinkDecision {
        if self
            .trusted_hosts
            .iter()
            .any(|host| url.contains(host.as_str()))
        {
            LinkDecision::LoadInApp
        } else {
            tracing::debug!(url, "Routing navigation to external handler");
            LinkDecision::OpenExternally
        }
    }
}

//! agil-core - Core library for the Agil app shell
//!
//! The shell shows the cooperative's web dashboard and, on every launch,
//! runs one best-effort initialization pass: notification permission, push
//! token, anonymous sign-in, a location fix, reverse geocoding and a push
//! topic subscription for the detected city. Vendor SDKs (push messaging,
//! geolocation, OS permission dialogs) are reached through the traits in
//! [`permission`], [`messaging`] and [`location`].

pub mod auth;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod init;
pub mod link_policy;
pub mod location;
pub mod messaging;
pub mod models;
pub mod notification;
pub mod permission;
pub mod topic;
pub mod util;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use init::{InitReport, InitServices, InitStage, Initializer};
pub use topic::TopicName;

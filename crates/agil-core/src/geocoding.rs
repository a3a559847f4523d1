//! Geocoding Reporter: posts the fix to the backend and reads back a coarse
//! address.
//!
//! One request per initialization pass, no retries here. Every failure is
//! logged and collapses to "no address information".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::AuthToken;
use crate::error::{Error, Result};
use crate::models::{AddressComponents, AppMetadata, LocationFix};
use crate::util::{compact_text, is_http_url, iso_timestamp_now};

const REVERSE_GEOCODING_PATH: &str = "/api/geocoding/reverse";
const GEOCODING_HTTP_TIMEOUT_SECS: u64 = 15;

/// Reports a fix and returns address components when the backend has them.
#[async_trait]
pub trait AddressReporter: Send + Sync {
    async fn report(&self, fix: LocationFix, token: &AuthToken) -> Option<AddressComponents>;
}

/// HTTP client for the backend reverse-geocoding endpoint.
#[derive(Debug, Clone)]
pub struct GeocodingReporter {
    endpoint: String,
    metadata: AppMetadata,
    client: Client,
}

impl GeocodingReporter {
    pub fn new(api_base_url: impl AsRef<str>, metadata: AppMetadata) -> Result<Self> {
        let base_url = api_base_url.as_ref().trim().trim_end_matches('/');
        if !is_http_url(base_url) {
            return Err(Error::InvalidInput(format!(
                "API base URL must include http:// or https://, got '{base_url}'"
            )));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(GEOCODING_HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|error| Error::Network(format!("Failed to construct HTTP client: {error}")))?;

        Ok(Self {
            endpoint: format!("{base_url}{REVERSE_GEOCODING_PATH}"),
            metadata,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, fix: LocationFix, token: &AuthToken) -> Result<AddressComponents> {
        let payload = ReverseGeocodingRequest {
            latitude: fix.latitude,
            longitude: fix.longitude,
            timestamp: iso_timestamp_now(),
            app_version: &self.metadata.app_version,
            build_number: &self.metadata.build_number,
            platform: self.metadata.platform.as_str(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                Error::Network(format!("Reverse geocoding request failed: {error}"))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| {
                Error::Network(format!("Failed to read geocoding response: {error}"))
            })?;
        parse_reverse_geocoding_response(status, &body)
    }
}

#[async_trait]
impl AddressReporter for GeocodingReporter {
    async fn report(&self, fix: LocationFix, token: &AuthToken) -> Option<AddressComponents> {
        match self.send(fix, token).await {
            Ok(address) => {
                tracing::info!(address = %address.label(), "Location reported");
                Some(address)
            }
            Err(error) => {
                tracing::error!("Failed to report location: {}", error);
                None
            }
        }
    }
}

/// Decode a reverse-geocoding response.
///
/// Public for testability: callers can exercise parsing without network access.
pub fn parse_reverse_geocoding_response(
    status: StatusCode,
    body: &str,
) -> Result<AddressComponents> {
    if !status.is_success() {
        return Err(Error::Network(format!(
            "geocoding endpoint returned HTTP {}: {}",
            status.as_u16(),
            compact_text(body)
        )));
    }

    let payload: ReverseGeocodingResponse = serde_json::from_str(body)
        .map_err(|error| Error::Network(format!("invalid geocoding response JSON: {error}")))?;
    payload
        .data
        .and_then(|data| data.address_components)
        .map(Into::into)
        .ok_or_else(|| {
            Error::Network("geocoding response did not include address_components".to_string())
        })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReverseGeocodingRequest<'a> {
    latitude: f64,
    longitude: f64,
    timestamp: String,
    app_version: &'a str,
    build_number: &'a str,
    platform: &'a str,
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodingResponse {
    data: Option<ReverseGeocodingData>,
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodingData {
    address_components: Option<BackendAddressComponents>,
}

#[derive(Debug, Deserialize)]
struct BackendAddressComponents {
    administrative_area_level_2: Option<String>,
    administrative_area_level_1: Option<String>,
    country: Option<String>,
}

impl From<BackendAddressComponents> for AddressComponents {
    fn from(value: BackendAddressComponents) -> Self {
        Self {
            city: value.administrative_area_level_2,
            state: value.administrative_area_level_1,
            country: value.country,
        }
    }
}

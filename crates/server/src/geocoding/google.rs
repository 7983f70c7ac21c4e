//! Google Geocoding API client.
//!
//! Speaks the JSON flavour of the API:
//!
//! ```text
//! GET {base_url}?address=<escaped address>&key=<api key>
//!
//! {"status": "OK", "results": [{"geometry": {"location": {"lat": 37.42, "lng": -122.08}}}]}
//! ```
//!
//! Any status other than `OK` is an error, and so is an `OK` with an empty
//! `results` array.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use order_locator_core::Location;

use super::{GeocodeError, Geocoder};
use crate::config::GeocodingConfig;

/// Status value the provider uses for a successful lookup.
const STATUS_OK: &str = "OK";

/// Geocoder backed by the Google Geocoding API (or anything speaking its format).
#[derive(Clone)]
pub struct GoogleGeocoder {
    client: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl GoogleGeocoder {
    /// Create a new geocoding client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build the request URL for one address.
    fn request_url(&self, address: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("key", self.api_key.expose_secret());
        url
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError> {
        let response = self.client.get(self.request_url(address)).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;

        let location = body.into_location()?;
        tracing::debug!(lat = location.lat, lng = location.lng, "Address geocoded");
        Ok(location)
    }
}

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

impl GeocodeResponse {
    /// Take the first result's coordinates, unchanged.
    fn into_location(self) -> Result<Location, GeocodeError> {
        if self.status != STATUS_OK {
            return Err(GeocodeError::Status(self.status));
        }

        self.results
            .into_iter()
            .next()
            .map(|result| result.geometry.location)
            .ok_or(GeocodeError::NoResults)
    }
}

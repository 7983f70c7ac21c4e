//! One-off geocoding command.
//!
//! Resolves a single address with the configured provider, which is the
//! quickest way to check an API key or a custom `GEOCODING_BASE_URL`.
//!
//! # Usage
//!
//! ```bash
//! ol-cli geocode "1600 Amphitheatre Parkway, Mountain View, CA"
//! ```
//!
//! # Environment Variables
//!
//! - `GEOCODING_API_KEY` - Provider API key
//! - `GEOCODING_BASE_URL` - Provider endpoint (optional)

use order_locator_server::config::{ConfigError, GeocodingConfig};
use order_locator_server::geocoding::{GeocodeError, Geocoder, GoogleGeocoder};
use thiserror::Error;

/// Errors that can occur while geocoding from the command line.
#[derive(Debug, Error)]
pub enum GeocodeCommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The provider lookup failed.
    #[error("{0}")]
    Geocode(#[from] GeocodeError),
}

/// Geocode `address` and print `lat,lng` to stdout.
///
/// # Errors
///
/// Returns an error if the geocoding configuration is invalid or the lookup fails.
pub async fn run(address: &str) -> Result<(), GeocodeCommandError> {
    let config = GeocodingConfig::from_env()?;
    let geocoder = GoogleGeocoder::new(&config)?;

    let location = geocoder.geocode(address).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{},{}", location.lat, location.lng);
    }
    Ok(())
}

//! Address geocoding.
//!
//! Turns free-text delivery addresses into coordinates by asking an external
//! provider. Every call is one network round trip: there is no retry, no
//! caching, and no timeout beyond the HTTP client defaults.

pub mod google;

use std::num::NonZeroUsize;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};
use thiserror::Error;

use order_locator_core::{Location, Order};

pub use google::GoogleGeocoder;

/// Errors that can occur while geocoding an address.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The HTTP request itself failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The provider's `status` field was not `OK`.
    #[error("Geocode request failed with status: {0}")]
    Status(String),

    /// The provider reported `OK` but returned no results.
    #[error("Geocode request returned no results")]
    NoResults,
}

/// Resolves addresses to coordinates.
///
/// Implementations are shared across requests behind an `Arc` and must be
/// safe for concurrent use.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve one address.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError` on network failure, undecodable responses, a
    /// non-`OK` provider status, or an empty result set.
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError>;
}

/// Geocode every order's address, keeping `locations[i]` aligned with `orders[i]`.
///
/// At most `concurrency` lookups are in flight at once. The first failure
/// aborts the whole batch; lookups still in flight are dropped.
///
/// # Errors
///
/// Returns the first `GeocodeError` produced by any lookup.
pub async fn geocode_orders(
    geocoder: &dyn Geocoder,
    orders: &[Order],
    concurrency: NonZeroUsize,
) -> Result<Vec<Location>, GeocodeError> {
    let lookups: Vec<_> = orders
        .iter()
        .map(|order| geocoder.geocode(&order.address))
        .collect();

    stream::iter(lookups)
        .buffered(concurrency.get())
        .try_collect()
        .await
}

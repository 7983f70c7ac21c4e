//! Integration tests for Order Locator.
//!
//! These tests talk to a running server over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server against a scratch database
//! RUN_MIGRATIONS=true cargo run -p order-locator-server
//!
//! # Run integration tests
//! cargo test -p order-locator-integration-tests -- --ignored
//! ```
//!
//! The target server is taken from `ORDER_LOCATOR_BASE_URL`
//! (default `http://localhost:8080`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use order_locator_core::Location;
use serde::Deserialize;

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("ORDER_LOCATOR_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// HTTP client that does not follow redirects, so 303s can be asserted.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Order as exported by `GET /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiOrder {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub preferable_delivery_time: String,
}

/// Body of `GET /api/orders`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrdersResponse {
    pub orders: Vec<ApiOrder>,
    pub locations: Vec<Location>,
}

/// Fetch and decode `GET /api/orders`.
///
/// # Errors
///
/// Returns an error if the request fails, the status is not 2xx, or the body
/// does not decode.
pub async fn fetch_orders(client: &reqwest::Client) -> Result<OrdersResponse, reqwest::Error> {
    client
        .get(format!("{}/api/orders", base_url()))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}

//! Order map and JSON export handlers.
//!
//! Both endpoints run the same pipeline: read every order, geocode every
//! address, pair the results by index. One failed lookup fails the request;
//! nothing is rendered for the orders that did resolve.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use tracing::instrument;

use order_locator_core::{Location, Order, OrdersWithLocations};

use crate::error::Result;
use crate::geocoding;
use crate::state::AppState;

/// Map page template.
#[derive(Template, WebTemplate)]
#[template(path = "map.html")]
pub struct MapTemplate {
    /// Orders paired with their coordinates.
    pub entries: OrdersWithLocations,
}

/// JSON body of `GET /api/orders`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrdersResponse {
    pub orders: Vec<OrderView>,
    pub locations: Vec<Location>,
}

/// One order as exported by the JSON API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderView {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub preferable_delivery_time: String,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            name: order.name,
            phone: order.phone,
            address: order.address,
            preferable_delivery_time: order.preferable_delivery_time,
        }
    }
}

impl From<OrdersWithLocations> for OrdersResponse {
    fn from(entries: OrdersWithLocations) -> Self {
        let (orders, locations) = entries.into_parts();
        Self {
            orders: orders.into_iter().map(OrderView::from).collect(),
            locations,
        }
    }
}

/// Read all orders and geocode each one.
async fn load_entries(state: &AppState) -> Result<OrdersWithLocations> {
    let orders = state.store().list_all().await?;
    let locations =
        geocoding::geocode_orders(state.geocoder(), &orders, state.geocode_concurrency()).await?;

    tracing::debug!(count = orders.len(), "Orders geocoded");
    Ok(OrdersWithLocations::new(orders, locations)?)
}

/// Display all orders on a map.
///
/// GET /map
#[instrument(skip(state))]
pub async fn map_page(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let entries = load_entries(&state).await?;
    Ok(MapTemplate { entries })
}

/// Export all orders with their coordinates as JSON.
///
/// GET /api/orders
#[instrument(skip(state))]
pub async fn api_orders(State(state): State<AppState>) -> Result<Json<OrdersResponse>> {
    let entries = load_entries(&state).await?;
    Ok(Json(entries.into()))
}

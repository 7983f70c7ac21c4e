//! Geocoded coordinates and their pairing with orders.

use serde::{Deserialize, Serialize};

use super::Order;

/// A latitude/longitude pair resolved from an order's address.
///
/// Locations are derived per request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl Location {
    /// Create a location from raw coordinates.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Raised when orders and locations cannot be paired index by index.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{orders} orders cannot be paired with {locations} locations")]
pub struct LocationMismatch {
    /// Number of orders supplied.
    pub orders: usize,
    /// Number of locations supplied.
    pub locations: usize,
}

/// Orders paired positionally with their locations.
///
/// `locations[i]` is always the location of `orders[i]`; the constructor
/// refuses lists of different lengths.
///
/// ## Examples
///
/// ```
/// use order_locator_core::{Location, Order, OrdersWithLocations};
///
/// let orders = vec![Order::new("Alice", "", "Main St 1", "")];
/// let paired = OrdersWithLocations::new(orders, vec![Location::new(1.0, 2.0)]).unwrap();
/// assert_eq!(paired.len(), 1);
///
/// assert!(OrdersWithLocations::new(Vec::new(), vec![Location::new(1.0, 2.0)]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersWithLocations {
    orders: Vec<Order>,
    locations: Vec<Location>,
}

impl OrdersWithLocations {
    /// Pair two index-aligned lists.
    ///
    /// # Errors
    ///
    /// Returns [`LocationMismatch`] if the lists differ in length.
    pub fn new(orders: Vec<Order>, locations: Vec<Location>) -> Result<Self, LocationMismatch> {
        if orders.len() != locations.len() {
            return Err(LocationMismatch {
                orders: orders.len(),
                locations: locations.len(),
            });
        }
        Ok(Self { orders, locations })
    }

    /// The orders, in store order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The locations, aligned with [`Self::orders`].
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Iterate over `(order, location)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Order, &Location)> {
        self.orders.iter().zip(self.locations.iter())
    }

    /// Number of paired entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Split back into the two aligned lists.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Order>, Vec<Location>) {
        (self.orders, self.locations)
    }
}

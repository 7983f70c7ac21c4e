//! Core types for Order Locator.

pub mod location;
pub mod order;

pub use location::{Location, LocationMismatch, OrdersWithLocations};
pub use order::Order;

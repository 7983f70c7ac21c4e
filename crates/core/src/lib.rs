//! Order Locator Core - Shared domain types.
//!
//! This crate provides the types shared by every Order Locator component:
//! - `server` - The order intake web service
//! - `cli` - Command-line tools for migrations and geocoding checks
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Orders, geocoded locations, and the index-aligned pairing of both

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

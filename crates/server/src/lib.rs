//! Order Locator server library.
//!
//! This crate provides the web service as a library, allowing it to be
//! tested and reused by the CLI.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`db`] - Order store trait with `PostgreSQL` and in-memory backends
//! - [`geocoding`] - Address geocoding against an external provider
//! - [`routes`] - HTTP handlers and router assembly
//! - [`state`] - Shared application state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod geocoding;
pub mod routes;
pub mod state;

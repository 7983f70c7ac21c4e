//! Order persistence.
//!
//! # Database: `order_db`
//!
//! Orders are kept as schemaless JSON documents, one row per order:
//!
//! ## Tables
//!
//! - `orders` - `id BIGSERIAL`, `document JSONB`, `created_at TIMESTAMPTZ`
//!
//! Rows are only ever inserted. Nothing in this service updates or deletes an
//! order, and the row id never leaves this module.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p order-locator-cli -- migrate
//! ```
//! or on server startup with `RUN_MIGRATIONS=true`.

pub mod memory;
pub mod orders;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use order_locator_core::Order;

pub use memory::MemoryOrderStore;
pub use orders::PgOrderStore;

/// Errors raised by an [`OrderStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connectivity, read, or write failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored document could not be decoded into an order.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Append-only storage for orders.
///
/// Implementations are shared across requests behind an `Arc` and must be
/// safe for concurrent use.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Append a new order. No uniqueness or validation is enforced.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` on connectivity or write failure.
    async fn create(&self, order: &Order) -> Result<(), StorageError>;

    /// Return every stored order in store iteration order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` on connectivity or read failure and
    /// `StorageError::DataCorruption` if a document fails to decode.
    async fn list_all(&self) -> Result<Vec<Order>, StorageError>;

    /// Check that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the store does not answer.
    async fn ping(&self) -> Result<(), StorageError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply pending migrations from `crates/server/migrations/`.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history is inconsistent.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

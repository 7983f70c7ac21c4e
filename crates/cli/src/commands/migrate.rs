//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! ol-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! Migrations live in `crates/server/migrations/` and are embedded into the
//! binary at compile time.

use order_locator_server::config::{self, ConfigError};
use order_locator_server::db;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply all pending migrations to the order database.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset, the database is unreachable,
/// or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = config::database_url_from_env()?;

    tracing::info!("Connecting to order database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}

//! Application state shared across handlers.

use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::config::{ServerConfig, StoreConfig};
use crate::db::{self, MemoryOrderStore, OrderStore, PgOrderStore};
use crate::geocoding::{GeocodeError, Geocoder, GoogleGeocoder};

/// Error wiring up application state at startup.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("geocoder setup failed: {0}")]
    Geocoder(#[from] GeocodeError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// order store and geocoder, both of which outlive any single request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn OrderStore>,
    geocoder: Arc<dyn Geocoder>,
    geocode_concurrency: NonZeroUsize,
}

impl AppState {
    /// Create application state from already-built collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn OrderStore>,
        geocoder: Arc<dyn Geocoder>,
        geocode_concurrency: NonZeroUsize,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                geocoder,
                geocode_concurrency,
            }),
        }
    }

    /// Build the store and geocoder described by `config`.
    ///
    /// Connects to `PostgreSQL` (and migrates, if asked) for the postgres
    /// backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable, a migration fails,
    /// or the HTTP client cannot be built.
    pub async fn from_config(config: &ServerConfig) -> Result<Self, StateError> {
        let store: Arc<dyn OrderStore> = match &config.store {
            StoreConfig::Postgres {
                database_url,
                run_migrations,
            } => {
                let pool = db::create_pool(database_url).await?;
                tracing::info!("Database pool created");

                if *run_migrations {
                    db::run_migrations(&pool).await?;
                    tracing::info!("Database migrations applied");
                }

                Arc::new(PgOrderStore::new(pool))
            }
            StoreConfig::Memory => {
                tracing::warn!("Using in-memory order store; orders are lost on restart");
                Arc::new(MemoryOrderStore::new())
            }
        };

        let geocoder = Arc::new(GoogleGeocoder::new(&config.geocoding)?);

        Ok(Self::new(store, geocoder, config.geocoding.concurrency))
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn store(&self) -> &dyn OrderStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the geocoder.
    #[must_use]
    pub fn geocoder(&self) -> &dyn Geocoder {
        self.inner.geocoder.as_ref()
    }

    /// Max in-flight geocoding calls per request.
    #[must_use]
    pub fn geocode_concurrency(&self) -> NonZeroUsize {
        self.inner.geocode_concurrency
    }
}

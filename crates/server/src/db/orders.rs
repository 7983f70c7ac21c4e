//! `PostgreSQL` order repository.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use sqlx::types::Json;

use order_locator_core::Order;

use super::{OrderStore, StorageError};

/// Order store backed by the `orders` JSONB table.
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn create(&self, order: &Order) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO orders (document)
            VALUES ($1)
            ",
        )
        .bind(Json(order))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Order>, StorageError> {
        let documents: Vec<JsonValue> = sqlx::query_scalar(
            r"
            SELECT document FROM orders
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        documents.into_iter().map(decode_order).collect()
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Decode one stored document into an order.
fn decode_order(document: JsonValue) -> Result<Order, StorageError> {
    serde_json::from_value(document)
        .map_err(|e| StorageError::DataCorruption(format!("invalid order document: {e}")))
}

//! In-process order store.
//!
//! Holds orders in a `Vec` for local development (`ORDER_STORE=memory`) and
//! for handler tests. Contents are lost when the process exits.

use async_trait::async_trait;
use tokio::sync::RwLock;

use order_locator_core::Order;

use super::{OrderStore, StorageError};

/// Order store that never leaves the process.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: RwLock<Vec<Order>>,
}

impl MemoryOrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `orders`, in that order.
    #[must_use]
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: RwLock::new(orders),
        }
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn create(&self, order: &Order) -> Result<(), StorageError> {
        self.orders.write().await.push(order.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Order>, StorageError> {
        Ok(self.orders.read().await.clone())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

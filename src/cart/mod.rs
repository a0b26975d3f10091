pub mod model;
pub mod store;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::GatewayError;
use crate::storage::StorageError;

pub use model::{CartAggregate, CartLineItem, LinePolicy};
pub use store::{CartOptions, CartStore, CartView, CheckoutReceipt, CheckoutSummary};

/// Line reference sent when the remote cart is overwritten or merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineRef {
    pub id: u64,
    pub quantity: u32,
}

/// Remote carts endpoint, used to seed an empty cart and to sync with it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteCarts: Send + Sync {
    async fn fetch_cart(&self, cart_id: u64) -> Result<CartAggregate, GatewayError>;
    async fn update_cart(
        &self,
        cart_id: u64,
        merge: bool,
        lines: Vec<CartLineRef>,
    ) -> Result<CartAggregate, GatewayError>;
    async fn delete_cart(&self, cart_id: u64) -> Result<(), GatewayError>;
}

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Failed to persist cart: {0}")]
    Storage(#[from] StorageError),
    #[error("Failed to reach remote cart: {0}")]
    Remote(#[from] GatewayError),
    #[error("Failed to encode cart: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("Cart has not been synced with the remote store yet")]
    Unsynced,
}

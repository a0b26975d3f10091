use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{CartAggregate, CartError, CartLineItem, CartLineRef, LinePolicy, RemoteCarts};
use crate::storage::{KeyValueStore, CART_KEY};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CartOptions {
    pub line_policy: LinePolicy,
    /// Remote cart fetched whenever the local cart is missing or was emptied.
    pub seed_cart_id: u64,
}

impl Default for CartOptions {
    fn default() -> Self {
        Self {
            line_policy: LinePolicy::Append,
            seed_cart_id: 1,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CartView {
    pub cart: Option<CartAggregate>,
    /// Set only while a remote cart call is in flight. Remote calls run under
    /// `&mut self`, so a view taken between operations always reads `false`.
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub total_products: usize,
    pub total: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub message: String,
    pub total_products: usize,
    pub total: f64,
    pub confirmed_at: DateTime<Utc>,
}

/// The active shopping cart, mirrored to `storage` after every mutation.
///
/// Failures are returned and also kept in the `error` slot of [`CartView`].
/// The in-memory cart is only replaced once its successor has been written.
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
    remote: Arc<dyn RemoteCarts>,
    options: CartOptions,
    cart: Option<CartAggregate>,
    // Cleared on every path out of a remote call, including errors.
    loading: bool,
    error: Option<String>,
}

impl CartStore {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteCarts>,
        options: CartOptions,
    ) -> Self {
        Self {
            storage,
            remote,
            options,
            cart: None,
            loading: false,
            error: None,
        }
    }

    pub fn cart(&self) -> Option<&CartAggregate> {
        self.cart.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> CartView {
        CartView {
            cart: self.cart.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }

    /// Loads the stored cart, or seeds one from the remote carts endpoint.
    pub async fn initialize(&mut self) -> Result<(), CartError> {
        self.error = None;
        let result = self.load_or_seed().await;
        self.settle(result, "load cart")
    }

    pub async fn add_line_item(&mut self, item: CartLineItem) -> Result<(), CartError> {
        self.error = None;
        let next = match &self.cart {
            Some(cart) => cart.with_line(item, self.options.line_policy),
            None => CartAggregate::from_lines(vec![item]),
        };
        let result = self.commit(next).await;
        self.settle(result, "add product to cart")
    }

    /// Removes every line with `id`. Emptying the cart re-seeds it.
    pub async fn remove_line_item(&mut self, id: u64) -> Result<(), CartError> {
        self.error = None;
        let Some(next) = self.cart.as_ref().and_then(|cart| cart.without_line(id)) else {
            debug!(product_id = id, "No cart line to remove");
            return Ok(());
        };
        let result = self.commit_and_prune(next).await;
        self.settle(result, "remove product from cart")
    }

    /// A quantity of zero or less removes the line instead.
    pub async fn update_quantity(&mut self, id: u64, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_line_item(id).await;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        self.error = None;
        let Some(next) = self
            .cart
            .as_ref()
            .and_then(|cart| cart.with_quantity(id, quantity))
        else {
            debug!(product_id = id, "No cart line to update");
            return Ok(());
        };
        let result = self.commit(next).await;
        self.settle(result, "update product quantity")
    }

    /// Pushes the local lines to the remote cart and adopts its answer.
    pub async fn sync_remote(&mut self, merge: bool) -> Result<(), CartError> {
        self.error = None;
        let result = self.push_remote(merge).await;
        self.settle(result, "update cart")
    }

    /// Deletes the remote cart, then forgets the local one.
    pub async fn delete_remote(&mut self) -> Result<(), CartError> {
        self.error = None;
        let result = self.drop_remote().await;
        self.settle(result, "delete cart")
    }

    pub fn checkout_summary(&self) -> CheckoutSummary {
        CheckoutSummary {
            total_products: self.cart.as_ref().map_or(0, |cart| cart.total_products),
            total: self.cart.as_ref().map_or(0.0, |cart| cart.total),
        }
    }

    /// Simulated purchase: nothing is charged, cleared or recorded.
    pub fn confirm_checkout(&self) -> CheckoutReceipt {
        let summary = self.checkout_summary();
        info!(
            total_products = summary.total_products,
            total = summary.total,
            "Checkout confirmed"
        );
        CheckoutReceipt {
            message: "Purchase completed successfully.".to_owned(),
            total_products: summary.total_products,
            total: summary.total,
            confirmed_at: Utc::now(),
        }
    }

    async fn load_or_seed(&mut self) -> Result<(), CartError> {
        match self.storage.get(CART_KEY).await? {
            Some(raw) => match serde_json::from_str::<CartAggregate>(&raw) {
                Ok(cart) => {
                    debug!(total_products = cart.total_products, "Loaded stored cart");
                    self.cart = Some(cart);
                    Ok(())
                }
                Err(err) => {
                    warn!(error = %err, "Discarding malformed stored cart");
                    self.storage.remove(CART_KEY).await?;
                    self.seed().await
                }
            },
            None => self.seed().await,
        }
    }

    async fn seed(&mut self) -> Result<(), CartError> {
        self.loading = true;
        let fetched = self.remote.fetch_cart(self.options.seed_cart_id).await;
        self.loading = false;
        let cart = fetched?;
        info!(
            cart_id = self.options.seed_cart_id,
            total_products = cart.total_products,
            "Seeded cart from remote"
        );
        self.commit(cart).await
    }

    async fn commit(&mut self, next: CartAggregate) -> Result<(), CartError> {
        let raw = serde_json::to_string(&next)?;
        self.storage.set(CART_KEY, &raw).await?;
        self.cart = Some(next);
        Ok(())
    }

    async fn commit_and_prune(&mut self, next: CartAggregate) -> Result<(), CartError> {
        self.commit(next).await?;
        if self.cart.as_ref().is_some_and(CartAggregate::is_empty) {
            info!("Cart is empty, re-seeding");
            self.cart = None;
            self.storage.remove(CART_KEY).await?;
            self.seed().await?;
        }
        Ok(())
    }

    async fn push_remote(&mut self, merge: bool) -> Result<(), CartError> {
        let cart = self.cart.as_ref().ok_or(CartError::Unsynced)?;
        let cart_id = cart.id.ok_or(CartError::Unsynced)?;
        let lines = cart
            .products
            .iter()
            .map(|line| CartLineRef {
                id: line.id,
                quantity: line.quantity,
            })
            .collect();

        self.loading = true;
        let updated = self.remote.update_cart(cart_id, merge, lines).await;
        self.loading = false;
        self.commit(updated?).await
    }

    async fn drop_remote(&mut self) -> Result<(), CartError> {
        let cart_id = self
            .cart
            .as_ref()
            .and_then(|cart| cart.id)
            .ok_or(CartError::Unsynced)?;

        self.loading = true;
        let deleted = self.remote.delete_cart(cart_id).await;
        self.loading = false;
        deleted?;

        self.cart = None;
        self.storage.remove(CART_KEY).await?;
        Ok(())
    }

    fn settle(&mut self, result: Result<(), CartError>, action: &str) -> Result<(), CartError> {
        if let Err(err) = &result {
            warn!(error = %err, "Failed to {}", action);
            self.error = Some(format!("Failed to {action}: {err}"));
        }
        result
    }
}

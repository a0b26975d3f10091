pub mod api;
pub mod cart;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod entities;
pub mod middleware;
pub mod session;
pub mod storage;

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::api::AppState;
use crate::cart::CartStore;
use crate::catalog::{CatalogClient, GatewayError, ProductCatalog};
use crate::compare::Comparison;
use crate::config::AppConfig;
use crate::session::Session;
use crate::storage::KeyValueStore;

/// Wires the catalog, cart and session around one durable store.
///
/// A cart that cannot be restored or seeded is not fatal: the failure is
/// kept in the cart's error slot and the server starts anyway.
pub async fn build_state(
    config: &AppConfig,
    storage: Arc<dyn KeyValueStore>,
) -> Result<AppState, GatewayError> {
    let client = CatalogClient::new(&config.catalog_base_url, config.request_timeout)?;
    let catalog = Arc::new(ProductCatalog::new(client.clone(), config.default_page_limit));

    let mut cart = CartStore::new(storage.clone(), Arc::new(client), config.cart);
    match cart.initialize().await {
        Ok(()) => info!(
            lines = cart.cart().map_or(0, |cart| cart.products.len()),
            "Cart ready"
        ),
        Err(err) => warn!(error = %err, "Failed to initialize cart"),
    }

    Ok(AppState {
        catalog,
        cart: Arc::new(Mutex::new(cart)),
        session: Session::new(storage),
        compare: Arc::new(Mutex::new(Comparison::new())),
        default_limit: config.default_page_limit,
    })
}

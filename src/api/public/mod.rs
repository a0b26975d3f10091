pub mod auth;
pub mod category;
pub mod product;

use axum::Router;

use category::category_router;
use product::product_router;

pub use auth::auth_router;

/// Read-only catalog routes, mounted under `/api`.
pub fn public_api_router() -> Router {
    Router::new()
        .merge(category_router())
        .merge(product_router())
}

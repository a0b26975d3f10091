pub mod cart;
pub mod compare;

use axum::Router;

use cart::cart_router;
use compare::compare_router;

pub fn user_api_router() -> Router {
    Router::new().merge(cart_router()).merge(compare_router())
}

pub mod product;

use axum::{middleware::from_fn_with_state, Router};

use product::admin_product_router;

use crate::middleware::auth::auth_middleware;
use crate::session::Session;

pub fn admin_api_router(session: Session) -> Router {
    Router::new()
        .merge(admin_product_router())
        .layer(from_fn_with_state(session, auth_middleware))
}

pub mod admin;
pub mod public;
pub mod user;

use axum::{http::StatusCode, middleware::from_fn, Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::cart::{CartError, CartStore};
use crate::catalog::{GatewayError, ProductCatalog};
use crate::compare::Comparison;
use crate::middleware::logging::logging_middleware;
use crate::session::Session;

use admin::admin_api_router;
use public::{auth_router, public_api_router};
use user::user_api_router;

/// Everything the view bridge handlers share.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ProductCatalog>,
    pub cart: Arc<Mutex<CartStore>>,
    pub session: Session,
    pub compare: Arc<Mutex<Comparison>>,
    pub default_limit: u64,
}

pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_router())
        .nest("/api", public_api_router().merge(user_api_router()))
        .nest("/api/admin", admin_api_router(state.session.clone()))
        .layer(Extension(state))
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

//utils
pub(crate) fn error_body(message: impl Into<String>) -> Json<serde_json::Value> {
    Json(json!({
        "error": message.into()
    }))
}

/// Upstream client errors keep their status; everything else is a bad gateway.
pub(crate) fn gateway_status(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::Status { status, .. } if (400..500).contains(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

pub(crate) fn cart_status(err: &CartError) -> StatusCode {
    match err {
        CartError::Remote(err) => gateway_status(err),
        CartError::Unsynced => StatusCode::CONFLICT,
        CartError::Storage(_) | CartError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_status_mapping() {
        let not_found = GatewayError::Status {
            status: 404,
            message: "Product with id '999' not found".into(),
        };
        assert_eq!(gateway_status(&not_found), StatusCode::NOT_FOUND);

        let upstream = GatewayError::Status {
            status: 503,
            message: "down".into(),
        };
        assert_eq!(gateway_status(&upstream), StatusCode::BAD_GATEWAY);
        assert_eq!(
            gateway_status(&GatewayError::UnexpectedShape("x".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(cart_status(&CartError::Unsynced), StatusCode::CONFLICT);
    }
}

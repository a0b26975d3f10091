use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;

use crate::api::{error_body, gateway_status, AppState};
use crate::middleware::logging::{to_response, ApiError};

pub fn compare_router() -> Router {
    Router::new()
        .route("/compare", get(get_comparison).post(add_to_comparison))
        .route("/compare/:id", delete(remove_from_comparison))
}

async fn get_comparison(Extension(state): Extension<AppState>) -> Response {
    let comparison = state.compare.lock().await;
    to_response((StatusCode::OK, Json(comparison.products().to_vec())), Ok(()))
}

async fn add_to_comparison(
    Extension(state): Extension<AppState>,
    Json(payload): Json<CompareProduct>,
) -> Response {
    let product = match state.catalog.client().product(payload.product_id).await {
        Ok(product) => product,
        Err(err) => {
            return to_response(
                (gateway_status(&err), error_body(err.to_string())),
                Err(ApiError::Catalog(err.to_string())),
            )
        }
    };

    let mut comparison = state.compare.lock().await;
    let status = if comparison.add(product) {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    to_response((status, Json(comparison.products().to_vec())), Ok(()))
}

async fn remove_from_comparison(
    Path(id): Path<u64>,
    Extension(state): Extension<AppState>,
) -> Response {
    let mut comparison = state.compare.lock().await;
    if !comparison.remove(id) {
        return to_response(
            (
                StatusCode::NOT_FOUND,
                error_body(format!("Product {} is not being compared.", id)),
            ),
            Err(ApiError::ValidationFail(format!("product {id} not in comparison"))),
        );
    }
    to_response((StatusCode::OK, Json(comparison.products().to_vec())), Ok(()))
}

#[derive(Debug, Deserialize)]
pub struct CompareProduct {
    product_id: u64,
}

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::{cart_status, error_body, gateway_status, AppState};
use crate::cart::{CartError, CartLineItem};
use crate::middleware::logging::{to_response, ApiError};

//ROUTERS
pub fn cart_router() -> Router {
    Router::new()
        .route(
            "/cart",
            get(get_cart).post(add_product).delete(delete_cart),
        )
        .route("/cart/:id", patch(patch_entry).delete(remove_product))
        .route("/cart/sync", post(sync_cart))
        .route("/checkout", get(checkout_summary).post(confirm_checkout))
}

//ROUTES
async fn get_cart(Extension(state): Extension<AppState>) -> Response {
    let cart = state.cart.lock().await;
    to_response((StatusCode::OK, Json(cart.view())), Ok(()))
}

async fn add_product(
    Extension(state): Extension<AppState>,
    Json(payload): Json<AddProduct>,
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

    let mut cart = state.cart.lock().await;
    let result = cart
        .add_line_item(CartLineItem::from_product(&product))
        .await;
    cart_response(result, StatusCode::CREATED, &cart.view())
}

async fn patch_entry(
    Path(id): Path<u64>,
    Extension(state): Extension<AppState>,
    Json(payload): Json<PatchEntry>,
) -> Response {
    let mut cart = state.cart.lock().await;
    let result = cart.update_quantity(id, payload.quantity).await;
    cart_response(result, StatusCode::OK, &cart.view())
}

async fn remove_product(Path(id): Path<u64>, Extension(state): Extension<AppState>) -> Response {
    let mut cart = state.cart.lock().await;
    let result = cart.remove_line_item(id).await;
    cart_response(result, StatusCode::OK, &cart.view())
}

async fn sync_cart(
    Extension(state): Extension<AppState>,
    Json(payload): Json<SyncCart>,
) -> Response {
    let mut cart = state.cart.lock().await;
    let result = cart.sync_remote(payload.merge).await;
    cart_response(result, StatusCode::OK, &cart.view())
}

async fn delete_cart(Extension(state): Extension<AppState>) -> Response {
    let mut cart = state.cart.lock().await;
    let result = cart.delete_remote().await;
    cart_response(result, StatusCode::OK, &cart.view())
}

async fn checkout_summary(Extension(state): Extension<AppState>) -> Response {
    let cart = state.cart.lock().await;
    to_response((StatusCode::OK, Json(cart.checkout_summary())), Ok(()))
}

async fn confirm_checkout(Extension(state): Extension<AppState>) -> Response {
    let cart = state.cart.lock().await;
    if cart.cart().map_or(true, |cart| cart.is_empty()) {
        return to_response(
            (StatusCode::BAD_REQUEST, error_body("Cart is empty")),
            Err(ApiError::Cart("checkout attempted on an empty cart".into())),
        );
    }
    to_response((StatusCode::OK, Json(cart.confirm_checkout())), Ok(()))
}

//utils
fn cart_response<T: serde::Serialize>(
    result: Result<(), CartError>,
    success: StatusCode,
    view: &T,
) -> Response {
    match result {
        Ok(()) => to_response((success, Json(view)), Ok(())),
        Err(err) => to_response(
            (
                cart_status(&err),
                Json(json!({
                    "error": err.to_string(),
                    "cart": view
                })),
            ),
            Err(ApiError::Cart(err.to_string())),
        ),
    }
}

//structs
#[derive(Debug, Deserialize)]
pub struct AddProduct {
    product_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct PatchEntry {
    quantity: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SyncCart {
    #[serde(default)]
    merge: bool,
}

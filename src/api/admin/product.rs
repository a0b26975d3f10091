use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::api::{error_body, gateway_status, AppState};
use crate::catalog::{GatewayError, PageRequest, ProductDraft, ProductRecord};
use crate::middleware::logging::{to_response, ApiError};

//ROUTERS
pub fn admin_product_router() -> Router {
    Router::new()
        .route("/product", get(admin_get_products).post(create_product))
        .route("/product/:id", patch(patch_product).delete(delete_product))
}

//ROUTES
async fn admin_get_products(
    Query(params): Query<AdminPageQuery>,
    Extension(state): Extension<AppState>,
) -> Response {
    if let Err(err) = params.validate() {
        return to_response(
            (StatusCode::BAD_REQUEST, error_body(err.to_string())),
            Err(ApiError::ValidationFail(err.to_string())),
        );
    }
    let limit = params.limit.unwrap_or(state.default_limit);
    let page = PageRequest::for_page(params.page.unwrap_or(1), limit);
    match state.catalog.fetch_all(page).await {
        Ok(received) => to_response((StatusCode::OK, Json(received)), Ok(())),
        Err(err) => catalog_failure(err),
    }
}

async fn create_product(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ProductDraft>,
) -> Response {
    if let Err(err) = payload.validate() {
        return to_response(
            (StatusCode::BAD_REQUEST, error_body(err.to_string())),
            Err(ApiError::ValidationFail(err.to_string())),
        );
    }
    match state.catalog.create(&payload).await {
        Ok(product) => changed(StatusCode::CREATED, "Product created successfully", product),
        Err(err) => catalog_failure(err),
    }
}

async fn patch_product(
    Path(id): Path<u64>,
    Extension(state): Extension<AppState>,
    Json(payload): Json<ProductDraft>,
) -> Response {
    match state.catalog.update(id, &payload).await {
        Ok(product) => changed(StatusCode::OK, "Resource patched successfully", product),
        Err(err) => catalog_failure(err),
    }
}

async fn delete_product(Path(id): Path<u64>, Extension(state): Extension<AppState>) -> Response {
    match state.catalog.delete(id).await {
        Ok(product) => changed(StatusCode::OK, "Resource deleted successfully", product),
        Err(err) => catalog_failure(err),
    }
}

//utils
fn changed(status: StatusCode, message: &str, product: ProductRecord) -> Response {
    to_response(
        (
            status,
            Json(json!({
                "message": message,
                "product": product
            })),
        ),
        Ok(()),
    )
}

fn catalog_failure(err: GatewayError) -> Response {
    let ext = match &err {
        GatewayError::Validation(_) => ApiError::ValidationFail(err.to_string()),
        _ => ApiError::Catalog(err.to_string()),
    };
    to_response((gateway_status(&err), error_body(err.to_string())), Err(ext))
}

//structs
#[derive(Debug, Deserialize, Validate)]
pub struct AdminPageQuery {
    #[validate(range(min = 1, max = 10000))]
    page: Option<u64>,
    #[validate(range(min = 1, max = 100))]
    limit: Option<u64>,
}

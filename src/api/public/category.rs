use axum::{extract::Extension, http::StatusCode, response::Response, routing::get, Json, Router};
use serde::Serialize;

use crate::api::AppState;
use crate::catalog::Category;
use crate::middleware::logging::{to_response, ApiError};

pub fn category_router() -> Router {
    Router::new().route("/category", get(get_categories))
}

/// Always answers 200; a failed lookup shows up as an empty list plus `error`.
async fn get_categories(Extension(state): Extension<AppState>) -> Response {
    let categories = state.catalog.fetch_categories().await;
    let error = state.catalog.view().await.error;

    let ext = match &error {
        Some(err) if categories.is_empty() => Err(ApiError::Catalog(err.clone())),
        _ => Ok(()),
    };
    to_response(
        (StatusCode::OK, Json(CategoryResponse { categories, error })),
        ext,
    )
}

#[derive(Serialize)]
struct CategoryResponse {
    categories: Vec<Category>,
    error: Option<String>,
}

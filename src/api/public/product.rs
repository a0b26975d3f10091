use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::{error_body, gateway_status, AppState};
use crate::catalog::browse::available_tags;
use crate::catalog::{BrowseQuery, ProductRecord, SortOrder, SortSpec};
use crate::middleware::logging::{to_response, ApiError};

static SORT_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").unwrap());

//ROUTERS
pub fn product_router() -> Router {
    Router::new()
        .route("/product", get(get_products))
        .route("/product/:id", get(get_product))
}

//ROUTES
async fn get_products(
    Query(params): Query<BrowseParams>,
    Extension(state): Extension<AppState>,
) -> Response {
    if let Err(err) = params.validate() {
        return to_response(
            (StatusCode::BAD_REQUEST, error_body(err.to_string())),
            Err(ApiError::ValidationFail(err.to_string())),
        );
    }
    let query = params.into_query(state.default_limit);
    let received = match state.catalog.browse(&query).await {
        Ok(received) => received,
        Err(err) => {
            return to_response(
                (gateway_status(&err), error_body(err.to_string())),
                Err(ApiError::Catalog(err.to_string())),
            )
        }
    };

    // Built from this request's own page, not the shared list.
    let response = BrowseResponse {
        tags: available_tags(&received.products),
        products: query.visible(&received.products),
        total: received.total,
        skip: received.skip,
        limit: received.limit,
        page: query.page(),
        total_pages: query.total_pages(received.total),
        loading: state.catalog.view().await.loading,
    };
    to_response((StatusCode::OK, Json(response)), Ok(()))
}

async fn get_product(Path(id): Path<u64>, Extension(state): Extension<AppState>) -> Response {
    match state.catalog.fetch_by_id(id).await {
        Ok(product) => to_response((StatusCode::OK, Json(product)), Ok(())),
        Err(err) => to_response(
            (gateway_status(&err), error_body(err.to_string())),
            Err(ApiError::Catalog(err.to_string())),
        ),
    }
}

//structs
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BrowseParams {
    q: Option<String>,
    category: Option<String>,
    tag: Option<String>,
    #[validate(regex(path = *SORT_FIELD, message = "sortBy must be a product field name"))]
    sort_by: Option<String>,
    order: Option<SortOrder>,
    #[validate(range(min = 1, max = 10000))]
    page: Option<u64>,
    #[validate(range(min = 1, max = 100))]
    limit: Option<u64>,
}

impl BrowseParams {
    fn into_query(self, default_limit: u64) -> BrowseQuery {
        let mut query = BrowseQuery::new(self.limit.unwrap_or(default_limit));
        query.set_search(self.q.as_deref().unwrap_or_default());
        query.select_category(self.category);
        // Ignored without a category.
        query.select_tag(self.tag);
        query.set_sort(self.sort_by.map(|sort_by| SortSpec {
            sort_by,
            order: self.order.unwrap_or_default(),
        }));
        query.set_page(self.page.unwrap_or(1));
        query
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrowseResponse {
    products: Vec<ProductRecord>,
    total: u64,
    skip: u64,
    limit: u64,
    page: u64,
    total_pages: u64,
    tags: Vec<String>,
    loading: bool,
}

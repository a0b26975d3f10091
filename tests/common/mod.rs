#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use baranki_storefront::api::{create_api_router, AppState};
use baranki_storefront::build_state;
use baranki_storefront::config::AppConfig;
use baranki_storefront::storage::{KeyValueStore, MemoryStore};

pub const ADMIN_USERNAME: &str = "emilys";
pub const ADMIN_PASSWORD: &str = "emilyspass";

/// Shape `/products/categories` answers with.
#[derive(Clone, Copy, Debug)]
pub enum CategoryShape {
    Objects,
    Slugs,
    Wrapped,
    Unexpected,
}

#[derive(Clone)]
pub struct MockCatalog {
    products: Arc<Vec<Value>>,
    category_shape: CategoryShape,
    /// List requests with this `skip` are answered late.
    slow_skip: Option<u64>,
    /// `/products` answers 500 while the other endpoints keep working.
    failing_list: bool,
    pub cart_requests: Arc<AtomicUsize>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            products: Arc::new(fixture_products()),
            category_shape: CategoryShape::Objects,
            slow_skip: None,
            failing_list: false,
            cart_requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_category_shape(mut self, shape: CategoryShape) -> Self {
        self.category_shape = shape;
        self
    }

    pub fn with_slow_skip(mut self, skip: u64) -> Self {
        self.slow_skip = Some(skip);
        self
    }

    pub fn with_failing_list(mut self) -> Self {
        self.failing_list = true;
        self
    }

    /// Serves the mock on an ephemeral loopback port and returns its base url.
    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route("/products", get(list_products))
            .route("/products/search", get(search_products))
            .route("/products/categories", get(categories))
            .route("/products/category/:slug", get(products_by_category))
            .route("/products/add", post(add_product))
            .route(
                "/products/:id",
                get(get_product).put(update_product).delete(delete_product),
            )
            .route(
                "/carts/:id",
                get(get_cart).put(update_cart).delete(delete_cart),
            )
            .route("/auth/login", post(login))
            .with_state(self);
        serve(app).await
    }
}

pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock listener");
    let address = listener.local_addr().expect("Mock listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server failed");
    });
    format!("http://{}", address)
}

pub fn test_config(catalog_base_url: &str) -> AppConfig {
    let mut config = AppConfig::from_lookup(|_| None).expect("Default config must be valid");
    config.catalog_base_url = catalog_base_url.to_owned();
    config.default_page_limit = 10;
    config.request_timeout = Duration::from_secs(5);
    config
}

/// Full storefront router over an in-memory store, talking to `catalog_url`.
pub async fn spawn_storefront(catalog_url: &str) -> (String, AppState, Arc<MemoryStore>) {
    let storage = Arc::new(MemoryStore::new());
    let state = build_state(
        &test_config(catalog_url),
        storage.clone() as Arc<dyn KeyValueStore>,
    )
    .await
    .expect("Failed to build storefront state");
    let url = serve(create_api_router(state.clone())).await;
    (url, state, storage)
}

pub fn product_json(id: u64, category: &str, price: f64, discount: f64, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "title": format!("Product {id}"),
        "description": format!("Description of product {id}"),
        "category": category,
        "price": price,
        "discountPercentage": discount,
        "rating": 4.5,
        "stock": 20,
        "tags": tags,
        "brand": "Baranki",
        "thumbnail": format!("https://cdn.example.com/{id}.png"),
        "images": [],
    })
}

fn fixture_products() -> Vec<Value> {
    (1..=25)
        .map(|id| {
            let (category, tags): (&str, &[&str]) = match id % 3 {
                0 => ("beauty", &["beauty", "mascara"]),
                1 => ("groceries", &["fruits", "food"]),
                _ => ("groceries", &["vegetables", "food"]),
            };
            product_json(id, category, 10.0 * id as f64, 10.0, tags)
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    q: Option<String>,
    limit: Option<u64>,
    skip: Option<u64>,
    sort_by: Option<String>,
    order: Option<String>,
}

fn page(mut products: Vec<Value>, params: &ListParams) -> Json<Value> {
    if let Some(field) = &params.sort_by {
        products.sort_by(|a, b| {
            let a = a[field].as_f64().unwrap_or_default();
            let b = b[field].as_f64().unwrap_or_default();
            a.total_cmp(&b)
        });
        if params.order.as_deref() == Some("desc") {
            products.reverse();
        }
    }
    let total = products.len() as u64;
    let limit = params.limit.unwrap_or(30);
    let skip = params.skip.unwrap_or(0);
    let products: Vec<Value> = products
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect();
    Json(json!({
        "products": products,
        "total": total,
        "skip": skip,
        "limit": limit,
    }))
}

async fn list_products(
    State(mock): State<MockCatalog>,
    Query(params): Query<ListParams>,
) -> Response {
    if mock.failing_list {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Product index unavailable" })),
        )
            .into_response();
    }
    if mock.slow_skip.is_some() && mock.slow_skip == params.skip {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    page(mock.products.to_vec(), &params).into_response()
}

async fn search_products(
    State(mock): State<MockCatalog>,
    Query(params): Query<ListParams>,
) -> Json<Value> {
    let q = params.q.clone().unwrap_or_default().to_lowercase();
    let found = mock
        .products
        .iter()
        .filter(|product| {
            product["title"]
                .as_str()
                .is_some_and(|title| title.to_lowercase().contains(&q))
        })
        .cloned()
        .collect();
    page(found, &params)
}

async fn products_by_category(
    State(mock): State<MockCatalog>,
    Path(slug): Path<String>,
    Query(params): Query<ListParams>,
) -> Json<Value> {
    let found = mock
        .products
        .iter()
        .filter(|product| product["category"] == slug.as_str())
        .cloned()
        .collect();
    page(found, &params)
}

async fn categories(State(mock): State<MockCatalog>) -> Json<Value> {
    Json(match mock.category_shape {
        CategoryShape::Objects => json!([
            {
                "slug": "beauty",
                "name": "Beauty",
                "url": "https://dummyjson.com/products/category/beauty"
            },
            {
                "slug": "groceries",
                "name": "Groceries",
                "url": "https://dummyjson.com/products/category/groceries"
            },
        ]),
        CategoryShape::Slugs => json!(["beauty", "groceries"]),
        CategoryShape::Wrapped => json!({
            "categories": ["beauty", { "slug": "groceries", "name": "Groceries" }]
        }),
        CategoryShape::Unexpected => json!({ "items": 2 }),
    })
}

fn not_found(id: u64) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("Product with id '{}' not found", id) })),
    )
        .into_response()
}

async fn get_product(State(mock): State<MockCatalog>, Path(id): Path<u64>) -> Response {
    match mock.products.iter().find(|product| product["id"] == id) {
        Some(product) => Json(product.clone()).into_response(),
        None => not_found(id),
    }
}

async fn add_product(Json(draft): Json<Value>) -> Response {
    let mut created = draft;
    created["id"] = json!(195);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_product(
    State(mock): State<MockCatalog>,
    Path(id): Path<u64>,
    Json(draft): Json<HashMap<String, Value>>,
) -> Response {
    let Some(product) = mock.products.iter().find(|product| product["id"] == id) else {
        return not_found(id);
    };
    let mut updated = product.clone();
    for (key, value) in draft {
        updated[key] = value;
    }
    Json(updated).into_response()
}

async fn delete_product(State(mock): State<MockCatalog>, Path(id): Path<u64>) -> Response {
    match mock.products.iter().find(|product| product["id"] == id) {
        Some(product) => {
            let mut deleted = product.clone();
            deleted["isDeleted"] = json!(true);
            Json(deleted).into_response()
        }
        None => not_found(id),
    }
}

pub fn remote_cart(id: u64) -> Value {
    json!({
        "id": id,
        "products": [
            {
                "id": 3,
                "title": "Product 3",
                "price": 30.0,
                "quantity": 2,
                "total": 60.0,
                "discountPercentage": 10.0,
                "discountedTotal": 54.0,
                "thumbnail": "https://cdn.example.com/3.png"
            }
        ],
        "total": 60.0,
        "discountedTotal": 54.0,
        "userId": 33,
        "totalProducts": 1,
        "totalQuantity": 2
    })
}

async fn get_cart(State(mock): State<MockCatalog>, Path(id): Path<u64>) -> Response {
    mock.cart_requests.fetch_add(1, Ordering::SeqCst);
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("Cart with id '{}' not found", id) })),
        )
            .into_response();
    }
    Json(remote_cart(id)).into_response()
}

#[derive(Debug, Deserialize)]
struct CartUpdate {
    merge: bool,
    products: Vec<CartLine>,
}

#[derive(Debug, Deserialize)]
struct CartLine {
    id: u64,
    quantity: u32,
}

async fn update_cart(
    State(mock): State<MockCatalog>,
    Path(id): Path<u64>,
    Json(update): Json<CartUpdate>,
) -> Json<Value> {
    let mut lines: Vec<Value> = if update.merge {
        remote_cart(id)["products"]
            .as_array()
            .cloned()
            .unwrap_or_default()
    } else {
        Vec::new()
    };
    for line in update.products {
        let price = mock
            .products
            .iter()
            .find(|product| product["id"] == line.id)
            .and_then(|product| product["price"].as_f64())
            .unwrap_or_default();
        let total = price * line.quantity as f64;
        lines.push(json!({
            "id": line.id,
            "title": format!("Product {}", line.id),
            "price": price,
            "quantity": line.quantity,
            "total": total,
            "discountPercentage": 10.0,
            "discountedTotal": total * 0.9,
        }));
    }
    let total: f64 = lines.iter().filter_map(|line| line["total"].as_f64()).sum();
    let quantity: u64 = lines.iter().filter_map(|line| line["quantity"].as_u64()).sum();
    Json(json!({
        "id": id,
        "products": lines,
        "total": total,
        "discountedTotal": total * 0.9,
        "userId": 33,
        "totalProducts": lines.len(),
        "totalQuantity": quantity
    }))
}

async fn delete_cart(Path(id): Path<u64>) -> Json<Value> {
    let mut deleted = remote_cart(id);
    deleted["isDeleted"] = json!(true);
    Json(deleted)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody {
    username: String,
    password: String,
    expires_in_mins: Option<u32>,
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    if body.username != ADMIN_USERNAME || body.password != ADMIN_PASSWORD {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response();
    }
    Json(json!({
        "id": 1,
        "username": body.username,
        "email": "emily.johnson@x.dummyjson.com",
        "firstName": "Emily",
        "lastName": "Johnson",
        "gender": "female",
        "image": "https://dummyjson.com/icon/emilys/128",
        "accessToken": format!("token-{}", body.expires_in_mins.unwrap_or(60)),
        "refreshToken": "refresh"
    }))
    .into_response()
}

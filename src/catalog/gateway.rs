use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::browse::BrowseQuery;
use super::client::CatalogClient;
use super::types::{Category, PageRequest, ProductDraft, ProductPage, ProductRecord, SortSpec};
use super::GatewayError;

/// What the product views render: the held list, the single-product slot,
/// pagination metadata, and the shared loading/error slots.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CatalogView {
    pub products: Vec<ProductRecord>,
    pub product: Option<ProductRecord>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct CatalogState {
    products: Vec<ProductRecord>,
    product: Option<ProductRecord>,
    total: u64,
    skip: u64,
    limit: u64,
    in_flight: usize,
    error: Option<String>,
    last_page: PageRequest,
}

/// Catalog state shared by the storefront and admin views.
///
/// Each fetch takes a ticket for the slot it writes (list or single product).
/// A response is applied only while its ticket is still the newest for that
/// slot, so an older request that resolves late never overwrites newer data.
#[derive(Debug)]
pub struct ProductCatalog {
    client: CatalogClient,
    state: Mutex<CatalogState>,
    list_ticket: AtomicU64,
    item_ticket: AtomicU64,
}

impl ProductCatalog {
    pub fn new(client: CatalogClient, default_limit: u64) -> Self {
        let state = CatalogState {
            last_page: PageRequest::new(default_limit, 0),
            ..Default::default()
        };
        Self {
            client,
            state: Mutex::new(state),
            list_ticket: AtomicU64::new(0),
            item_ticket: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub async fn view(&self) -> CatalogView {
        let state = self.state.lock().await;
        CatalogView {
            products: state.products.clone(),
            product: state.product.clone(),
            total: state.total,
            skip: state.skip,
            limit: state.limit,
            loading: state.in_flight > 0,
            error: state.error.clone(),
        }
    }

    /// Page the list was last refreshed with.
    pub async fn current_page(&self) -> PageRequest {
        self.state.lock().await.last_page
    }

    pub async fn fetch_all(&self, page: PageRequest) -> Result<ProductPage, GatewayError> {
        self.run_list(page, self.client.list_products(page, None)).await
    }

    pub async fn search(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<ProductPage, GatewayError> {
        self.run_list(page, self.client.search(query, page, None)).await
    }

    pub async fn fetch_by_category(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<ProductPage, GatewayError> {
        self.run_list(page, self.client.products_by_category(category, page)).await
    }

    pub async fn sort(
        &self,
        sort: &SortSpec,
        page: PageRequest,
    ) -> Result<ProductPage, GatewayError> {
        self.run_list(page, self.client.list_products(page, Some(sort))).await
    }

    /// Returns the product this call received, even when a newer fetch has
    /// since taken the single-product slot.
    pub async fn fetch_by_id(&self, id: u64) -> Result<ProductRecord, GatewayError> {
        let ticket = self.item_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.begin().await;
        let result = self.client.product(id).await;

        let mut state = self.state.lock().await;
        state.in_flight = state.in_flight.saturating_sub(1);
        if self.item_ticket.load(Ordering::SeqCst) != ticket {
            debug!(ticket, product_id = id, "Dropping stale product response");
            return result;
        }
        match result {
            Ok(product) => {
                state.product = Some(product.clone());
                Ok(product)
            }
            Err(err) => {
                warn!(error = %err, product_id = id, "Failed to fetch product");
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Never fails: an unreachable endpoint or an unexpected envelope yields an
    /// empty list and a recorded error.
    pub async fn fetch_categories(&self) -> Vec<Category> {
        self.begin().await;
        let result = self.client.categories().await;
        self.settle(result).await.unwrap_or_default()
    }

    /// Submits `draft`, then refreshes the list with the current page.
    ///
    /// A failed refresh is recorded in the error slot but does not fail the
    /// create, which has already happened remotely.
    pub async fn create(&self, draft: &ProductDraft) -> Result<ProductRecord, GatewayError> {
        self.begin().await;
        let result = self.client.create_product(draft).await;
        let created = self.settle(result).await?;
        self.refresh_list().await;
        Ok(created)
    }

    /// Submits `draft` as a patch of `id`, then refetches that product.
    pub async fn update(
        &self,
        id: u64,
        draft: &ProductDraft,
    ) -> Result<ProductRecord, GatewayError> {
        self.begin().await;
        let result = self.client.update_product(id, draft).await;
        let updated = self.settle(result).await?;
        if let Err(err) = self.fetch_by_id(id).await {
            warn!(error = %err, product_id = id, "Product updated but refetch failed");
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> Result<ProductRecord, GatewayError> {
        self.begin().await;
        let result = self.client.delete_product(id).await;
        let deleted = self.settle(result).await?;
        self.refresh_list().await;
        Ok(deleted)
    }

    /// Runs the one fetch that `query` calls for and returns its page.
    pub async fn browse(&self, query: &BrowseQuery) -> Result<ProductPage, GatewayError> {
        let page = query.page_request();
        if let Some(category) = query.category() {
            return self.fetch_by_category(category, page).await;
        }
        if !query.search().is_empty() {
            let fetch = self.client.search(query.search(), page, query.sort());
            return self.run_list(page, fetch).await;
        }
        match query.sort() {
            Some(sort) => self.sort(sort, page).await,
            None => self.fetch_all(page).await,
        }
    }

    async fn refresh_list(&self) {
        let page = self.current_page().await;
        if let Err(err) = self.fetch_all(page).await {
            warn!(error = %err, skip = page.skip, "Failed to refresh products");
        }
    }

    /// A stale response still goes back to its caller; only the shared slots
    /// are left alone.
    async fn run_list<F>(
        &self,
        page: PageRequest,
        fetch: F,
    ) -> Result<ProductPage, GatewayError>
    where
        F: Future<Output = Result<ProductPage, GatewayError>>,
    {
        let ticket = self.list_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.begin().await;
        let result = fetch.await;

        let mut state = self.state.lock().await;
        state.in_flight = state.in_flight.saturating_sub(1);
        if self.list_ticket.load(Ordering::SeqCst) != ticket {
            debug!(ticket, skip = page.skip, "Dropping stale product list response");
            return result;
        }
        match result {
            Ok(received) => {
                state.products = received.products.clone();
                state.total = received.total;
                state.skip = received.skip;
                state.limit = received.limit;
                state.last_page = page;
                Ok(received)
            }
            Err(err) => {
                warn!(error = %err, "Failed to fetch products");
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    async fn begin(&self) {
        let mut state = self.state.lock().await;
        state.in_flight += 1;
        state.error = None;
    }

    async fn settle<T>(&self, result: Result<T, GatewayError>) -> Result<T, GatewayError> {
        let mut state = self.state.lock().await;
        state.in_flight = state.in_flight.saturating_sub(1);
        if let Err(err) = &result {
            warn!(error = %err, "Catalog request failed");
            state.error = Some(err.to_string());
        }
        result
    }
}

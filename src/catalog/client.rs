use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use validator::Validate;

use super::types::{
    Category, PageRequest, ProductDraft, ProductPage, ProductRecord, SortOrder, SortSpec,
};
use super::GatewayError;
use crate::cart::{CartAggregate, CartLineRef, RemoteCarts};

/// Stateless HTTP client for the product, cart and auth endpoints.
#[derive(Clone, Debug)]
pub struct CatalogClient {
    base_url: Url,
    http: Client,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let base_url =
            Url::parse(base_url).map_err(|err| GatewayError::InvalidUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(base_url.to_string()));
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list_products(
        &self,
        page: PageRequest,
        sort: Option<&SortSpec>,
    ) -> Result<ProductPage, GatewayError> {
        let url = self.endpoint(&["products"])?;
        let query = ListQuery::new(None, page, sort);
        self.send(self.http.get(url).query(&query)).await
    }

    pub async fn search(
        &self,
        q: &str,
        page: PageRequest,
        sort: Option<&SortSpec>,
    ) -> Result<ProductPage, GatewayError> {
        let url = self.endpoint(&["products", "search"])?;
        let query = ListQuery::new(Some(q), page, sort);
        self.send(self.http.get(url).query(&query)).await
    }

    pub async fn products_by_category(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<ProductPage, GatewayError> {
        let url = self.endpoint(&["products", "category", category])?;
        let query = ListQuery::new(None, page, None);
        self.send(self.http.get(url).query(&query)).await
    }

    pub async fn product(&self, id: u64) -> Result<ProductRecord, GatewayError> {
        let url = self.endpoint(&["products", &id.to_string()])?;
        self.send(self.http.get(url)).await
    }

    /// Accepts a bare array or a `{"categories": [...]}` envelope, with entries
    /// given as slugs or as `{slug, name, url}` objects.
    pub async fn categories(&self) -> Result<Vec<Category>, GatewayError> {
        let url = self.endpoint(&["products", "categories"])?;
        let body: serde_json::Value = self.send(self.http.get(url)).await?;
        let envelope: CategoriesEnvelope = serde_json::from_value(body)
            .map_err(|err| GatewayError::UnexpectedShape(format!("categories: {err}")))?;
        let entries = match envelope {
            CategoriesEnvelope::Wrapped { categories } => categories,
            CategoriesEnvelope::Bare(categories) => categories,
        };
        Ok(entries.into_iter().map(Category::from).collect())
    }

    pub async fn create_product(
        &self,
        draft: &ProductDraft,
    ) -> Result<ProductRecord, GatewayError> {
        draft.validate()?;
        let url = self.endpoint(&["products", "add"])?;
        self.send(self.http.post(url).json(draft)).await
    }

    pub async fn update_product(
        &self,
        id: u64,
        draft: &ProductDraft,
    ) -> Result<ProductRecord, GatewayError> {
        draft.validate()?;
        let url = self.endpoint(&["products", &id.to_string()])?;
        self.send(self.http.put(url).json(draft)).await
    }

    pub async fn delete_product(&self, id: u64) -> Result<ProductRecord, GatewayError> {
        let url = self.endpoint(&["products", &id.to_string()])?;
        self.send(self.http.delete(url)).await
    }

    pub async fn cart(&self, id: u64) -> Result<CartAggregate, GatewayError> {
        let url = self.endpoint(&["carts", &id.to_string()])?;
        self.send(self.http.get(url)).await
    }

    pub async fn update_cart(
        &self,
        id: u64,
        merge: bool,
        lines: &[CartLineRef],
    ) -> Result<CartAggregate, GatewayError> {
        let url = self.endpoint(&["carts", &id.to_string()])?;
        let body = json!({ "merge": merge, "products": lines });
        self.send(self.http.put(url).json(&body)).await
    }

    pub async fn delete_cart(&self, id: u64) -> Result<CartAggregate, GatewayError> {
        let url = self.endpoint(&["carts", &id.to_string()])?;
        self.send(self.http.delete(url)).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AdminProfile, GatewayError> {
        let url = self.endpoint(&["auth", "login"])?;
        self.send(self.http.post(url).json(credentials)).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = %status, "Catalog responded");

        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_slice(&body).map_err(|err| GatewayError::UnexpectedShape(err.to_string()))
    }
}

#[async_trait]
impl RemoteCarts for CatalogClient {
    async fn fetch_cart(&self, cart_id: u64) -> Result<CartAggregate, GatewayError> {
        self.cart(cart_id).await
    }

    async fn update_cart(
        &self,
        cart_id: u64,
        merge: bool,
        lines: Vec<CartLineRef>,
    ) -> Result<CartAggregate, GatewayError> {
        CatalogClient::update_cart(self, cart_id, merge, &lines).await
    }

    async fn delete_cart(&self, cart_id: u64) -> Result<(), GatewayError> {
        CatalogClient::delete_cart(self, cart_id).await.map(|_| ())
    }
}

//structs
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub expires_in_mins: u32,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            expires_in_mins: 30,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub image: String,
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    q: Option<&'a str>,
    limit: u64,
    skip: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_by: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<SortOrder>,
}

impl<'a> ListQuery<'a> {
    fn new(q: Option<&'a str>, page: PageRequest, sort: Option<&'a SortSpec>) -> Self {
        Self {
            q,
            limit: page.limit,
            skip: page.skip,
            sort_by: sort.map(|sort| sort.sort_by.as_str()),
            order: sort.map(|sort| sort.order),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoriesEnvelope {
    Wrapped { categories: Vec<CategoryEntry> },
    Bare(Vec<CategoryEntry>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryEntry {
    Slug(String),
    Detailed {
        slug: String,
        name: Option<String>,
        url: Option<String>,
    },
}

impl From<CategoryEntry> for Category {
    fn from(entry: CategoryEntry) -> Self {
        match entry {
            CategoryEntry::Slug(slug) => Category {
                name: slug.clone(),
                slug,
                url: None,
            },
            CategoryEntry::Detailed { slug, name, url } => Category {
                name: name.unwrap_or_else(|| slug.clone()),
                slug,
                url,
            },
        }
    }
}

//utils
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value["message"].as_str().map(str::to_owned))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_owned())
}

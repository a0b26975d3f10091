use serde::{Deserialize, Serialize};

use super::types::{total_pages, PageRequest, ProductRecord, SortSpec};

/// Home page filter state: search text, category, tag, sort and page.
///
/// A tag narrows the products of the selected category on the client, so it
/// can only be set while a category is selected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrowseQuery {
    search: String,
    category: Option<String>,
    tag: Option<String>,
    sort: Option<SortSpec>,
    page: u64,
    limit: u64,
}

impl BrowseQuery {
    pub fn new(limit: u64) -> Self {
        Self {
            search: String::new(),
            category: None,
            tag: None,
            sort: None,
            page: 1,
            limit,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_owned();
        self.page = 1;
    }

    pub fn select_category(&mut self, category: Option<String>) {
        let category = category.filter(|category| !category.is_empty());
        if self.category.is_none() || category.is_none() {
            self.tag = None;
        }
        self.category = category;
        self.page = 1;
    }

    /// Returns `false` and keeps the current tag when no category is selected.
    pub fn select_tag(&mut self, tag: Option<String>) -> bool {
        let tag = tag.filter(|tag| !tag.is_empty());
        if tag.is_some() && self.category.is_none() {
            return false;
        }
        self.tag = tag;
        true
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u64) {
        self.page = page.max(1);
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::for_page(self.page, self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total_pages(total, self.limit)
    }

    /// Products of `products` carrying the selected tag, or all of them.
    pub fn visible(&self, products: &[ProductRecord]) -> Vec<ProductRecord> {
        match &self.tag {
            Some(tag) => products
                .iter()
                .filter(|product| product.tags.iter().any(|t| t == tag))
                .cloned()
                .collect(),
            None => products.to_vec(),
        }
    }
}

/// Distinct tags of `products`, in first-seen order.
pub fn available_tags(products: &[ProductRecord]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in products.iter().flat_map(|product| product.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

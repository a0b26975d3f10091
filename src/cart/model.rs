use serde::{Deserialize, Serialize};

use crate::catalog::types::{round_cents, ProductRecord};

/// How a line whose product id is already in the cart is added.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinePolicy {
    /// Every add becomes its own line, even for a repeated product id.
    #[default]
    Append,
    /// A repeated product id increases the quantity of the existing line.
    Merge,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub price: f64,
    pub quantity: u32,
    pub total: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    pub discounted_total: f64,
    #[serde(default)]
    pub thumbnail: String,
}

impl CartLineItem {
    /// Snapshot of `product` as a single-unit line. Later catalog changes do not
    /// touch lines built here.
    pub fn from_product(product: &ProductRecord) -> Self {
        let mut line = Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            quantity: 1,
            total: 0.0,
            discount_percentage: product.discount_percentage,
            discounted_total: 0.0,
            thumbnail: product.thumbnail.clone(),
        };
        line.reprice(1);
        line
    }

    /// Sets `quantity` and derives both totals from price and discount.
    pub fn reprice(&mut self, quantity: u32) {
        let gross = self.price * f64::from(quantity);
        self.quantity = quantity;
        self.total = round_cents(gross);
        self.discounted_total = round_cents(gross * (1.0 - self.discount_percentage / 100.0));
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAggregate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub products: Vec<CartLineItem>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub discounted_total: f64,
    #[serde(default)]
    pub total_products: usize,
    #[serde(default)]
    pub total_quantity: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

impl CartAggregate {
    pub fn from_lines(products: Vec<CartLineItem>) -> Self {
        let mut cart = Self {
            products,
            ..Default::default()
        };
        cart.recompute();
        cart
    }

    pub fn is_empty(&self) -> bool {
        self.total_products == 0
    }

    pub fn contains(&self, id: u64) -> bool {
        self.products.iter().any(|line| line.id == id)
    }

    /// Derives every aggregate field from `products`.
    pub fn recompute(&mut self) {
        self.total = round_cents(self.products.iter().map(|line| line.total).sum());
        self.discounted_total =
            round_cents(self.products.iter().map(|line| line.discounted_total).sum());
        self.total_products = self.products.len();
        self.total_quantity = self
            .products
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum();
    }

    pub fn with_line(&self, line: CartLineItem, policy: LinePolicy) -> Self {
        let mut next = self.clone();
        let existing = match policy {
            LinePolicy::Append => None,
            LinePolicy::Merge => next.products.iter_mut().find(|current| current.id == line.id),
        };
        match existing {
            Some(current) => {
                let quantity = current.quantity.saturating_add(line.quantity);
                current.reprice(quantity);
            }
            None => next.products.push(line),
        }
        next.recompute();
        next
    }

    /// `None` when no line has `id`.
    pub fn without_line(&self, id: u64) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let mut next = self.clone();
        next.products.retain(|line| line.id != id);
        next.recompute();
        Some(next)
    }

    /// Reprices every line with `id`; `None` when no line has it.
    pub fn with_quantity(&self, id: u64, quantity: u32) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let mut next = self.clone();
        next.products
            .iter_mut()
            .filter(|line| line.id == id)
            .for_each(|line| line.reprice(quantity));
        next.recompute();
        Some(next)
    }
}

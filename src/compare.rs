use serde::Serialize;

use crate::catalog::ProductRecord;

/// Products picked for side-by-side comparison, in the order they were added.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Comparison {
    products: Vec<ProductRecord>,
}

impl Comparison {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    /// Returns `false` when a product with the same id is already listed.
    pub fn add(&mut self, product: ProductRecord) -> bool {
        if self.products.iter().any(|p| p.id == product.id) {
            return false;
        }
        self.products.push(product);
        true
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        self.products.len() != before
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, price: f64) -> ProductRecord {
        serde_json::from_value(serde_json::json!({ "id": id, "price": price })).unwrap()
    }

    #[test]
    fn test_add_ignores_duplicates() {
        let mut comparison = Comparison::new();
        assert!(comparison.add(product(1, 9.99)));
        assert!(comparison.add(product(2, 19.99)));
        assert!(!comparison.add(product(1, 4.99)));

        let ids: Vec<u64> = comparison.products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(comparison.products()[0].price, 9.99);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut comparison = Comparison::new();
        comparison.add(product(1, 1.0));
        comparison.add(product(2, 2.0));

        assert!(comparison.remove(1));
        assert!(!comparison.remove(1));
        assert_eq!(comparison.products().len(), 1);

        comparison.clear();
        assert!(comparison.products().is_empty());
    }
}

//! Products for sale

use crate::Money;

/// A product with its current stock level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Stock keeping unit, unique across products
    pub sku: String,
    pub price: Money,
    /// Units on hand, never negative
    pub stock: i64,
    pub category_id: i64,
    pub created_at: String,
}

impl Product {
    pub fn new(name: &str, sku: &str, price: Money, stock: i64, category_id: i64) -> Self {
        Self {
            id: 0,
            name: name.trim().to_string(),
            sku: sku.trim().to_string(),
            price,
            stock,
            category_id,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn has_stock(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

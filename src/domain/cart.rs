use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A collection of product references with a stored total.
///
/// References are not checked against the products table, so a cart may
/// point at products that have since been deleted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Cart {
    pub id: i32,
    /// Referenced product ids in insertion order; duplicates are allowed.
    pub products: Vec<i32>,
    /// Sum of the prices of the referenced products that still exist.
    pub total_price: f64,
    pub created_at: NaiveDateTime,
}

/// Payload required to create a cart.
#[derive(Debug, Clone, Default)]
pub struct NewCart {
    pub products: Vec<i32>,
}

impl NewCart {
    /// An empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the cart with the given product references.
    pub fn with_products(mut self, products: impl IntoIterator<Item = i32>) -> Self {
        self.products.extend(products);
        self
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Domain representation of a catalog product.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier assigned by the store.
    pub id: i32,
    /// Human-readable title of the product.
    pub title: Option<String>,
    /// Optional longer description shown to users.
    pub description: Option<String>,
    /// Unit price.
    pub price: Option<f64>,
    /// Units currently in stock.
    pub stock: Option<i32>,
    /// Category the product is listed under.
    pub category: Option<String>,
    /// References to product images, in display order.
    pub thumbnails: Vec<String>,
    /// Merchant code of the product.
    pub code: Option<String>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProduct {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub thumbnails: Vec<String>,
    pub code: Option<String>,
}

impl NewProduct {
    /// Build a new product payload with the supplied title and no other fields.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a price to the product payload.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Attach a stock quantity to the product payload.
    pub fn with_stock(mut self, stock: i32) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Attach a category to the product payload.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Attach a merchant code to the product payload.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Append an image reference to the product payload.
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnails.push(thumbnail.into());
        self
    }
}

/// Patch data applied when updating an existing product.
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProduct {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub thumbnails: Option<Vec<String>>,
    pub code: Option<String>,
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn stock(mut self, stock: i32) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn thumbnails(mut self, thumbnails: Vec<String>) -> Self {
        self.thumbnails = Some(thumbnails);
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Direction of the price ordering applied to listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSort {
    Asc,
    Desc,
}

impl PriceSort {
    /// Parse the `sort` query token; unknown tokens mean "no ordering".
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "asc" => Some(PriceSort::Asc),
            "desc" => Some(PriceSort::Desc),
            _ => None,
        }
    }
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Case-insensitive term matched against the title or description.
    pub search: Option<String>,
    /// Exact category filter.
    pub category: Option<String>,
    /// Only return products with stock greater than zero.
    pub available_only: bool,
    /// Optional price ordering; otherwise products come in id order.
    pub sort: Option<PriceSort>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query that targets every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by a search term applied to the title or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Filter the results by an exact category match.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict the results to products that are in stock.
    pub fn available_only(mut self) -> Self {
        self.available_only = true;
        self
    }

    /// Order the results by price.
    pub fn sort_by_price(mut self, sort: PriceSort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

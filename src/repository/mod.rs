use crate::db::{DbConnection, DbPool};
use crate::domain::cart::{Cart, NewCart};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::repository::errors::RepositoryResult;

pub mod cart;
pub mod errors;
pub mod product;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    /// Returns the number of products matching the filters and the requested page of them.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    /// Inserts every product in one transaction and returns how many were written.
    fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over carts.
pub trait CartReader {
    fn get_cart_by_id(&self, id: i32) -> RepositoryResult<Option<Cart>>;
    fn list_carts(&self) -> RepositoryResult<Vec<Cart>>;
}

/// Write operations over carts. Every mutation recomputes the stored total.
pub trait CartWriter {
    fn create_cart(&self, new_cart: &NewCart) -> RepositoryResult<Cart>;
    fn add_product_to_cart(&self, cart_id: i32, product_id: i32) -> RepositoryResult<Cart>;
    fn remove_product_from_cart(&self, cart_id: i32, product_id: i32) -> RepositoryResult<Cart>;
    fn delete_cart(&self, cart_id: i32) -> RepositoryResult<()>;
}

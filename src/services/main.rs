use crate::domain::product::{Product, ProductListQuery};
use crate::repository::ProductReader;
use crate::services::ServiceResult;

/// Loads the full, unfiltered catalog shown by the server-rendered pages.
pub fn load_catalog<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    let (_, products) = repo.list_products(ProductListQuery::new())?;
    Ok(products)
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::product::{PriceSort, Product, ProductListQuery};
use crate::forms::products::{AddProductForm, EditProductForm, parse_legacy_products};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, PageInfo, Pagination};
use crate::repository::{ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the product listing endpoint.
///
/// Values are kept as raw strings so malformed numbers can be reported with
/// a proper error envelope. Field order is the order used in page links.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ProductsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Search term matched against title and description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// When set, only products in stock are listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
}

impl ProductsQuery {
    /// Treat empty parameters (`?query=`) as absent.
    fn normalized(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|value| !value.trim().is_empty())
        }

        Self {
            limit: present(self.limit),
            page: present(self.page),
            sort: present(self.sort),
            query: present(self.query),
            category: present(self.category),
            availability: present(self.availability),
        }
    }
}

/// Response envelope returned by the product listing endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub status: &'static str,
    pub payload: Vec<Product>,
    pub total_pages: usize,
    pub prev_page: Option<usize>,
    pub next_page: Option<usize>,
    pub page: usize,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

/// Lists products matching `query`, one page at a time.
///
/// `path` is the request path used to build the navigation links.
pub fn list_products<R>(
    repo: &R,
    query: ProductsQuery,
    path: &str,
) -> ServiceResult<ProductListing>
where
    R: ProductReader + ?Sized,
{
    let query = query.normalized();

    let per_page = parse_positive("limit", query.limit.as_deref(), DEFAULT_ITEMS_PER_PAGE)?;
    let page = parse_positive("page", query.page.as_deref(), 1)?;
    // OFFSET and LIMIT are signed 64-bit in SQL; the end of the page must fit.
    let page_end = page
        .checked_mul(per_page)
        .and_then(|end| i64::try_from(end).ok());
    if page_end.is_none() {
        return Err(ServiceError::Form("page is out of range".to_string()));
    }

    let mut list_query = ProductListQuery::new().paginate(page, per_page);

    if let Some(term) = query.query.as_ref() {
        list_query = list_query.search(term.trim());
    }

    if let Some(category) = query.category.as_ref() {
        list_query = list_query.category(category.as_str());
    }

    if query.availability.as_deref().is_some_and(is_truthy) {
        list_query = list_query.available_only();
    }

    if let Some(sort) = query.sort.as_deref().and_then(PriceSort::from_token) {
        list_query = list_query.sort_by_price(sort);
    }

    let (total, payload) = repo.list_products(list_query)?;
    let info = PageInfo::new(Pagination { page, per_page }, total);

    let prev_link = info
        .prev_page
        .map(|target| page_link(path, &query, per_page, target))
        .transpose()?;
    let next_link = info
        .next_page
        .map(|target| page_link(path, &query, per_page, target))
        .transpose()?;

    Ok(ProductListing {
        status: "success",
        payload,
        total_pages: info.total_pages,
        prev_page: info.prev_page,
        next_page: info.next_page,
        page: info.page,
        has_prev_page: info.has_prev_page,
        has_next_page: info.has_next_page,
        prev_link,
        next_link,
    })
}

/// Fetches a single product.
pub fn get_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_by_id(product_id)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a product from the submitted payload.
pub fn create_product<R>(repo: &R, form: AddProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    let new_product = form
        .into_new_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.create_product(&new_product)?)
}

/// Merges the submitted fields into an existing product.
pub fn update_product<R>(
    repo: &R,
    product_id: i32,
    form: EditProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    let updates = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.update_product(product_id, &updates)?)
}

/// Permanently removes a product.
pub fn delete_product<R>(repo: &R, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    Ok(repo.delete_product(product_id)?)
}

/// Imports the legacy flat-file catalog into an empty store.
///
/// Returns the number of products created; a non-empty store is left as is.
/// Entries are written in one batch, so a failed import leaves the store empty.
pub fn import_legacy_products<R>(repo: &R, bytes: &[u8]) -> ServiceResult<usize>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let (existing, _) = repo.list_products(ProductListQuery::new().paginate(1, 1))?;
    if existing > 0 {
        log::info!("Catalog already holds {existing} product(s), skipping legacy import");
        return Ok(0);
    }

    let products =
        parse_legacy_products(bytes).map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.create_products(&products)?)
}

/// Reads the legacy catalog file at `path` and imports it into an empty store.
pub fn import_legacy_file<R>(repo: &R, path: &Path) -> ServiceResult<usize>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let bytes = std::fs::read(path)
        .map_err(|err| ServiceError::Internal(format!("{}: {err}", path.display())))?;

    import_legacy_products(repo, &bytes)
}

fn parse_positive(name: &str, value: Option<&str>, default: usize) -> ServiceResult<usize> {
    let Some(raw) = value else {
        return Ok(default);
    };

    match raw.trim().parse::<usize>() {
        Ok(parsed) if parsed >= 1 => Ok(parsed),
        _ => Err(ServiceError::Form(format!(
            "`{name}` must be a positive integer, got `{raw}`"
        ))),
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "false" | "0" | "no" | "off"
    )
}

fn page_link(
    path: &str,
    query: &ProductsQuery,
    per_page: usize,
    page: usize,
) -> ServiceResult<String> {
    let params = ProductsQuery {
        limit: Some(per_page.to_string()),
        page: Some(page.to_string()),
        ..query.clone()
    };

    let encoded =
        serde_qs::to_string(&params).map_err(|err| ServiceError::Internal(err.to_string()))?;

    Ok(format!("{path}?{encoded}"))
}

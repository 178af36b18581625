use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    db::fold_case,
    domain::product::{
        NewProduct as DomainNewProduct, PriceSort, Product as DomainProduct, ProductListQuery,
        UpdateProduct as DomainUpdateProduct,
    },
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
    },
    repository::errors::{RepositoryError, RepositoryResult},
    repository::{DieselRepository, ProductReader, ProductWriter},
    schema::products,
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = products::table
            .find(id)
            .first::<DbProduct>(&mut conn)
            .optional()?;

        product
            .map(DomainProduct::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        let mut conn = self.conn()?;

        let total = filtered_products(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_products(&query);

        items = match query.sort {
            Some(PriceSort::Asc) => items.order((products::price.asc(), products::id.asc())),
            Some(PriceSort::Desc) => items.order((products::price.desc(), products::id.asc())),
            None => items.order(products::id.asc()),
        };

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(i64::try_from(pagination.offset()).unwrap_or(i64::MAX))
                .limit(i64::try_from(pagination.per_page).unwrap_or(i64::MAX));
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;

        let domain_products = db_products
            .into_iter()
            .map(DomainProduct::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, domain_products))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_new = DbNewProduct::from_domain(new_product, Utc::now().naive_utc())?;

        let created = diesel::insert_into(products::table)
            .values(&db_new)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn create_products(&self, new_products: &[DomainNewProduct]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut count_inserted: usize = 0;

            for new_product in new_products {
                let db_new = DbNewProduct::from_domain(new_product, now)?;

                diesel::insert_into(products::table)
                    .values(&db_new)
                    .execute(conn)?;
                count_inserted += 1;
            }

            Ok(count_inserted)
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from_domain(updates, Utc::now().naive_utc())?;

        let updated = diesel::update(products::table.find(product_id))
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(products::table.find(product_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Base listing query with the filters of `query` applied.
///
/// The search term is matched literally against the case-folded title and description.
fn filtered_products(query: &ProductListQuery) -> products::BoxedQuery<'static, Sqlite> {
    let mut items = products::table.into_boxed::<Sqlite>();

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        items = items.filter(
            fold_case(products::title)
                .like(pattern.clone())
                .escape('\\')
                .or(fold_case(products::description)
                    .like(pattern)
                    .escape('\\')),
        );
    }

    if let Some(category) = query.category.as_ref() {
        items = items.filter(products::category.eq(category.clone()));
    }

    if query.available_only {
        items = items.filter(products::stock.gt(0));
    }

    items
}

/// Escape `LIKE` wildcards so the term matches as plain text.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_protects_wildcards() {
        assert_eq!(escape_like("cold_brew"), "cold\\_brew");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("café"), "café");
    }
}

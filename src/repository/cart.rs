use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::cart::{Cart as DomainCart, NewCart as DomainNewCart},
    models::cart::{
        Cart as DbCart, CartProduct as DbCartProduct, NewCart as DbNewCart, NewCartProduct,
    },
    repository::errors::{RepositoryError, RepositoryResult},
    repository::{CartReader, CartWriter, DieselRepository},
    schema::{cart_products, carts, products},
};

impl CartReader for DieselRepository {
    fn get_cart_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCart>> {
        let mut conn = self.conn()?;
        let cart = carts::table
            .find(id)
            .first::<DbCart>(&mut conn)
            .optional()?;

        match cart {
            Some(cart) => Ok(Some(load_cart(&mut conn, cart)?)),
            None => Ok(None),
        }
    }

    fn list_carts(&self) -> RepositoryResult<Vec<DomainCart>> {
        let mut conn = self.conn()?;
        let db_carts = carts::table
            .order(carts::id.asc())
            .load::<DbCart>(&mut conn)?;

        if db_carts.is_empty() {
            return Ok(Vec::new());
        }

        let cart_ids: Vec<i32> = db_carts.iter().map(|cart| cart.id).collect();
        let rows = cart_products::table
            .filter(cart_products::cart_id.eq_any(&cart_ids))
            .order(cart_products::id.asc())
            .load::<DbCartProduct>(&mut conn)?;

        let mut references: HashMap<i32, Vec<i32>> = HashMap::new();
        for row in rows {
            references.entry(row.cart_id).or_default().push(row.product_id);
        }

        Ok(db_carts
            .into_iter()
            .map(|cart| {
                let products = references.remove(&cart.id).unwrap_or_default();
                cart.into_domain(products)
            })
            .collect())
    }
}

impl CartWriter for DieselRepository {
    fn create_cart(&self, new_cart: &DomainNewCart) -> RepositoryResult<DomainCart> {
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let cart = diesel::insert_into(carts::table)
                .values(&DbNewCart {
                    total_price: 0.0,
                    created_at: Utc::now().naive_utc(),
                })
                .get_result::<DbCart>(conn)?;

            let rows: Vec<NewCartProduct> = new_cart
                .products
                .iter()
                .map(|&product_id| NewCartProduct {
                    cart_id: cart.id,
                    product_id,
                })
                .collect();

            if !rows.is_empty() {
                diesel::insert_into(cart_products::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            refresh_total(conn, cart.id)
        })
    }

    fn add_product_to_cart(&self, cart_id: i32, product_id: i32) -> RepositoryResult<DomainCart> {
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            ensure_cart_exists(conn, cart_id)?;

            diesel::insert_into(cart_products::table)
                .values(&NewCartProduct {
                    cart_id,
                    product_id,
                })
                .execute(conn)?;

            refresh_total(conn, cart_id)
        })
    }

    fn remove_product_from_cart(
        &self,
        cart_id: i32,
        product_id: i32,
    ) -> RepositoryResult<DomainCart> {
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            ensure_cart_exists(conn, cart_id)?;

            let reference = cart_products::table
                .filter(cart_products::cart_id.eq(cart_id))
                .filter(cart_products::product_id.eq(product_id))
                .order(cart_products::id.asc())
                .select(cart_products::id)
                .first::<i32>(conn)?;

            diesel::delete(cart_products::table.find(reference)).execute(conn)?;

            refresh_total(conn, cart_id)
        })
    }

    fn delete_cart(&self, cart_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::delete(cart_products::table.filter(cart_products::cart_id.eq(cart_id)))
                .execute(conn)?;

            let deleted = diesel::delete(carts::table.find(cart_id)).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

fn ensure_cart_exists(conn: &mut SqliteConnection, cart_id: i32) -> RepositoryResult<()> {
    carts::table
        .find(cart_id)
        .select(carts::id)
        .first::<i32>(conn)?;
    Ok(())
}

/// Recompute and store the cart total, then return the refreshed cart.
///
/// References to deleted products and products without a price add nothing.
fn refresh_total(conn: &mut SqliteConnection, cart_id: i32) -> RepositoryResult<DomainCart> {
    let prices = cart_products::table
        .inner_join(products::table.on(products::id.eq(cart_products::product_id)))
        .filter(cart_products::cart_id.eq(cart_id))
        .select(products::price)
        .load::<Option<f64>>(conn)?;
    let total: f64 = prices.into_iter().flatten().sum();

    let cart = diesel::update(carts::table.find(cart_id))
        .set(carts::total_price.eq(total))
        .get_result::<DbCart>(conn)?;

    load_cart(conn, cart)
}

fn load_cart(conn: &mut SqliteConnection, cart: DbCart) -> RepositoryResult<DomainCart> {
    let products = DbCartProduct::belonging_to(&cart)
        .order(cart_products::id.asc())
        .select(cart_products::product_id)
        .load::<i32>(conn)?;

    Ok(cart.into_domain(products))
}

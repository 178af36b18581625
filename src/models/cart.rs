use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::cart::Cart as DomainCart;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::carts)]
pub struct Cart {
    pub id: i32,
    pub total_price: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::carts)]
pub struct NewCart {
    pub total_price: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Cart))]
#[diesel(table_name = crate::schema::cart_products)]
pub struct CartProduct {
    pub id: i32,
    pub cart_id: i32,
    pub product_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::cart_products)]
pub struct NewCartProduct {
    pub cart_id: i32,
    pub product_id: i32,
}

impl Cart {
    /// Combine the cart row with its product references.
    pub fn into_domain(self, products: Vec<i32>) -> DomainCart {
        DomainCart {
            id: self.id,
            products,
            total_price: self.total_price,
            created_at: self.created_at,
        }
    }
}

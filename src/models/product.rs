use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    /// JSON array of image references.
    pub thumbnails: String,
    pub code: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub category: Option<&'a str>,
    pub thumbnails: String,
    pub code: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset that skips `None` fields, leaving the stored values untouched.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub category: Option<&'a str>,
    pub thumbnails: Option<String>,
    pub code: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Product> for DomainProduct {
    type Error = serde_json::Error;

    fn try_from(value: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            title: value.title,
            description: value.description,
            price: value.price,
            stock: value.stock,
            category: value.category,
            thumbnails: serde_json::from_str(&value.thumbnails)?,
            code: value.code,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> NewProduct<'a> {
    pub fn from_domain(
        value: &'a DomainNewProduct,
        now: NaiveDateTime,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            title: value.title.as_deref(),
            description: value.description.as_deref(),
            price: value.price,
            stock: value.stock,
            category: value.category.as_deref(),
            thumbnails: serde_json::to_string(&value.thumbnails)?,
            code: value.code.as_deref(),
            created_at: now,
            updated_at: now,
        })
    }
}

impl<'a> UpdateProduct<'a> {
    pub fn from_domain(
        value: &'a DomainUpdateProduct,
        now: NaiveDateTime,
    ) -> Result<Self, serde_json::Error> {
        let thumbnails = value
            .thumbnails
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        Ok(Self {
            title: value.title.as_deref(),
            description: value.description.as_deref(),
            price: value.price,
            stock: value.stock,
            category: value.category.as_deref(),
            thumbnails,
            code: value.code.as_deref(),
            updated_at: now,
        })
    }
}

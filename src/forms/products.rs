use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, UpdateProduct};

/// Maximum allowed length for a product title.
const TITLE_MAX_LEN: u64 = 256;

/// Maximum allowed length for a category name.
const CATEGORY_MAX_LEN: u64 = 128;

/// Maximum allowed length for a merchant code.
const CODE_MAX_LEN: u64 = 64;

/// Result type returned by the product payload helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product payloads.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The legacy product file is not a JSON array of products.
    #[error("failed to parse legacy products: {0}")]
    Legacy(#[from] serde_json::Error),
    /// An entry of the legacy product file was rejected.
    #[error("legacy product #{index} is invalid: {source}")]
    LegacyEntry {
        index: usize,
        source: Box<ProductFormError>,
    },
}

/// JSON payload accepted when creating a product.
///
/// Every field is optional; absent fields are stored as empty.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AddProductForm {
    #[validate(length(max = TITLE_MAX_LEN))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    #[validate(length(max = CATEGORY_MAX_LEN))]
    pub category: Option<String>,
    #[serde(default)]
    pub thumbnails: Vec<String>,
    #[validate(length(max = CODE_MAX_LEN))]
    pub code: Option<String>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()?;

        Ok(NewProduct {
            title: self.title.as_deref().and_then(non_empty_inline),
            description: self.description.as_deref().and_then(non_empty_multiline),
            price: self.price,
            stock: self.stock,
            category: self.category.as_deref().and_then(non_empty_inline),
            thumbnails: sanitize_thumbnails(self.thumbnails),
            code: self.code.as_deref().and_then(non_empty_code),
        })
    }
}

/// JSON payload accepted when updating a product.
///
/// Only the fields present in the body are changed. The identifier is taken
/// from the path and cannot be changed through the body.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditProductForm {
    #[validate(length(max = TITLE_MAX_LEN))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    #[validate(length(max = CATEGORY_MAX_LEN))]
    pub category: Option<String>,
    pub thumbnails: Option<Vec<String>>,
    #[validate(length(max = CODE_MAX_LEN))]
    pub code: Option<String>,
}

impl EditProductForm {
    /// Validates and sanitizes the payload into a domain `UpdateProduct`.
    ///
    /// Blank text values are ignored rather than clearing the stored field.
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        self.validate()?;

        Ok(UpdateProduct {
            title: self.title.as_deref().and_then(non_empty_inline),
            description: self.description.as_deref().and_then(non_empty_multiline),
            price: self.price,
            stock: self.stock,
            category: self.category.as_deref().and_then(non_empty_inline),
            thumbnails: self.thumbnails.map(sanitize_thumbnails),
            code: self.code.as_deref().and_then(non_empty_code),
        })
    }
}

/// Parse the legacy flat-file catalog (a JSON array of product objects).
///
/// The sequential ids stored in the file are ignored; the database assigns
/// new ones on import.
pub fn parse_legacy_products(bytes: &[u8]) -> ProductFormResult<Vec<NewProduct>> {
    let entries: Vec<AddProductForm> = serde_json::from_slice(bytes)?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .into_new_product()
                .map_err(|err| ProductFormError::LegacyEntry {
                    index,
                    source: Box::new(err),
                })
        })
        .collect()
}

fn non_empty_inline(input: &str) -> Option<String> {
    Some(sanitize_inline_text(input)).filter(|value| !value.is_empty())
}

fn non_empty_multiline(input: &str) -> Option<String> {
    Some(sanitize_multiline_text(input)).filter(|value| !value.is_empty())
}

fn non_empty_code(input: &str) -> Option<String> {
    Some(sanitize_code(input)).filter(|value| !value.is_empty())
}

fn sanitize_thumbnails(thumbnails: Vec<String>) -> Vec<String> {
    thumbnails
        .iter()
        .map(|value| sanitize_code(value))
        .filter(|value| !value.is_empty())
        .collect()
}

fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

fn sanitize_code(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
}

fn sanitize_multiline_text(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    while matches!(lines.first(), Some(line) if line.is_empty()) {
        lines.remove(0);
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    // Collapse runs of blank lines into one.
    lines.dedup_by(|current, previous| current.is_empty() && previous.is_empty());

    lines.join("\n")
}

use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};
use serde_json::json;

use crate::events::{Broadcaster, ProductEvent};
use crate::forms::products::{AddProductForm, EditProductForm};
use crate::repository::DieselRepository;
use crate::services::{ServiceError, products};

#[get("/api/products")]
/// Return a page of products with optional search, category, availability and price sorting.
pub async fn list_products(
    req: HttpRequest,
    params: web::Query<products::ProductsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::list_products(repo.get_ref(), params.into_inner(), req.path()) {
        Ok(listing) => HttpResponse::Ok().json(listing),
        Err(ServiceError::Form(message)) => {
            HttpResponse::BadRequest().json(json!({"status": "error", "message": message}))
        }
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "An error occurred while fetching products",
            }))
        }
    }
}

#[get("/api/products/{product_id}")]
pub async fn get_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = product_id.into_inner();

    match products::get_product(repo.get_ref(), product_id) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, "fetch", product_id),
    }
}

#[post("/api/products")]
pub async fn add_product(
    repo: web::Data<DieselRepository>,
    broadcaster: web::Data<Broadcaster>,
    web::Json(form): web::Json<AddProductForm>,
) -> impl Responder {
    match products::create_product(repo.get_ref(), form) {
        Ok(product) => {
            log::info!("Created product {}", product.id);
            broadcaster.publish(ProductEvent::Created(product.clone()));
            HttpResponse::Ok().json(product)
        }
        Err(ServiceError::Form(message)) => {
            HttpResponse::BadRequest().json(json!({"status": "error", "message": message}))
        }
        Err(err) => {
            log::error!("Failed to create a product: {err}");
            HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "An error occurred while creating the product",
            }))
        }
    }
}

#[put("/api/products/{product_id}")]
pub async fn update_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    broadcaster: web::Data<Broadcaster>,
    web::Json(form): web::Json<EditProductForm>,
) -> impl Responder {
    let product_id = product_id.into_inner();

    match products::update_product(repo.get_ref(), product_id, form) {
        Ok(_) => {
            log::info!("Updated product {product_id}");
            broadcaster.publish(ProductEvent::Updated(product_id));
            HttpResponse::Ok().json(json!({"message": "Product updated successfully"}))
        }
        Err(err) => error_response(err, "update", product_id),
    }
}

#[delete("/api/products/{product_id}")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    broadcaster: web::Data<Broadcaster>,
) -> impl Responder {
    let product_id = product_id.into_inner();

    match products::delete_product(repo.get_ref(), product_id) {
        Ok(()) => {
            log::info!("Deleted product {product_id}");
            broadcaster.publish(ProductEvent::Deleted(product_id));
            HttpResponse::Ok().json(json!({"message": "Product deleted successfully"}))
        }
        Err(err) => error_response(err, "delete", product_id),
    }
}

fn error_response(err: ServiceError, action: &str, product_id: i32) -> HttpResponse {
    match err {
        ServiceError::NotFound => {
            HttpResponse::NotFound().json(json!({"error": "Product not found"}))
        }
        ServiceError::Form(message) => {
            HttpResponse::BadRequest().json(json!({"status": "error", "message": message}))
        }
        err => {
            log::error!("Failed to {action} product {product_id}: {err}");
            HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": format!("An error occurred while trying to {action} the product"),
            }))
        }
    }
}

use actix_web::{HttpResponse, Responder, get, web};
use tera::{Context, Tera};

use crate::repository::DieselRepository;
use crate::routes::render_template;
use crate::services::main as main_service;

#[get("/")]
pub async fn show_index(
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_catalog(repo.get_ref(), &tera, "main/index.html")
}

#[get("/realtimeproducts")]
pub async fn show_realtime_products(
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_catalog(repo.get_ref(), &tera, "main/realtime.html")
}

fn render_catalog(repo: &DieselRepository, tera: &Tera, template: &str) -> HttpResponse {
    match main_service::load_catalog(repo) {
        Ok(products) => {
            let mut context = Context::new();
            context.insert("products", &products);
            render_template(tera, template, &context)
        }
        Err(err) => {
            log::error!("Failed to load products for {template}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

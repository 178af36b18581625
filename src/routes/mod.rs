use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};
use serde_json::json;
use tera::{Context, Tera};

pub mod api;
pub mod main;
pub mod realtime;

/// Register every page, API and real-time route.
///
/// Static assets are not included; mount them after this so they never
/// shadow an application route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // A product id that is not a number can never match a record.
    let product_id_config = web::PathConfig::default().error_handler(|err, _req| {
        InternalError::from_response(
            err,
            HttpResponse::NotFound().json(json!({"error": "Product not found"})),
        )
        .into()
    });

    cfg.app_data(product_id_config)
        .service(main::show_index)
        .service(main::show_realtime_products)
        .service(api::list_products)
        .service(api::get_product)
        .service(api::add_product)
        .service(api::update_product)
        .service(api::delete_product)
        .service(realtime::product_events);
}

/// Render `template` with `context`, answering 500 when rendering fails.
pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

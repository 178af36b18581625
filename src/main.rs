use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use tera::Tera;

use pushkind_catalog::config::ServerConfig;
use pushkind_catalog::db::{establish_connection_pool, run_migrations};
use pushkind_catalog::events::Broadcaster;
use pushkind_catalog::repository::DieselRepository;
use pushkind_catalog::routes;
use pushkind_catalog::services::products::import_legacy_file;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = ServerConfig::from_env();

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    let repo = DieselRepository::new(pool);

    if let Some(path) = &config.legacy_products_file {
        match import_legacy_file(&repo, path) {
            Ok(count) => log::info!("Imported {count} product(s) from {}", path.display()),
            Err(e) => log::error!("Legacy product import failed: {e}"),
        }
    }

    let tera = match Tera::new(&config.templates_glob()) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let broadcaster = Broadcaster::new(config.events_capacity);
    let public_dir = config.public_dir.clone();

    log::info!(
        "Serving the catalog on http://{}:{}",
        config.address,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(broadcaster.clone()))
            .configure(routes::configure)
            .service(Files::new("/", &public_dir))
    })
    .bind((config.address.as_str(), config.port))?
    .run()
    .await
}

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Runtime settings of the catalog server, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Directory holding the Tera templates.
    pub templates_dir: String,
    /// Directory served as static assets.
    pub public_dir: String,
    /// How many pending product events a slow subscriber may lag behind.
    pub events_capacity: usize,
    /// Legacy JSON product file imported into an empty catalog on startup.
    pub legacy_products_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "app.db".to_string(),
            templates_dir: "templates".to_string(),
            public_dir: "./public".to_string(),
            events_capacity: 64,
            legacy_products_file: None,
        }
    }
}

impl ServerConfig {
    /// Load the configuration from `.env` and the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            address: lookup("ADDRESS").unwrap_or(defaults.address),
            port: parse_or("PORT", lookup("PORT"), defaults.port),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            templates_dir: lookup("TEMPLATES_DIR").unwrap_or(defaults.templates_dir),
            public_dir: lookup("PUBLIC_DIR").unwrap_or(defaults.public_dir),
            events_capacity: parse_or(
                "EVENTS_CAPACITY",
                lookup("EVENTS_CAPACITY"),
                defaults.events_capacity,
            )
            .max(1),
            legacy_products_file: lookup("LEGACY_PRODUCTS_FILE")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Glob passed to Tera when loading templates.
    pub fn templates_glob(&self) -> String {
        format!("{}/**/*", self.templates_dir.trim_end_matches('/'))
    }
}

fn parse_or<T: FromStr + Copy>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Invalid {key} value `{raw}`, using default");
            default
        }),
        None => default,
    }
}

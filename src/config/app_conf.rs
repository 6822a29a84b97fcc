use std::env;

pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// JSON catalog to serve instead of the bundled one.
    pub catalog_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let catalog_path = env::var("CATALOG_PATH").ok().filter(|p| !p.trim().is_empty());
        AppConfig { host, port, catalog_path }
    }
}

use axum::{Router, routing::get};
use std::net::SocketAddr;
use tracing::{info, warn};
use crate::config::app_conf::AppConfig;
use crate::config::TelegramConfig;
use crate::repository::catalog_repo::{CatalogRepository, InMemoryCatalogRepository};
use crate::router::catalog_router::catalog_router;
use crate::router::lead_router::lead_router;
use crate::service::lead_relay_service::LeadRelayServiceImpl;
use crate::util::telegram::{HttpTelegramClient, TelegramClient};
use std::sync::Arc;


pub struct App {
    config: AppConfig,
    router: Router,
    pub catalog: Arc<dyn CatalogRepository>,
    pub relay_service: Arc<LeadRelayServiceImpl>,
}

impl App {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::from_env();

        let catalog: Arc<dyn CatalogRepository> = match &config.catalog_path {
            Some(path) => Arc::new(InMemoryCatalogRepository::load(path)?),
            None => {
                info!("CATALOG_PATH not set, using the bundled catalog");
                Arc::new(InMemoryCatalogRepository::builtin()?)
            }
        };
        info!("Catalog ready with {} products", catalog.all().len());

        // Without Telegram the relay still starts and answers 500
        let telegram = match TelegramConfig::from_env() {
            Ok(telegram_config) => {
                let client = HttpTelegramClient::new(telegram_config)?;
                Some(Arc::new(client) as Arc<dyn TelegramClient>)
            }
            Err(e) => {
                warn!("Telegram config not loaded: {e}");
                None
            }
        };
        let relay_service = Arc::new(LeadRelayServiceImpl::new(telegram));

        let router = Self::create_router(catalog.clone(), relay_service.clone());
        Ok(App { config, router, catalog, relay_service })
    }

    pub fn create_router(catalog: Arc<dyn CatalogRepository>, relay_service: Arc<LeadRelayServiceImpl>) -> Router {
        Router::new()
            .merge(catalog_router(catalog))
            .merge(lead_router(relay_service))
            .route("/health", get(|| async { "OK" }))
    }

    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = SocketAddr::new(self.config.host.parse()?, self.config.port);
        info!("🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

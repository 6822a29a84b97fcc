use dotenv::dotenv;
use laxapellets_backend::app::app::App;
use laxapellets_backend::util::logger::Logger;
use tracing::{error, info, warn};


#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before the logger so RUST_LOG and LOG_DIR apply
    let env_loaded = dotenv();

    let _guards = match Logger::new() {
        Ok(logger) => logger.guards,
        Err(e) => {
            if let Err(init) = Logger::console() {
                eprintln!("Console logging unavailable: {}", init);
            }
            warn!("File logging unavailable: {} (console only)", e);
            Vec::new()
        }
    };

    info!("🚀 Starting Laxå pellets backend");
    match env_loaded {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = App::new().await.map_err(|e| {
        error!("Failed to initialize application: {}", e);
        e
    })?;
    app.start().await
}

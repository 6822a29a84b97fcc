use dotenv::dotenv;
use laxapellets_backend::config::WebhookConfig;
use laxapellets_backend::form::lead_form::SubmitResult;
use laxapellets_backend::form::modal::{CloseReason, InMemoryPageScroll, ModalHost};
use laxapellets_backend::repository::catalog_repo::{CatalogRepository, InMemoryCatalogRepository};
use laxapellets_backend::util::logger::Logger;
use laxapellets_backend::util::notifier::{DeliveryOutcome, WebhookDispatcher};
use std::sync::Arc;
use tracing::{error, info, warn};

// Usage: submit_lead <first name> <last name> <phone> [product id] [quantity]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = Logger::console() {
        eprintln!("Console logging unavailable: {}", e);
    }

    match dotenv() {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        error!("Usage: submit_lead <first name> <last name> <phone> [product id] [quantity]");
        return Err("missing arguments".into());
    }

    let webhook_config = WebhookConfig::from_env()?;
    let dispatcher = WebhookDispatcher::new(webhook_config)?;

    let catalog: Arc<dyn CatalogRepository> = Arc::new(InMemoryCatalogRepository::builtin()?);
    let mut host = ModalHost::new(catalog, Arc::new(InMemoryPageScroll::default()));

    let product = args.get(3).map(String::as_str);
    let modal = host.open(product);
    let form = modal.form_mut();
    form.set_delivery_hook(Arc::new(|outcome: &DeliveryOutcome| {
        info!("Delivery outcome: {:?}", outcome);
    }));

    form.set_first_name(&args[0])?;
    form.set_last_name(&args[1])?;
    form.set_phone(&args[2])?;
    if let (Some(id), Some(quantity)) = (product, args.get(4)) {
        form.change_quantity(id, quantity)?;
        form.blur_quantity(id)?;
    }
    info!("Order total: {}", form.formatted_total());

    match form.submit(&dispatcher).await? {
        SubmitResult::Sent => info!("Request sent, form shows success"),
        SubmitResult::Invalid(errors) => {
            for (field, message) in &errors {
                warn!("{:?}: {}", field, message);
            }
        }
    }

    host.close(CloseReason::CloseButton);
    Ok(())
}

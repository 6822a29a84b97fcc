use crate::dto::lead_dto::{LeadPayload, RelayResponse};
use crate::util::error::ServiceError;
use crate::util::telegram::TelegramClient;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub const MISSING_TOTAL: &str = "Ej beräknat";

#[async_trait]
pub trait LeadRelayService: Send + Sync {
    async fn relay(&self, payload: LeadPayload) -> Result<RelayResponse, ServiceError>;
}

/// Forwards leads posted by the form to the shop's Telegram chat.
pub struct LeadRelayServiceImpl {
    telegram: Option<Arc<dyn TelegramClient>>,
}

impl LeadRelayServiceImpl {
    pub fn new(telegram: Option<Arc<dyn TelegramClient>>) -> Self {
        if telegram.is_none() {
            warn!("Lead relay started without Telegram configuration; leads will be refused");
        }
        LeadRelayServiceImpl { telegram }
    }
}

/// Chat message for a lead, Telegram Markdown.
pub fn format_lead_message(payload: &LeadPayload, received_at: &DateTime<Local>) -> String {
    let products = payload
        .products
        .iter()
        .map(|p| format!("  • {}: {} {}", p.name, p.quantity, p.unit))
        .collect::<Vec<_>>()
        .join("\n");

    let total = payload
        .total_price
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(MISSING_TOTAL);

    let message = if payload.message.trim().is_empty() {
        String::new()
    } else {
        format!("💬 *Meddelande:*\n{}", payload.message.trim())
    };

    format!(
        "🛒 *Ny köpförfrågan!*\n\n\
         👤 *Kontaktinfo:*\n  Namn: {} {}\n  Telefon: {}\n\n\
         📦 *Produkter:*\n{}\n\n\
         💰 *Totalt ordervärde:* {}\n\n\
         {}\n\n\
         📅 Datum: {}",
        payload.firstname.trim(),
        payload.lastname.trim(),
        payload.phone.trim(),
        products,
        total,
        message,
        received_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

fn check_required(payload: &LeadPayload) -> Result<(), ServiceError> {
    let blank = [
        ("firstname", &payload.firstname),
        ("lastname", &payload.lastname),
        ("phone", &payload.phone),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty());

    match blank {
        Some((name, _)) => Err(ServiceError::InvalidInput(format!("{} cannot be blank", name))),
        None => Ok(()),
    }
}

#[async_trait]
impl LeadRelayService for LeadRelayServiceImpl {
    #[instrument(skip(self, payload), fields(reference = tracing::field::Empty, products = payload.products.len()))]
    async fn relay(&self, payload: LeadPayload) -> Result<RelayResponse, ServiceError> {
        let reference = uuid::Uuid::new_v4().to_string();
        tracing::Span::current().record("reference", reference.as_str());
        info!(lead = ?payload, "Received lead");

        check_required(&payload)?;

        let telegram = self.telegram.as_ref().ok_or_else(|| {
            error!("Missing Telegram configuration");
            ServiceError::NotConfigured("Telegram configuration missing".to_string())
        })?;

        let text = format_lead_message(&payload, &Local::now());
        let result = telegram.send_message(&text).await.map_err(|e| {
            error!("Error sending lead to Telegram: {}", e);
            ServiceError::InternalError(e.to_string())
        })?;

        if result.get("ok").and_then(|ok| ok.as_bool()) != Some(true) {
            error!(response = %result, "Telegram API error");
            return Err(ServiceError::Upstream {
                message: "Failed to send Telegram message".to_string(),
                details: Some(result),
            });
        }

        info!("Lead sent to Telegram");
        Ok(RelayResponse {
            success: true,
            message: "Lead sent to Telegram".to_string(),
            reference: Some(reference),
        })
    }
}

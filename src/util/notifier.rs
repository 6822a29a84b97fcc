use crate::config::{ConfigError, WebhookConfig};
use crate::dto::lead_dto::LeadPayload;
use crate::model::lead::LeadSubmission;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    ClientError(#[from] reqwest::Error),
}

/// What happened to one lead notification.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    /// 2xx response.
    Delivered { status: u16, body: serde_json::Value },
    /// The relay answered with an error status.
    Rejected { status: u16, body: String },
    /// The request never got a response.
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Operator-facing observer of delivery outcomes.
pub type DeliveryHook = Arc<dyn Fn(&DeliveryOutcome) + Send + Sync>;

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// One attempt, no retry. Failures come back as an outcome, never an error.
    async fn dispatch(&self, lead: &LeadSubmission) -> DeliveryOutcome;
}

/// Posts leads as JSON to the relay webhook.
pub struct WebhookDispatcher {
    client: reqwest::Client,
    pub config: WebhookConfig,
}

impl WebhookDispatcher {
    #[instrument(skip(config), fields(url = %config.url))]
    pub fn new(config: WebhookConfig) -> Result<Self, NotifierError> {
        config.validate()?;
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        info!("Lead webhook dispatcher initialized");
        Ok(Self { client, config })
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookDispatcher {
    #[instrument(skip(self, lead), fields(url = %self.config.url, products = lead.lines.len()))]
    async fn dispatch(&self, lead: &LeadSubmission) -> DeliveryOutcome {
        let payload = LeadPayload::from(lead);
        info!("Sending lead to webhook");

        let response = match self.client.post(&self.config.url).json(&payload).send().await {
            Ok(r) => r,
            Err(e) => {
                error!("Lead webhook request failed: {}", e);
                return DeliveryOutcome::Failed { reason: e.to_string() };
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => {
                warn!("Failed to read webhook response body: {}", e);
                String::new()
            }
        };

        if status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
            info!(status = status.as_u16(), response = %body, "Lead webhook accepted the lead");
            DeliveryOutcome::Delivered { status: status.as_u16(), body }
        } else {
            error!(status = status.as_u16(), response = %text, "Lead webhook rejected the lead");
            DeliveryOutcome::Rejected { status: status.as_u16(), body: text }
        }
    }
}

use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info};

use crate::config::ConfigError;

/// Where the lead form posts its submissions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
    /// No timeout unless set
    pub timeout_secs: Option<u64>,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        WebhookConfig { url: url.into(), timeout_secs: None }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading lead webhook configuration from environment variables");

        let url = env::var("LEAD_WEBHOOK_URL")
            .map_err(|_| {
                error!("LEAD_WEBHOOK_URL environment variable not found");
                ConfigError::EnvVarNotFound("LEAD_WEBHOOK_URL".to_string())
            })?;
        debug!("Lead webhook URL: {}", url);

        let timeout_secs = match env::var("LEAD_WEBHOOK_TIMEOUT_SECS") {
            Ok(raw) => Some(raw.parse::<u64>().map_err(|_| {
                error!("Invalid LEAD_WEBHOOK_TIMEOUT_SECS value");
                ConfigError::ParseError("Invalid LEAD_WEBHOOK_TIMEOUT_SECS value".to_string())
            })?),
            Err(_) => None,
        };

        let config = WebhookConfig { url, timeout_secs };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            error!("Lead webhook URL must be http(s)");
            return Err(ConfigError::InvalidValue(format!("Invalid webhook URL: {}", self.url)));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError("Webhook timeout cannot be 0".to_string()));
        }
        Ok(())
    }
}

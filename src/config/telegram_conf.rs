use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// Telegram bot settings used by the lead relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather
    pub bot_token: String,
    /// Chat that receives the leads
    pub chat_id: String,
    /// Bot API base URL
    pub api_base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TelegramConfig {
    /// Create TelegramConfig from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading Telegram configuration from environment variables");

        let bot_token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| {
                error!("TELEGRAM_BOT_TOKEN environment variable not found");
                ConfigError::EnvVarNotFound("TELEGRAM_BOT_TOKEN".to_string())
            })?;
        debug!("Telegram bot token: [REDACTED]");

        let chat_id = env::var("TELEGRAM_CHAT_ID")
            .map_err(|_| {
                error!("TELEGRAM_CHAT_ID environment variable not found");
                ConfigError::EnvVarNotFound("TELEGRAM_CHAT_ID".to_string())
            })?;
        debug!("Telegram chat id: {}", chat_id);

        let api_base_url = env::var("TELEGRAM_API_BASE")
            .unwrap_or_else(|_| {
                debug!("TELEGRAM_API_BASE not set, using https://api.telegram.org");
                "https://api.telegram.org".to_string()
            });

        let timeout_secs = env::var("TELEGRAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| {
                warn!("TELEGRAM_TIMEOUT_SECS not set, defaulting to 10 seconds");
                "10".to_string()
            })
            .parse::<u64>()
            .map_err(|_| {
                error!("Invalid TELEGRAM_TIMEOUT_SECS value");
                ConfigError::ParseError("Invalid TELEGRAM_TIMEOUT_SECS value".to_string())
            })?;

        let config = TelegramConfig {
            bot_token,
            chat_id,
            api_base_url,
            timeout_secs,
        };

        config.validate()?;
        info!("Telegram configuration loaded successfully");
        Ok(config)
    }

    /// Create TelegramConfig for testing
    pub fn from_test_env() -> Self {
        TelegramConfig {
            bot_token: "123456:TEST-TOKEN".to_string(),
            chat_id: "-1001234567890".to_string(),
            api_base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.trim().is_empty() {
            error!("Telegram bot token is empty");
            return Err(ConfigError::ValidationError("Telegram bot token cannot be empty".to_string()));
        }

        if self.chat_id.trim().is_empty() {
            error!("Telegram chat id is empty");
            return Err(ConfigError::ValidationError("Telegram chat id cannot be empty".to_string()));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            error!("Invalid Telegram API base URL");
            return Err(ConfigError::InvalidValue(format!("Invalid Telegram API base URL: {}", self.api_base_url)));
        }

        if self.timeout_secs == 0 {
            error!("Telegram timeout is 0");
            return Err(ConfigError::ValidationError("Telegram timeout cannot be 0".to_string()));
        }

        Ok(())
    }

    /// Full sendMessage endpoint for the configured bot
    pub fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base_url.trim_end_matches('/'), self.bot_token)
    }
}

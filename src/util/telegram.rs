use crate::config::TelegramConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Request error: {0}")]
    RequestError(String),

    #[error("Response error: {0}")]
    ResponseError(String),
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Bot API client. Returns the raw API response so callers can inspect `ok`.
#[async_trait]
pub trait TelegramClient: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<serde_json::Value, TelegramError>;
}

pub struct HttpTelegramClient {
    client: reqwest::Client,
    pub config: TelegramConfig,
}

impl HttpTelegramClient {
    #[instrument(skip(config), fields(chat_id = %config.chat_id))]
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        config.validate().map_err(|e| TelegramError::ConfigError(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TelegramError::ConfigError(format!("HTTP client error: {}", e)))?;
        info!("Telegram client initialized");
        Ok(Self { client, config })
    }
}

#[async_trait]
impl TelegramClient for HttpTelegramClient {
    #[instrument(skip(self, text), fields(chat_id = %self.config.chat_id, len = text.len()))]
    async fn send_message(&self, text: &str) -> Result<serde_json::Value, TelegramError> {
        let request = SendMessageRequest {
            chat_id: &self.config.chat_id,
            text,
            parse_mode: "Markdown",
        };

        let response = self
            .client
            .post(self.config.send_message_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Telegram request failed: {}", e);
                TelegramError::RequestError(e.to_string())
            })?;

        let body: serde_json::Value = response.json().await.map_err(|e| {
            error!("Telegram response is not JSON: {}", e);
            TelegramError::ResponseError(e.to_string())
        })?;
        debug!(response = %body, "Telegram response");
        Ok(body)
    }
}

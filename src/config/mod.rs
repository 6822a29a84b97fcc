pub mod app_conf;
pub mod telegram_conf;
pub mod webhook_conf;


pub use app_conf::AppConfig;
pub use telegram_conf::TelegramConfig;
pub use webhook_conf::WebhookConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
    
    #[error("Validation error: {0}")]
    ValidationError(String),
    
    #[error("Parse error: {0}")]
    ParseError(String),
}

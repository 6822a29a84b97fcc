use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use tracing_appender::{non_blocking, rolling};

const LOG_FILE_PREFIX: &str = "laxapellets-backend";

pub struct Logger {
    pub guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
}

impl Logger {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let guards = Self::setup_logging()?;
        Ok(Logger { guards })
    }

    /// Console logging only, for tools and tests that must not write `logs/`.
    /// Fails when a global subscriber is already installed.
    pub fn console() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
    }

    pub fn setup_logging() -> Result<Vec<tracing_appender::non_blocking::WorkerGuard>, Box<dyn std::error::Error>> {
        let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
        let error_dir = format!("{}/error", log_dir);
        let json_dir = format!("{}/json", log_dir);
        let error_json_dir = format!("{}/error/json", log_dir);
        std::fs::create_dir_all(&error_json_dir)?;
        std::fs::create_dir_all(&json_dir)?;

        let console_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,laxapellets_backend=debug"));

        let file_log_level = std::env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());

        let error_file_log_level = std::env::var("ERROR_FILE_LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        let general_file = rolling::daily(&log_dir, format!("{}.log", LOG_FILE_PREFIX));
        let (non_blocking_general, general_guard) = non_blocking(general_file);

        let error_file = rolling::daily(&error_dir, format!("{}-error.log", LOG_FILE_PREFIX));
        let (non_blocking_error, error_guard) = non_blocking(error_file);

        let general_json_file = rolling::daily(&json_dir, format!("{}.json", LOG_FILE_PREFIX));
        let (non_blocking_json, json_guard) = non_blocking(general_json_file);

        let error_json_file = rolling::daily(&error_json_dir, format!("{}-error.json", LOG_FILE_PREFIX));
        let (non_blocking_error_json, error_json_guard) = non_blocking(error_json_file);

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(true)
                    .with_filter(console_filter)
            )
            .with(
                fmt::layer()
                    .with_writer(non_blocking_general)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&file_log_level))
            )
            .with(
                fmt::layer()
                    .with_writer(non_blocking_error)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&error_file_log_level))
            )
            .with(
                fmt::layer()
                    .json()
                    .with_writer(non_blocking_json)
                    .with_ansi(false)
                    .with_target(true)
                    .with_filter(EnvFilter::new(&file_log_level))
            )
            .with(
                fmt::layer()
                    .json()
                    .with_writer(non_blocking_error_json)
                    .with_ansi(false)
                    .with_target(true)
                    .with_filter(EnvFilter::new(&error_file_log_level))
            )
            .try_init()?;

        // Dropping the guards stops the background writers
        Ok(vec![general_guard, error_guard, json_guard, error_json_guard])
    }
}

pub mod logger;
pub mod error;
pub mod sanitize;
pub mod notifier;
pub mod telegram;

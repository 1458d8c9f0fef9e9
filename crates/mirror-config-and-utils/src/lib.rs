//! Shared configuration and logging setup for the feed mirror daemon.

mod config;
mod logging;

pub use config::{Config, DEFAULT_API_BASE_URL, DEFAULT_DATABASE_PATH, DEFAULT_LOG_LEVEL};
pub use logging::{init_logging, parse_level};

//! Configuration for the mirror daemon.

use std::path::PathBuf;

/// Default SQLite database path.
pub const DEFAULT_DATABASE_PATH: &str = "feed-mirror.db";

/// Default feed API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main daemon configuration.
///
/// Values are resolved in order: built-in defaults, then `MIRROR_*`
/// environment variables, then command-line flags (applied by the bin).
/// Everything is immutable after process start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the SQLite mirror database.
    pub database_path: PathBuf,
    /// Base URL of the upstream feed API.
    pub api_base_url: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Override configuration from `MIRROR_*` environment variables.
    fn load_from_env(&mut self) {
        if let Some(path) = non_empty_env("MIRROR_DATABASE") {
            self.database_path = PathBuf::from(path);
        }
        if let Some(url) = non_empty_env("MIRROR_API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Some(level) = non_empty_env("MIRROR_LOG_LEVEL") {
            self.log_level = level;
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    let raw = std::env::var(name).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

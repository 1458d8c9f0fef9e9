//! Error types for upstream feed fetches.

use thiserror::Error;

/// Error type for all feed API operations.
///
/// Everything here is treated as transient I/O by the sync jobs: the
/// current run is abandoned and the next scheduled tick (or the backfill
/// retry loop) picks up again.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network or transport-level HTTP error from reqwest.
    ///
    /// Includes connection failures, timeouts, and TLS errors.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed API returned a non-success HTTP status.
    #[error("Feed API error: {status} - {message}")]
    Api {
        /// The HTTP status code returned by the API.
        status: u16,
        /// The response body, typically containing error details.
        message: String,
    },

    /// JSON deserialization of a feed response failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid base URL or other setup issue.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience Result type alias for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

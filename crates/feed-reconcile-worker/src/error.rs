//! Error types for the reconciliation jobs.

use thiserror::Error;

/// Error type for a sync job invocation.
///
/// Both variants are transient: window and tag runs rely on the next
/// scheduled tick, the backfill retry loop resumes from its cursor.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The upstream feed could not be read.
    #[error("feed error: {0}")]
    Feed(#[from] feed_api_client::FeedError),

    /// The mirror store could not be written.
    #[error("database error: {0}")]
    Database(#[from] mirror_database::DatabaseError),
}

/// Convenience Result type alias for job operations.
pub type WorkerResult<T> = Result<T, WorkerError>;

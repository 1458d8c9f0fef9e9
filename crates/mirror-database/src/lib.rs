//! SQLite mirror store for the feed mirror daemon.
//!
//! This crate provides:
//! - A tiny r2d2 connection pool with WAL mode (one writer by default)
//! - Database migrations
//! - Model types for mirrored items and tags
//! - Transactional, change-suppressed batch upsert/delete operations
//!
//! All mutation goes through [`queries`], which scopes each batch to a
//! single transaction and skips (rather than aborts on) failing rows.

mod error;
mod migrations;
mod models;
mod pool;
pub mod queries;

pub use error::{DatabaseError, DatabaseResult};
pub use migrations::run_migrations;
pub use models::{Item, Tag};
pub use pool::{DatabasePool, PoolConfig};
pub use queries::WriteCounts;

//! HTTP client for the upstream feed API.
//!
//! Two endpoints are consumed:
//! - `items/get` with an optional `older` cursor: one page of items in
//!   strictly descending id order
//! - `tags/latest?id=N`: all tags with id greater than the cursor
//!
//! The client carries a fixed per-request timeout; all failures surface as
//! [`FeedError`] and are treated as transient by the sync jobs.

mod client;
mod error;

pub use client::{FeedClient, ItemPage};
pub use error::{FeedError, FeedResult};

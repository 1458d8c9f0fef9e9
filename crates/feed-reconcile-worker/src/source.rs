//! The seam between the sync jobs and the upstream feed.

use async_trait::async_trait;
use feed_api_client::{FeedError, ItemPage};
use mirror_database::Tag;

/// Paginated, descending-id view of the upstream feed.
///
/// Implemented over the real HTTP client by the daemon binary and by
/// scripted in-memory sources in tests. Pages are requested one at a time;
/// the caller owns the traversal (cursor advancement, stop conditions,
/// resumption after failure).
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch one page of items, each strictly older than the cursor.
    ///
    /// No cursor means the page starts at the newest item. Items within a
    /// page arrive in strictly descending id order.
    async fn fetch_items(&self, older_than: Option<u64>) -> Result<ItemPage, FeedError>;

    /// Fetch all tags with id strictly greater than `since_id`.
    async fn latest_tags(&self, since_id: u64) -> Result<Vec<Tag>, FeedError>;
}

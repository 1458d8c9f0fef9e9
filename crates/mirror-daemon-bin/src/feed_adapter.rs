//! Adapter exposing the HTTP feed client as a worker `FeedSource`.

use async_trait::async_trait;
use feed_api_client::{FeedClient, FeedError, ItemPage};
use feed_reconcile_worker::FeedSource;
use mirror_database::Tag;

/// Wraps [`FeedClient`] for consumption by the reconciliation jobs.
pub struct FeedClientSource {
    client: FeedClient,
}

impl FeedClientSource {
    /// Create the adapter around a ready client.
    pub fn new(client: FeedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedSource for FeedClientSource {
    async fn fetch_items(&self, older_than: Option<u64>) -> Result<ItemPage, FeedError> {
        self.client.fetch_items(older_than).await
    }

    async fn latest_tags(&self, since_id: u64) -> Result<Vec<Tag>, FeedError> {
        self.client.latest_tags(since_id).await
    }
}

//! Reqwest client for the upstream feed endpoints.
//!
//! The feed serves pages of items in strictly descending id order, starting
//! from the newest item unless an `older` cursor is given, plus a separate
//! cursor-based endpoint for the latest community tags.

use crate::{FeedError, FeedResult};
use mirror_database::{Item, Tag};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Fixed timeout for every outbound call. Anything slower than this means
/// the upstream servers are in trouble and the run should end early.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One page of the item feed.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemPage {
    /// Items in strictly descending id order.
    pub items: Vec<Item>,
    /// True when this page reaches the oldest item in history.
    #[serde(rename = "atEnd", default)]
    pub at_end: bool,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    tags: Vec<Tag>,
}

/// HTTP client for the upstream feed API.
#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FeedClient {
    /// Create a client for the given API base URL (e.g. `https://example.com/api`).
    pub fn new(base_url: impl AsRef<str>) -> FeedResult<Self> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| FeedError::Config(format!("invalid base url: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, base_url })
    }

    /// Fetch one page of items, optionally strictly older than the cursor.
    ///
    /// No cursor means the page starts at the newest item.
    pub async fn fetch_items(&self, older_than: Option<u64>) -> FeedResult<ItemPage> {
        let url = self.items_url(older_than)?;
        debug!(url = %url, "Fetching item page");

        let response = self.http.get(url).send().await?;
        let response = check_status(response).await?;
        let page: ItemPage = response.json().await?;
        Ok(page)
    }

    /// Fetch all tags with id strictly greater than `since_id`.
    pub async fn latest_tags(&self, since_id: u64) -> FeedResult<Vec<Tag>> {
        let url = self.tags_url(since_id)?;
        debug!(url = %url, "Fetching latest tags");

        let response = self.http.get(url).send().await?;
        let response = check_status(response).await?;
        let decoded: TagsResponse = response.json().await?;
        Ok(decoded.tags)
    }

    fn items_url(&self, older_than: Option<u64>) -> FeedResult<Url> {
        let mut url = join(&self.base_url, "items/get")?;
        if let Some(older) = older_than {
            url.query_pairs_mut().append_pair("older", &older.to_string());
        }
        Ok(url)
    }

    fn tags_url(&self, since_id: u64) -> FeedResult<Url> {
        let mut url = join(&self.base_url, "tags/latest")?;
        url.query_pairs_mut().append_pair("id", &since_id.to_string());
        Ok(url)
    }
}

fn join(base: &Url, path: &str) -> FeedResult<Url> {
    // Url::join treats a base without a trailing slash as a file, so build
    // the path by hand to keep any base path segment intact.
    let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), path);
    Url::parse(&joined).map_err(|e| FeedError::Config(format!("invalid request url: {e}")))
}

async fn check_status(response: reqwest::Response) -> FeedResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(FeedError::Api {
        status: status.as_u16(),
        message,
    })
}

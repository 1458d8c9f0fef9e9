//! Domain models shared between the feed client and the local store.
//!
//! The wire shape of the upstream API and the local row shape are close
//! enough that one type serves both; the store adds an `updated_at` column
//! that is maintained by the write path rather than carried on the model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single feed post as served by the upstream API and mirrored locally.
///
/// Identity is the `id`, assigned monotonically upstream (the sequence may
/// contain gaps). `up`, `down`, `promoted`, `mark` and `flags` are mutable
/// upstream; everything else is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u64,
    /// Promotion id, 0 when the item was never promoted to the front page.
    pub promoted: u64,
    pub up: i32,
    pub down: i32,
    /// Creation time upstream; serialized as unix seconds on the wire.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    pub image: String,
    pub thumb: String,
    pub fullsize: String,
    /// External source URL, empty for direct uploads.
    pub source: String,
    /// Content visibility bitmask.
    pub flags: i32,
    pub user: String,
    /// Badge of the owning user at the time the item was fetched.
    pub mark: i32,
    pub width: i32,
    pub height: i32,
    pub audio: bool,
}

/// A community tag attached to an item.
///
/// Tag ids are strictly increasing upstream, which makes `MAX(id)` over the
/// local table a usable resume cursor. Votes and confidence are mutable;
/// tags are never observed to be deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: u64,
    pub item_id: u64,
    pub up: i32,
    pub down: i32,
    pub confidence: f32,
    pub tag: String,
}

//! The three reconciliation jobs.
//!
//! - [`run_window_sync`]: bounded-age reconciliation, driven by the tier
//!   scheduler. Pulls everything younger than a cutoff, infers deletions
//!   from id gaps, writes one delete batch and one upsert batch.
//! - [`run_backfill`]: unbounded historical crawl with a job-level retry
//!   loop, resuming from the last confirmed id after a stream failure.
//! - [`run_tag_sync`]: incremental tag pull using the store's max tag id
//!   as a watermark cursor.
//!
//! All three are idempotent and safe to re-run with overlapping input;
//! overlapping tiers converge the store to the same state regardless of
//! execution order.

use crate::{DeletionInferencer, FeedSource, WorkerResult};
use chrono::Utc;
use mirror_database::{queries, DatabasePool, Item, Tag, WriteCounts};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Delays applied during a backfill crawl.
///
/// The page delay is a courtesy towards the upstream servers; the retry
/// delay paces the resume loop after a stream failure. Tests inject
/// [`BackfillPacing::immediate`].
#[derive(Debug, Clone)]
pub struct BackfillPacing {
    /// Pause between successive pages.
    pub page_delay: Duration,
    /// Pause before resuming a failed traversal.
    pub retry_delay: Duration,
}

impl Default for BackfillPacing {
    fn default() -> Self {
        Self {
            page_delay: Duration::from_secs(5),
            retry_delay: Duration::from_secs(20),
        }
    }
}

impl BackfillPacing {
    /// No delays at all. For tests.
    pub fn immediate() -> Self {
        Self {
            page_delay: Duration::ZERO,
            retry_delay: Duration::ZERO,
        }
    }
}

/// Outcome of one window sync run.
#[derive(Debug, Default)]
pub struct WindowSyncReport {
    /// Upsert counters for the in-window item batch.
    pub items: WriteCounts,
    /// Rows actually removed for implied-deleted ids.
    pub deleted: usize,
    /// True when a traversal error ended the run early; whatever was
    /// accumulated up to that point has still been written.
    pub truncated: bool,
}

/// Outcome of a completed backfill.
#[derive(Debug, Default)]
pub struct BackfillReport {
    /// Traversal attempts, including the successful one.
    pub attempts: usize,
    /// Pages processed across all attempts.
    pub pages: usize,
    /// Items delivered across all attempts.
    pub items: usize,
    /// Rows removed for implied-deleted ids.
    pub deleted: usize,
}

/// Outcome of one tag sync run.
#[derive(Debug, Default)]
pub struct TagSyncReport {
    /// Tags returned by the upstream endpoint.
    pub fetched: usize,
    /// Tags rejected for a malformed label.
    pub rejected: usize,
    /// Upsert counters for the surviving tags.
    pub tags: WriteCounts,
}

/// Bring the mirror up to date for all items younger than `max_age`.
///
/// Traverses the feed from the newest item backwards, feeding every
/// delivered item to a fresh [`DeletionInferencer`]. An item's age is
/// computed from its creation timestamp at the moment of inspection; the
/// first item older than the window stops page consumption. Deletes are
/// committed before upserts; the two sets are disjoint by construction.
///
/// A traversal error does not fail the run: the partial batch is written
/// and the next tick of the same tier re-covers the window.
pub async fn run_window_sync<S: FeedSource>(
    source: &S,
    pool: &DatabasePool,
    max_age: chrono::Duration,
) -> WorkerResult<WindowSyncReport> {
    let mut inferencer = DeletionInferencer::new();
    let mut batch: Vec<Item> = Vec::new();
    let mut cursor: Option<u64> = None;
    let mut truncated = false;

    'traversal: loop {
        let page = match source.fetch_items(cursor).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "Could not fetch all items, ending window run early");
                truncated = true;
                break;
            }
        };
        if page.items.is_empty() {
            break;
        }

        for item in &page.items {
            // The inferencer sees every delivered item, including the one
            // that falls off the window edge below: the last_seen chain is
            // derived from the unfiltered traversal so that window-boundary
            // truncation is never mistaken for an upstream deletion.
            inferencer.observe(item.id);

            if Utc::now() - item.created < max_age {
                batch.push(item.clone());
            } else {
                break 'traversal;
            }
        }

        if page.at_end {
            break;
        }
        let next = page.items.last().map(|item| item.id);
        if next == cursor {
            warn!(?cursor, "Feed cursor did not advance, ending window run");
            break;
        }
        cursor = next;
    }

    if batch.is_empty() {
        debug!("No items inside the sync window, nothing to write");
        return Ok(WindowSyncReport {
            truncated,
            ..Default::default()
        });
    }

    let deleted_ids = inferencer.into_deleted();
    let mut conn = pool.get()?;
    let deleted = queries::delete_items(&mut conn, &deleted_ids)?;
    let items = queries::upsert_items(&mut conn, &batch)?;

    info!(
        upserted = items.effective(),
        unchanged = items.unchanged,
        deleted,
        truncated,
        "Window sync written"
    );
    Ok(WindowSyncReport {
        items,
        deleted,
        truncated,
    })
}

/// Mirror the entire historical feed, from `start_at` down to the oldest
/// item.
///
/// Each traversal attempt owns a fresh inferencer; on stream failure the
/// crawl resumes from one below the last confirmed id, after the retry
/// delay. Returns only when the feed reports exhaustion without error.
pub async fn run_backfill<S: FeedSource>(
    source: &S,
    pool: &DatabasePool,
    start_at: Option<u64>,
    pacing: &BackfillPacing,
) -> WorkerResult<BackfillReport> {
    let mut report = BackfillReport::default();
    let mut cursor = start_at;

    loop {
        report.attempts += 1;
        info!(?cursor, attempt = report.attempts, "Starting backfill traversal");

        match crawl_to_end(source, pool, cursor, pacing, &mut report).await {
            Ok(()) => {
                info!(
                    attempts = report.attempts,
                    pages = report.pages,
                    items = report.items,
                    deleted = report.deleted,
                    "Backfill reached the end of history"
                );
                return Ok(report);
            }
            Err(failure) => {
                warn!(
                    error = %failure.error,
                    last_id = ?failure.last_id,
                    "Error during backfill traversal, resuming"
                );
                if let Some(last) = failure.last_id {
                    cursor = Some(last.saturating_sub(1));
                }
                sleep(pacing.retry_delay).await;
            }
        }
    }
}

struct CrawlFailure {
    /// Last id confirmed written before the failure, across all pages of
    /// this attempt.
    last_id: Option<u64>,
    error: crate::WorkerError,
}

async fn crawl_to_end<S: FeedSource>(
    source: &S,
    pool: &DatabasePool,
    mut cursor: Option<u64>,
    pacing: &BackfillPacing,
    report: &mut BackfillReport,
) -> Result<(), CrawlFailure> {
    // One observation chain per traversal attempt. Gaps spanning page
    // boundaries are genuine gaps; a resumed attempt starts a new chain so
    // the failure point is not mistaken for a deletion boundary.
    let mut inferencer = DeletionInferencer::new();
    let mut last_id: Option<u64> = None;

    loop {
        let page = source
            .fetch_items(cursor)
            .await
            .map_err(|e| CrawlFailure {
                last_id,
                error: e.into(),
            })?;

        for item in &page.items {
            inferencer.observe(item.id);
        }

        write_page(pool, &page.items, &mut inferencer, report).map_err(|error| CrawlFailure {
            last_id,
            error,
        })?;

        report.pages += 1;
        report.items += page.items.len();
        if let Some(last) = page.items.last() {
            last_id = Some(last.id);
        }

        if page.at_end || page.items.is_empty() {
            return Ok(());
        }
        cursor = last_id;
        sleep(pacing.page_delay).await;
    }
}

fn write_page(
    pool: &DatabasePool,
    items: &[Item],
    inferencer: &mut DeletionInferencer,
    report: &mut BackfillReport,
) -> WorkerResult<()> {
    let deleted_ids = inferencer.take_deleted();
    let mut conn = pool.get()?;
    if !deleted_ids.is_empty() {
        report.deleted += queries::delete_items(&mut conn, &deleted_ids)?;
    }
    if !items.is_empty() {
        queries::upsert_items(&mut conn, items)?;
    }
    Ok(())
}

/// Incrementally mirror new and changed tags.
///
/// The cursor is derived, not stored: the largest tag id already mirrored
/// is read at the start of each run. Tags whose label carries an embedded
/// NUL are rejected; the rest of the batch is unaffected. No deletion
/// inference applies to tags.
pub async fn run_tag_sync<S: FeedSource>(
    source: &S,
    pool: &DatabasePool,
) -> WorkerResult<TagSyncReport> {
    let cursor = {
        let conn = pool.get()?;
        queries::max_tag_id(&conn)?
    };
    debug!(cursor, "Fetching tags newer than cursor");

    let fetched = source.latest_tags(cursor).await?;
    let mut report = TagSyncReport {
        fetched: fetched.len(),
        ..Default::default()
    };
    if fetched.is_empty() {
        return Ok(report);
    }

    // JSON decoding already guarantees valid UTF-8; an embedded NUL is the
    // one well-formedness hole left that the store must never see.
    let mut accepted: Vec<Tag> = Vec::with_capacity(fetched.len());
    for tag in fetched {
        if tag.tag.contains('\0') {
            warn!(id = tag.id, item_id = tag.item_id, "Rejecting tag with embedded NUL in label");
            report.rejected += 1;
        } else {
            accepted.push(tag);
        }
    }

    let mut conn = pool.get()?;
    report.tags = queries::upsert_tags(&mut conn, &accepted)?;

    info!(
        fetched = report.fetched,
        rejected = report.rejected,
        upserted = report.tags.effective(),
        "Tag sync written"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration as Age;
    use feed_api_client::{FeedError, FeedResult, ItemPage};
    use mirror_database::PoolConfig;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn test_pool() -> (TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let pool =
            DatabasePool::open(&dir.path().join("mirror.db"), PoolConfig::default()).unwrap();
        (dir, pool)
    }

    fn item(id: u64, age: Age) -> Item {
        Item {
            id,
            promoted: 0,
            up: 1,
            down: 0,
            created: Utc::now() - age,
            image: format!("img/{id}.jpg"),
            thumb: format!("thumb/{id}.jpg"),
            fullsize: String::new(),
            source: String::new(),
            flags: 1,
            user: "tester".to_string(),
            mark: 0,
            width: 640,
            height: 480,
            audio: false,
        }
    }

    fn tag(id: u64, label: &str) -> Tag {
        Tag {
            id,
            item_id: 1,
            up: 2,
            down: 0,
            confidence: 0.5,
            tag: label.to_string(),
        }
    }

    fn page(items: Vec<Item>, at_end: bool) -> ItemPage {
        ItemPage { items, at_end }
    }

    fn feed_err() -> FeedError {
        FeedError::Api {
            status: 500,
            message: "scripted failure".to_string(),
        }
    }

    fn preload(pool: &DatabasePool, ids: &[u64]) {
        let items: Vec<Item> = ids.iter().map(|&id| item(id, Age::minutes(5))).collect();
        let mut conn = pool.get().unwrap();
        queries::upsert_items(&mut conn, &items).unwrap();
    }

    fn stored_ids(pool: &DatabasePool) -> Vec<u64> {
        let conn = pool.get().unwrap();
        queries::item_ids(&conn).unwrap()
    }

    /// Feed source that replays a fixed script of responses and records
    /// the cursors it was asked for.
    #[derive(Default)]
    struct ScriptedSource {
        pages: Mutex<VecDeque<FeedResult<ItemPage>>>,
        tags: Mutex<VecDeque<FeedResult<Vec<Tag>>>>,
        item_cursors: Mutex<Vec<Option<u64>>>,
        tag_cursors: Mutex<Vec<u64>>,
    }

    impl ScriptedSource {
        fn with_pages(pages: Vec<FeedResult<ItemPage>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                ..Default::default()
            }
        }

        fn with_tags(tags: Vec<FeedResult<Vec<Tag>>>) -> Self {
            Self {
                tags: Mutex::new(tags.into()),
                ..Default::default()
            }
        }

        fn item_cursors(&self) -> Vec<Option<u64>> {
            self.item_cursors.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FeedSource for ScriptedSource {
        async fn fetch_items(&self, older_than: Option<u64>) -> FeedResult<ItemPage> {
            self.item_cursors.lock().unwrap().push(older_than);
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(page(vec![], true)))
        }

        async fn latest_tags(&self, since_id: u64) -> FeedResult<Vec<Tag>> {
            self.tag_cursors.lock().unwrap().push(since_id);
            self.tags.lock().unwrap().pop_front().unwrap_or(Ok(vec![]))
        }
    }

    // ------------------------------------------------------------------
    // Window sync
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn window_sync_upserts_items_and_deletes_gaps() {
        let (_dir, pool) = test_pool();
        preload(&pool, &[100, 101, 102, 103, 104, 105]);

        let source = ScriptedSource::with_pages(vec![Ok(page(
            vec![
                item(105, Age::minutes(1)),
                item(101, Age::minutes(2)),
                item(100, Age::minutes(3)),
            ],
            true,
        ))]);

        let report = run_window_sync(&source, &pool, Age::hours(6)).await.unwrap();
        assert_eq!(report.deleted, 3);
        assert!(!report.truncated);
        assert_eq!(stored_ids(&pool), vec![100, 101, 105]);
    }

    #[tokio::test]
    async fn window_sync_zero_in_window_items_writes_nothing() {
        let (_dir, pool) = test_pool();
        preload(&pool, &[50]);

        let source = ScriptedSource::with_pages(vec![Ok(page(
            vec![item(105, Age::hours(10))],
            true,
        ))]);

        let report = run_window_sync(&source, &pool, Age::hours(6)).await.unwrap();
        assert_eq!(report.items, WriteCounts::default());
        assert_eq!(report.deleted, 0);
        assert_eq!(stored_ids(&pool), vec![50]);
    }

    #[tokio::test]
    async fn window_sync_stops_paginating_at_the_window_edge() {
        let (_dir, pool) = test_pool();

        let source = ScriptedSource::with_pages(vec![
            Ok(page(
                vec![item(105, Age::minutes(1)), item(104, Age::hours(10))],
                false,
            )),
            // Must never be requested: the boundary item ends the run.
            Ok(page(vec![item(103, Age::minutes(1))], true)),
        ]);

        let report = run_window_sync(&source, &pool, Age::hours(6)).await.unwrap();
        assert_eq!(source.item_cursors(), vec![None]);
        assert_eq!(report.items.inserted, 1);
        assert_eq!(report.deleted, 0);
        assert_eq!(stored_ids(&pool), vec![105]);
    }

    #[tokio::test]
    async fn window_sync_boundary_item_still_feeds_the_inferencer() {
        let (_dir, pool) = test_pool();
        preload(&pool, &[103, 104]);

        // 105 is young, 102 is the boundary item. 103 and 104 sit strictly
        // between two observed ids and are genuinely gone upstream.
        let source = ScriptedSource::with_pages(vec![Ok(page(
            vec![item(105, Age::minutes(1)), item(102, Age::hours(10))],
            false,
        ))]);

        let report = run_window_sync(&source, &pool, Age::hours(6)).await.unwrap();
        assert_eq!(report.deleted, 2);
        assert_eq!(stored_ids(&pool), vec![105]);
    }

    #[tokio::test]
    async fn window_sync_paginates_with_descending_cursor() {
        let (_dir, pool) = test_pool();

        let source = ScriptedSource::with_pages(vec![
            Ok(page(
                vec![item(110, Age::minutes(1)), item(109, Age::minutes(2))],
                false,
            )),
            Ok(page(vec![item(108, Age::minutes(3))], true)),
        ]);

        let report = run_window_sync(&source, &pool, Age::hours(6)).await.unwrap();
        assert_eq!(source.item_cursors(), vec![None, Some(109)]);
        assert_eq!(report.items.inserted, 3);
        assert_eq!(stored_ids(&pool), vec![108, 109, 110]);
    }

    #[tokio::test]
    async fn window_sync_writes_partial_batch_on_feed_error() {
        let (_dir, pool) = test_pool();

        let source = ScriptedSource::with_pages(vec![
            Ok(page(
                vec![item(105, Age::minutes(1)), item(101, Age::minutes(2))],
                false,
            )),
            Err(feed_err()),
        ]);

        let report = run_window_sync(&source, &pool, Age::hours(6)).await.unwrap();
        assert!(report.truncated);
        assert_eq!(report.items.inserted, 2);
        // The gap between 105 and 101 was fully observed before the failure.
        assert_eq!(stored_ids(&pool), vec![101, 105]);
    }

    #[tokio::test]
    async fn window_sync_is_idempotent_across_overlapping_runs() {
        let (_dir, pool) = test_pool();

        let script = || {
            vec![Ok(page(
                vec![
                    item(105, Age::minutes(1)),
                    item(101, Age::minutes(2)),
                    item(100, Age::minutes(3)),
                ],
                true,
            ))]
        };

        let first = run_window_sync(&ScriptedSource::with_pages(script()), &pool, Age::hours(6))
            .await
            .unwrap();
        assert_eq!(first.items.effective(), 3);

        let second = run_window_sync(&ScriptedSource::with_pages(script()), &pool, Age::hours(48))
            .await
            .unwrap();
        assert_eq!(second.items.effective(), 0);
        assert_eq!(second.items.unchanged, 3);
        assert_eq!(second.deleted, 0);
        assert_eq!(stored_ids(&pool), vec![100, 101, 105]);
    }

    // ------------------------------------------------------------------
    // Backfill
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn backfill_crawls_to_exhaustion() {
        let (_dir, pool) = test_pool();

        let source = ScriptedSource::with_pages(vec![
            Ok(page(
                vec![item(502, Age::days(1)), item(501, Age::days(2))],
                false,
            )),
            Ok(page(vec![item(500, Age::days(3))], true)),
        ]);

        let report = run_backfill(&source, &pool, None, &BackfillPacing::immediate())
            .await
            .unwrap();
        assert_eq!(report.attempts, 1);
        assert_eq!(report.pages, 2);
        assert_eq!(report.items, 3);
        assert_eq!(source.item_cursors(), vec![None, Some(501)]);
        assert_eq!(stored_ids(&pool), vec![500, 501, 502]);
    }

    #[tokio::test]
    async fn backfill_resumes_one_below_the_last_confirmed_id() {
        let (_dir, pool) = test_pool();

        let source = ScriptedSource::with_pages(vec![
            Ok(page(
                vec![
                    item(502, Age::days(1)),
                    item(501, Age::days(1)),
                    item(500, Age::days(1)),
                ],
                false,
            )),
            Err(feed_err()),
            Ok(page(
                vec![item(499, Age::days(2)), item(498, Age::days(2))],
                true,
            )),
        ]);

        let report = run_backfill(&source, &pool, None, &BackfillPacing::immediate())
            .await
            .unwrap();
        assert_eq!(report.attempts, 2);
        assert_eq!(source.item_cursors(), vec![None, Some(500), Some(499)]);
        assert_eq!(stored_ids(&pool), vec![498, 499, 500, 501, 502]);
    }

    #[tokio::test]
    async fn backfill_honors_the_starting_cursor() {
        let (_dir, pool) = test_pool();

        let source =
            ScriptedSource::with_pages(vec![Ok(page(vec![item(41, Age::days(10))], true))]);

        run_backfill(&source, &pool, Some(42), &BackfillPacing::immediate())
            .await
            .unwrap();
        assert_eq!(source.item_cursors(), vec![Some(42)]);
    }

    #[tokio::test]
    async fn backfill_infers_gaps_across_page_boundaries() {
        let (_dir, pool) = test_pool();
        preload(&pool, &[508]);

        let source = ScriptedSource::with_pages(vec![
            Ok(page(
                vec![item(510, Age::days(1)), item(509, Age::days(1))],
                false,
            )),
            Ok(page(
                vec![item(507, Age::days(1)), item(506, Age::days(1))],
                true,
            )),
        ]);

        let report = run_backfill(&source, &pool, None, &BackfillPacing::immediate())
            .await
            .unwrap();
        assert_eq!(report.deleted, 1);
        assert_eq!(stored_ids(&pool), vec![506, 507, 509, 510]);
    }

    #[tokio::test]
    async fn backfill_resumption_starts_a_fresh_observation_chain() {
        let (_dir, pool) = test_pool();
        preload(&pool, &[495]);

        let source = ScriptedSource::with_pages(vec![
            Ok(page(vec![item(500, Age::days(1))], false)),
            Err(feed_err()),
            // The resumed traversal begins at 490; the jump from 500 to 490
            // spans the failure point and must not imply deletions.
            Ok(page(vec![item(490, Age::days(1))], true)),
        ]);

        let report = run_backfill(&source, &pool, None, &BackfillPacing::immediate())
            .await
            .unwrap();
        assert_eq!(report.deleted, 0);
        assert_eq!(stored_ids(&pool), vec![490, 495, 500]);
    }

    // ------------------------------------------------------------------
    // Tag sync
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn tag_sync_reads_the_cursor_from_the_store() {
        let (_dir, pool) = test_pool();
        {
            let mut conn = pool.get().unwrap();
            queries::upsert_tags(&mut conn, &[tag(42, "bestof")]).unwrap();
        }

        let source = ScriptedSource::with_tags(vec![Ok(vec![tag(43, "neu"), tag(44, "repost")])]);

        let report = run_tag_sync(&source, &pool).await.unwrap();
        assert_eq!(source.tag_cursors.lock().unwrap().as_slice(), &[42]);
        assert_eq!(report.fetched, 2);
        assert_eq!(report.tags.inserted, 2);

        let conn = pool.get().unwrap();
        assert_eq!(queries::max_tag_id(&conn).unwrap(), 44);
    }

    #[tokio::test]
    async fn tag_sync_starts_from_zero_on_an_empty_store() {
        let (_dir, pool) = test_pool();
        let source = ScriptedSource::with_tags(vec![Ok(vec![])]);

        let report = run_tag_sync(&source, &pool).await.unwrap();
        assert_eq!(source.tag_cursors.lock().unwrap().as_slice(), &[0]);
        assert_eq!(report.fetched, 0);
    }

    #[tokio::test]
    async fn tag_sync_rejects_nul_labels_but_keeps_the_rest() {
        let (_dir, pool) = test_pool();

        let source = ScriptedSource::with_tags(vec![Ok(vec![
            tag(43, "fein"),
            tag(44, "bad\0label"),
            tag(45, "auch fein"),
        ])]);

        let report = run_tag_sync(&source, &pool).await.unwrap();
        assert_eq!(report.rejected, 1);
        assert_eq!(report.tags.inserted, 2);

        let conn = pool.get().unwrap();
        assert!(queries::get_tag(&conn, 44).unwrap().is_none());
        assert!(queries::get_tag(&conn, 43).unwrap().is_some());
        assert!(queries::get_tag(&conn, 45).unwrap().is_some());
    }

    #[tokio::test]
    async fn tag_sync_suppresses_unchanged_rewrites() {
        let (_dir, pool) = test_pool();

        let source = ScriptedSource::with_tags(vec![
            Ok(vec![tag(43, "fein")]),
            // Upstream re-serves the same tag unchanged past the cursor.
            Ok(vec![tag(43, "fein")]),
        ]);

        run_tag_sync(&source, &pool).await.unwrap();
        let report = run_tag_sync(&source, &pool).await.unwrap();
        assert_eq!(report.tags.effective(), 0);
        assert_eq!(report.tags.unchanged, 1);
    }

    #[tokio::test]
    async fn tag_sync_propagates_feed_errors() {
        let (_dir, pool) = test_pool();
        let source = ScriptedSource::with_tags(vec![Err(feed_err())]);

        let result = run_tag_sync(&source, &pool).await;
        assert!(result.is_err());
    }

    // ------------------------------------------------------------------
    // Cross-tier convergence
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn overlapping_tiers_converge_regardless_of_order() {
        let feed = || {
            vec![Ok(page(
                vec![
                    item(205, Age::hours(1)),
                    item(203, Age::hours(2)),
                    item(202, Age::hours(20)),
                ],
                true,
            ))]
        };

        let (_dir_a, pool_a) = test_pool();
        preload(&pool_a, &[202, 203, 204, 205]);
        run_window_sync(&ScriptedSource::with_pages(feed()), &pool_a, Age::hours(6))
            .await
            .unwrap();
        run_window_sync(&ScriptedSource::with_pages(feed()), &pool_a, Age::hours(24))
            .await
            .unwrap();

        let (_dir_b, pool_b) = test_pool();
        preload(&pool_b, &[202, 203, 204, 205]);
        run_window_sync(&ScriptedSource::with_pages(feed()), &pool_b, Age::hours(24))
            .await
            .unwrap();
        run_window_sync(&ScriptedSource::with_pages(feed()), &pool_b, Age::hours(6))
            .await
            .unwrap();

        assert_eq!(stored_ids(&pool_a), stored_ids(&pool_b));
        assert_eq!(stored_ids(&pool_a), vec![202, 203, 205]);
    }
}

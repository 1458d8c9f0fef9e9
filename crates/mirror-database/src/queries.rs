//! Batch write operations against the mirror store.
//!
//! Each batch runs inside one transaction. A row that fails to write is
//! logged and skipped without aborting the surrounding batch, and every
//! operation is idempotent so that overlapping sync tiers can re-apply the
//! same input safely.
//!
//! Upserts are change-suppressed: a row whose tracked fields already match
//! the incoming value is left completely untouched, including its
//! `updated_at` column. Downstream consumers use `updated_at` to detect
//! changes, so a no-op write must not look like a change.

use crate::{DatabaseResult, Item, Tag};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::{debug, warn};

/// Outcome counters for one upsert batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteCounts {
    /// Rows that did not exist before.
    pub inserted: usize,
    /// Rows whose tracked fields changed.
    pub updated: usize,
    /// Rows that matched the stored state and were not touched.
    pub unchanged: usize,
    /// Rows that failed to write and were skipped.
    pub skipped: usize,
}

impl WriteCounts {
    /// Rows that actually modified the store.
    pub fn effective(&self) -> usize {
        self.inserted + self.updated
    }
}

enum RowOutcome {
    Inserted,
    Updated,
    Unchanged,
}

/// Insert-or-update a batch of items within one transaction.
///
/// On conflict only the upstream-mutable fields (`up`, `down`, `promoted`,
/// `mark`, `flags`) and `updated_at` are rewritten, and only when at least
/// one of them differs from the stored row.
pub fn upsert_items(conn: &mut Connection, items: &[Item]) -> DatabaseResult<WriteCounts> {
    let tx = conn.transaction()?;
    let now = Utc::now().timestamp();
    let mut counts = WriteCounts::default();

    for item in items {
        match write_item(&tx, item, now) {
            Ok(RowOutcome::Inserted) => counts.inserted += 1,
            Ok(RowOutcome::Updated) => counts.updated += 1,
            Ok(RowOutcome::Unchanged) => counts.unchanged += 1,
            Err(e) => {
                warn!(id = item.id, error = %e, "Could not write item, skipping row");
                counts.skipped += 1;
            }
        }
    }

    tx.commit()?;
    debug!(
        inserted = counts.inserted,
        updated = counts.updated,
        unchanged = counts.unchanged,
        skipped = counts.skipped,
        "Item batch written"
    );
    Ok(counts)
}

fn write_item(tx: &Transaction<'_>, item: &Item, now: i64) -> rusqlite::Result<RowOutcome> {
    let existing = tx
        .query_row(
            "SELECT up, down, promoted, mark, flags FROM items WHERE id = ?1",
            params![item.id],
            |row| {
                Ok((
                    row.get::<_, i32>(0)?,
                    row.get::<_, i32>(1)?,
                    row.get::<_, u64>(2)?,
                    row.get::<_, i32>(3)?,
                    row.get::<_, i32>(4)?,
                ))
            },
        )
        .optional()?;

    match existing {
        None => {
            tx.execute(
                "INSERT INTO items
                    (id, promoted, up, down, created, image, thumb, fullsize, source,
                     flags, username, mark, width, height, audio, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    item.id,
                    item.promoted,
                    item.up,
                    item.down,
                    item.created.timestamp(),
                    item.image,
                    item.thumb,
                    item.fullsize,
                    item.source,
                    item.flags,
                    item.user,
                    item.mark,
                    item.width,
                    item.height,
                    item.audio,
                    now,
                ],
            )?;
            Ok(RowOutcome::Inserted)
        }
        Some((up, down, promoted, mark, flags))
            if up == item.up
                && down == item.down
                && promoted == item.promoted
                && mark == item.mark
                && flags == item.flags =>
        {
            Ok(RowOutcome::Unchanged)
        }
        Some(_) => {
            tx.execute(
                "UPDATE items
                 SET up = ?1, down = ?2, promoted = ?3, mark = ?4, flags = ?5, updated_at = ?6
                 WHERE id = ?7",
                params![
                    item.up,
                    item.down,
                    item.promoted,
                    item.mark,
                    item.flags,
                    now,
                    item.id
                ],
            )?;
            Ok(RowOutcome::Updated)
        }
    }
}

/// Remove all items whose id is in the given set, within one transaction.
///
/// Returns the number of rows actually removed, which may legitimately be
/// zero when the ids were already absent.
pub fn delete_items(conn: &mut Connection, ids: &[u64]) -> DatabaseResult<usize> {
    let tx = conn.transaction()?;
    let mut removed = 0;
    {
        let mut stmt = tx.prepare_cached("DELETE FROM items WHERE id = ?1")?;
        for id in ids {
            removed += stmt.execute(params![id])?;
        }
    }
    tx.commit()?;

    if removed > 0 {
        debug!(requested = ids.len(), removed, "Deleted implied-absent items");
    }
    Ok(removed)
}

/// Insert-or-update a batch of tags within one transaction.
///
/// Same change suppression discipline as [`upsert_items`]: a tag whose
/// `up`/`down`/`confidence` match the stored row is not touched.
pub fn upsert_tags(conn: &mut Connection, tags: &[Tag]) -> DatabaseResult<WriteCounts> {
    let tx = conn.transaction()?;
    let now = Utc::now().timestamp();
    let mut counts = WriteCounts::default();

    for tag in tags {
        match write_tag(&tx, tag, now) {
            Ok(RowOutcome::Inserted) => counts.inserted += 1,
            Ok(RowOutcome::Updated) => counts.updated += 1,
            Ok(RowOutcome::Unchanged) => counts.unchanged += 1,
            Err(e) => {
                warn!(id = tag.id, error = %e, "Could not write tag, skipping row");
                counts.skipped += 1;
            }
        }
    }

    tx.commit()?;
    debug!(
        inserted = counts.inserted,
        updated = counts.updated,
        unchanged = counts.unchanged,
        skipped = counts.skipped,
        "Tag batch written"
    );
    Ok(counts)
}

fn write_tag(tx: &Transaction<'_>, tag: &Tag, now: i64) -> rusqlite::Result<RowOutcome> {
    let existing = tx
        .query_row(
            "SELECT up, down, confidence FROM tags WHERE id = ?1",
            params![tag.id],
            |row| {
                Ok((
                    row.get::<_, i32>(0)?,
                    row.get::<_, i32>(1)?,
                    row.get::<_, f64>(2)? as f32,
                ))
            },
        )
        .optional()?;

    match existing {
        None => {
            tx.execute(
                "INSERT INTO tags (id, item_id, up, down, confidence, tag, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    tag.id,
                    tag.item_id,
                    tag.up,
                    tag.down,
                    f64::from(tag.confidence),
                    tag.tag,
                    now
                ],
            )?;
            Ok(RowOutcome::Inserted)
        }
        Some((up, down, confidence))
            if up == tag.up && down == tag.down && confidence == tag.confidence =>
        {
            Ok(RowOutcome::Unchanged)
        }
        Some(_) => {
            tx.execute(
                "UPDATE tags SET up = ?1, down = ?2, confidence = ?3, updated_at = ?4 WHERE id = ?5",
                params![tag.up, tag.down, f64::from(tag.confidence), now, tag.id],
            )?;
            Ok(RowOutcome::Updated)
        }
    }
}

/// Largest tag id currently mirrored, 0 when the table is empty.
///
/// Used as the lower-bound cursor for the next incremental tag fetch.
pub fn max_tag_id(conn: &Connection) -> DatabaseResult<u64> {
    let id: u64 = conn.query_row("SELECT COALESCE(MAX(id), 0) FROM tags", [], |row| {
        row.get(0)
    })?;
    Ok(id)
}

/// Fetch a mirrored item by id.
pub fn get_item(conn: &Connection, id: u64) -> DatabaseResult<Option<Item>> {
    let result = conn
        .query_row(
            "SELECT id, promoted, up, down, created, image, thumb, fullsize, source,
                    flags, username, mark, width, height, audio
             FROM items WHERE id = ?1",
            params![id],
            |row| {
                Ok(Item {
                    id: row.get(0)?,
                    promoted: row.get(1)?,
                    up: row.get(2)?,
                    down: row.get(3)?,
                    created: chrono::DateTime::from_timestamp(row.get(4)?, 0)
                        .unwrap_or_default(),
                    image: row.get(5)?,
                    thumb: row.get(6)?,
                    fullsize: row.get(7)?,
                    source: row.get(8)?,
                    flags: row.get(9)?,
                    user: row.get(10)?,
                    mark: row.get(11)?,
                    width: row.get(12)?,
                    height: row.get(13)?,
                    audio: row.get(14)?,
                })
            },
        )
        .optional()?;
    Ok(result)
}

/// All mirrored item ids in ascending order.
pub fn item_ids(conn: &Connection) -> DatabaseResult<Vec<u64>> {
    let mut stmt = conn.prepare_cached("SELECT id FROM items ORDER BY id")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Fetch a mirrored tag by id.
pub fn get_tag(conn: &Connection, id: u64) -> DatabaseResult<Option<Tag>> {
    let result = conn
        .query_row(
            "SELECT id, item_id, up, down, confidence, tag FROM tags WHERE id = ?1",
            params![id],
            |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    item_id: row.get(1)?,
                    up: row.get(2)?,
                    down: row.get(3)?,
                    confidence: row.get::<_, f64>(4)? as f32,
                    tag: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(result)
}

/// Last-write timestamp of an item row (unix seconds).
pub fn item_updated_at(conn: &Connection, id: u64) -> DatabaseResult<Option<i64>> {
    let result = conn
        .query_row(
            "SELECT updated_at FROM items WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(result)
}
